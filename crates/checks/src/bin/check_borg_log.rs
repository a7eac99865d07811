use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use nagcheck_checks::checks::borg_log::{self, BorgLogArgs};
use nagcheck_checks::{logging, runner};

fn main() -> ExitCode {
    let args = BorgLogArgs::parse();
    logging::init(args.common.verbose);

    let result = borg_log::run(&args, Local::now().naive_local());
    runner::finish(result, &borg_log::STYLE)
}
