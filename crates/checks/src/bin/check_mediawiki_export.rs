use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use nagcheck_checks::checks::mediawiki::{self, MediawikiArgs};
use nagcheck_checks::{logging, runner};

fn main() -> ExitCode {
    let args = MediawikiArgs::parse();
    logging::init(args.common.verbose);

    let result = mediawiki::run(&args, Local::now().naive_local());
    runner::finish(result, &args.style())
}
