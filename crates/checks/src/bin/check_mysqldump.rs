use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use nagcheck_checks::checks::mysqldump::{self, MysqldumpArgs};
use nagcheck_checks::{logging, runner};

fn main() -> ExitCode {
    let args = MysqldumpArgs::parse();
    logging::init(args.common.verbose);

    let result = mysqldump::run(&args, Local::now().naive_local());
    runner::finish(result, &mysqldump::STYLE)
}
