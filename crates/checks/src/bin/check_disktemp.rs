use std::process::ExitCode;

use clap::Parser;
use nagcheck_checks::checks::disktemp::{self, DisktempArgs};
use nagcheck_checks::{logging, runner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = DisktempArgs::parse();
    logging::init(args.common.verbose);

    runner::finish(disktemp::run(&args).await, &disktemp::STYLE)
}
