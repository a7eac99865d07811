use std::process::ExitCode;

use chrono::Local;
use clap::Parser;
use nagcheck_checks::checks::borg::{self, BorgArgs};
use nagcheck_checks::{logging, runner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = BorgArgs::parse();
    logging::init(args.common.verbose);

    let result = borg::run(&args, Local::now().naive_local()).await;
    runner::finish(result, &args.style())
}
