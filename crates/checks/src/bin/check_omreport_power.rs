use std::process::ExitCode;

use clap::Parser;
use nagcheck_checks::checks::omreport::{self, PowerArgs};
use nagcheck_checks::{logging, runner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = PowerArgs::parse();
    logging::init(args.omreport.common.verbose);

    runner::finish(omreport::run_power(&args).await, &omreport::STYLE)
}
