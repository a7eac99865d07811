use std::process::ExitCode;

use clap::Parser;
use nagcheck_checks::checks::omreport::{self, ChassisTempArgs};
use nagcheck_checks::{logging, runner};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = ChassisTempArgs::parse();
    logging::init(args.omreport.common.verbose);

    let result = omreport::run_chassis_temperature(&args).await;
    runner::finish(result, &omreport::STYLE)
}
