use std::process::ExitCode;

use clap::Parser;
use nagcheck_checks::checks::directory::{self, DirectoryArgs};
use nagcheck_checks::{logging, runner};

fn main() -> ExitCode {
    let args = DirectoryArgs::parse();
    logging::init(args.common.verbose);

    runner::finish(directory::run(&args), &directory::STYLE)
}
