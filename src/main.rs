use std::process::ExitCode;

use clap::Parser;

use telesticker::{cli, logger};

fn main() -> ExitCode {
    logger::init();
    let args = cli::CliArgs::parse();
    cli::run(args)
}
