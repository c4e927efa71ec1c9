use std::process::ExitCode;

use clap::Parser;
use n8nctl::app::{init_tracing, run_until_interrupted};
use n8nctl::commands::setup::{self, SetupCli};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    run_until_interrupted(setup::run(SetupCli::parse())).await
}
