use std::process::ExitCode;

use clap::Parser;
use n8nctl::app::{init_tracing, run_until_interrupted};
use n8nctl::commands::deploy::{self, DeployCli};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    run_until_interrupted(deploy::run(DeployCli::parse())).await
}
