use std::process::ExitCode;

use clap::Parser;
use n8nctl::app::{init_tracing, run_until_interrupted};
use n8nctl::commands::env_check::{self, EnvCheckCli};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    run_until_interrupted(env_check::run(EnvCheckCli::parse())).await
}
