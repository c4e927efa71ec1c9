//! `n8n-env-check`: show which settings resolve and whether they are usable.

use anyhow::{Result, bail};
use clap::Parser;
use n8nctl_api::{Config, env_status};

use crate::app::EnvFileArgs;
use crate::output;

/// Check the n8n connection settings.
#[derive(Debug, Parser)]
#[command(name = "n8n-env-check", version, about, long_about = None)]
pub struct EnvCheckCli {
    #[command(flatten)]
    pub env: EnvFileArgs,
}

pub async fn run(cli: EnvCheckCli) -> Result<()> {
    output::heading("Environment check");
    let path = cli.env.path();
    let status = env_status(&path)?;

    println!("\nSettings:");
    println!("{}", "-".repeat(40));
    if status.file_exists {
        output::success(format!("{}: present", path.display()));
    } else {
        output::failure(format!("{}: not found", path.display()));
    }
    for (key, value) in &status.vars {
        match value {
            Some(value) => output::success(format!("{key}: {value}")),
            None => output::failure(format!("{key}: not set")),
        }
    }

    let config = Config::load(&path)?;
    if let Err(error) = config.validate() {
        output::failure(error.to_string());
        bail!("settings are not usable; check {}", path.display());
    }

    println!();
    output::success("All settings look correct");
    Ok(())
}
