//! Process-level plumbing shared by every binary.

use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Result, anyhow};
use clap::Args;
use console::style;
use n8nctl_api::{API_KEY_VAR, Config, ConfigError, DEFAULT_ENV_FILE, HOST_URL_VAR, N8nClient};
use n8nctl_util::expand_tilde;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Location of the `KEY=VALUE` settings file.
#[derive(Debug, Clone, Args)]
pub struct EnvFileArgs {
    /// Settings file holding N8N_HOST_URL and N8N_API_KEY.
    #[arg(long = "env-file", value_name = "PATH", default_value = DEFAULT_ENV_FILE, global = true)]
    pub env_file: String,
}

impl EnvFileArgs {
    pub fn path(&self) -> PathBuf {
        expand_tilde(&self.env_file)
    }

    /// Load settings from the env file layered over the process environment.
    pub fn load_config(&self) -> Result<Config> {
        let path = self.path();
        debug!(path = %path.display(), "loading configuration");
        Config::load(&path).map_err(|error| match error {
            ConfigError::MissingVars(_) => anyhow!(
                "{error}\nHint: add {HOST_URL_VAR} and {API_KEY_VAR} to {} or export them:\n  export {HOST_URL_VAR}='https://your-n8n-host'\n  export {API_KEY_VAR}='your-api-key'",
                path.display()
            ),
            other => anyhow!(other),
        })
    }

    /// Load settings and build an API client from them.
    pub fn connect(&self) -> Result<N8nClient> {
        let config = self.load_config()?;
        Ok(N8nClient::new(&config)?)
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides the default `warn` level.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Drive a command to completion, mapping its result to the process exit code.
///
/// Errors are printed to stderr and exit with 1. Ctrl-C abandons the command
/// and also exits with 1. If the signal handler cannot be installed the
/// command simply runs to completion.
pub async fn run_until_interrupted<F>(command: F) -> ExitCode
where
    F: Future<Output = Result<()>>,
{
    tokio::select! {
        result = command => match result {
            Ok(()) => ExitCode::SUCCESS,
            Err(error) => {
                eprintln!("{} {error:#}", style("Error:").red().bold());
                ExitCode::FAILURE
            }
        },
        Ok(()) = tokio::signal::ctrl_c() => {
            eprintln!("\n{}", style("Operation interrupted").yellow());
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_settings_error_carries_a_hint() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("partial.env");
        fs::write(&path, format!("{HOST_URL_VAR}=https://n8n.local\n{API_KEY_VAR}=\n")).expect("write");

        let args = EnvFileArgs {
            env_file: path.display().to_string(),
        };
        temp_env::with_var_unset(API_KEY_VAR, || {
            let message = args.load_config().expect_err("api key missing").to_string();
            assert!(message.contains(API_KEY_VAR));
            assert!(message.contains("Hint:"));
        });
    }

    fn same_code(left: ExitCode, right: ExitCode) -> bool {
        format!("{left:?}") == format!("{right:?}")
    }

    #[tokio::test]
    async fn command_result_maps_to_exit_code() {
        let finished = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let flag = finished.clone();
        let code = run_until_interrupted(async move {
            tokio::task::yield_now().await;
            flag.store(true, std::sync::atomic::Ordering::SeqCst);
            Ok(())
        })
        .await;

        assert!(same_code(code, ExitCode::SUCCESS));
        assert!(finished.load(std::sync::atomic::Ordering::SeqCst));

        let code = run_until_interrupted(async { Err(anyhow!("boom")) }).await;
        assert!(same_code(code, ExitCode::FAILURE));
    }

    #[test]
    fn complete_file_builds_a_client() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(".env");
        fs::write(&path, format!("{HOST_URL_VAR}=https://n8n.local/\n{API_KEY_VAR}=abcdefghijklmnop\n")).expect("write");

        let args = EnvFileArgs {
            env_file: path.display().to_string(),
        };
        let client = args.connect().expect("client");
        assert_eq!(client.host_url(), "https://n8n.local");
    }
}
