//! `n8n-setup`: collect connection settings and smoke-test them.

use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use dialoguer::{Input, Password};
use n8nctl_api::{API_KEY_VAR, ApiError, Config, HOST_URL_VAR, HttpVerb, N8nClient, unwrap_data};
use serde_json::Value;

use crate::app::EnvFileArgs;
use crate::output;

/// Requests made by the smoke test give up after this long.
pub const SMOKE_TEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Interactive setup for the n8n tools.
#[derive(Debug, Parser)]
#[command(name = "n8n-setup", version, about, long_about = None)]
pub struct SetupCli {
    #[command(flatten)]
    pub env: EnvFileArgs,
}

pub async fn run(cli: SetupCli) -> Result<()> {
    output::heading("n8n tools setup");

    let (config, prompted) = match cli.env.load_config() {
        Ok(config) => {
            output::success("Settings already configured:");
            println!("   {HOST_URL_VAR}: {}", config.host_url());
            println!("   {API_KEY_VAR}: {}", config.masked_api_key());
            (config, false)
        }
        Err(error) => {
            tracing::debug!(%error, "settings incomplete; prompting");
            let config = tokio::task::spawn_blocking(prompt_settings)
                .await
                .context("settings prompt was aborted")??;
            (config, true)
        }
    };

    if let Err(error) = config.validate() {
        output::warning(error.to_string());
    }

    if !smoke_test(&config).await {
        output::failure("Setup incomplete; fix the connection problem and try again");
        bail!("connection test failed");
    }

    output::success("Setup complete. The n8n tools are ready");
    print_usage_examples();
    print_shell_aliases();
    if prompted {
        print_exports(&config);
    }
    println!("\nTip: run `n8nctl test` at any time to re-check the connection.");
    Ok(())
}

fn prompt_settings() -> Result<Config> {
    println!("\nConfigure the connection to your n8n instance.");
    let host_url: String = Input::new()
        .with_prompt("n8n host URL")
        .validate_with(|input: &String| -> Result<(), &'static str> {
            let input = input.trim();
            if input.starts_with("http://") || input.starts_with("https://") {
                Ok(())
            } else {
                Err("the URL must start with http:// or https://")
            }
        })
        .interact_text()?;
    let api_key = Password::new().with_prompt("n8n API key").interact()?;

    if api_key.trim().is_empty() {
        bail!("an API key is required");
    }
    Ok(Config::new(host_url, api_key))
}

/// `GET /workflows` with a short timeout. Prints the outcome and returns whether it succeeded.
async fn smoke_test(config: &Config) -> bool {
    println!("\nTesting the n8n API connection...");
    let result: Result<Value, ApiError> = async {
        let client = N8nClient::with_timeout(config, SMOKE_TEST_TIMEOUT)?;
        client.request(HttpVerb::Get, "/workflows", None, &[]).await
    }
    .await;

    match result {
        Ok(page) => {
            let count = match unwrap_data(page) {
                Value::Array(items) => items.len(),
                _ => 0,
            };
            output::success("n8n API connection succeeded");
            println!("Accessible workflows: {count}");
            true
        }
        Err(error) => {
            output::failure(format!("n8n API connection failed: {error}"));
            println!("\nPlease check:");
            println!("1. The n8n instance is running");
            println!("2. The API key is correct");
            println!("3. The network connection works");
            false
        }
    }
}

fn print_usage_examples() {
    println!("\nUsage examples:");
    println!("\n1. Basic workflow management:");
    println!("   n8n-basic list-workflows");
    println!("   n8n-basic get-workflow <WORKFLOW_ID>");
    println!("   n8n-basic execute <WORKFLOW_ID>");
    println!("   n8n-basic create-sample");
    println!("\n2. Day-to-day operations:");
    println!("   n8nctl test");
    println!("   n8nctl list --active");
    println!("   n8nctl activate <WORKFLOW_ID>");
    println!("   n8nctl executions --workflow-id <ID> --limit 10");
    println!("   n8nctl webhook <WORKFLOW_ID>");
    println!("\n3. Automated deployment:");
    println!("   n8n-deploy deploy workflow.json --activate");
    println!("   n8n-deploy batch-deploy ./workflows --activate");
    println!("   n8n-deploy backup --output-dir ./backup");
    println!("   n8n-deploy validate workflow.json");
}

fn print_shell_aliases() {
    println!("\nSuggested shell aliases (add to ~/.bashrc or ~/.zshrc):");
    println!("alias n8n-list='n8n-basic list-workflows'");
    println!("alias n8n-test='n8nctl test'");
    println!("alias n8n-push='n8n-deploy deploy'");
    println!("alias n8n-backup='n8n-deploy backup'");
}

fn print_exports(config: &Config) {
    println!("\nTo keep these settings, add them to your .env file or shell profile:");
    println!("export {HOST_URL_VAR}=\"{}\"", config.host_url());
    println!("export {API_KEY_VAR}=\"{}\"", config.api_key());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn smoke_test_reports_reachable_instance() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/workflows")
            .with_status(200)
            .with_body(r#"{"data":[{"id":"1","name":"One"},{"id":"2","name":"Two"}]}"#)
            .create_async()
            .await;

        assert!(smoke_test(&Config::new(server.url(), "abcdefghijklmnop")).await);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn smoke_test_fails_on_rejected_key() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/api/v1/workflows")
            .with_status(401)
            .with_body(r#"{"message":"unauthorized"}"#)
            .create_async()
            .await;

        assert!(!smoke_test(&Config::new(server.url(), "wrong-key-123")).await);
    }
}
