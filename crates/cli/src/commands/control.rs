//! `n8nctl`: day-to-day workflow management.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use n8nctl_api::{HttpVerb, N8nClient, unwrap_data};
use n8nctl_engine::{DeployAction, DeployOptions, DeployPipeline, webhook_endpoints};
use serde_json::{Map, Value};

use crate::app::EnvFileArgs;
use crate::output;

/// Advanced n8n workflow management.
#[derive(Debug, Parser)]
#[command(name = "n8nctl", version, about, long_about = None)]
pub struct ControlCli {
    #[command(flatten)]
    pub env: EnvFileArgs,

    #[command(subcommand)]
    pub command: ControlCommand,
}

#[derive(Debug, Subcommand)]
pub enum ControlCommand {
    /// Check that the API is reachable with the configured key.
    Test,
    /// List workflows.
    List {
        /// Only show active workflows.
        #[arg(long)]
        active: bool,
    },
    /// Activate a workflow, or deactivate it with --disable.
    Activate {
        /// Workflow id.
        id: String,
        #[arg(long)]
        disable: bool,
    },
    /// Show recent executions.
    Executions {
        /// Only executions of this workflow.
        #[arg(long)]
        workflow_id: Option<String>,
        /// Maximum number of executions.
        #[arg(long, default_value_t = 10)]
        limit: u32,
    },
    /// Print the URLs and curl commands for a workflow's webhook nodes.
    Webhook {
        /// Workflow id.
        id: String,
    },
    /// Update workflow properties.
    Update {
        /// Workflow id.
        id: String,
        /// New workflow name.
        #[arg(long)]
        name: Option<String>,
    },
    /// Create or replace a workflow from a JSON file, matched by name.
    Deploy {
        file: PathBuf,
        /// Activate the workflow after deploying.
        #[arg(long)]
        activate: bool,
    },
}

pub async fn run(cli: ControlCli) -> Result<()> {
    let client = cli.env.connect()?;
    match cli.command {
        ControlCommand::Test => test_connectivity(&client).await,
        ControlCommand::List { active } => list(&client, active).await,
        ControlCommand::Activate { id, disable } => activate(&client, &id, !disable).await,
        ControlCommand::Executions { workflow_id, limit } => executions(&client, workflow_id.as_deref(), limit).await,
        ControlCommand::Webhook { id } => webhook(&client, &id).await,
        ControlCommand::Update { id, name } => update(&client, &id, name).await,
        ControlCommand::Deploy { file, activate } => deploy(client, file, activate).await,
    }
}

fn item_count(page: Value) -> usize {
    match unwrap_data(page) {
        Value::Array(items) => items.len(),
        _ => 0,
    }
}

async fn test_connectivity(client: &N8nClient) -> Result<()> {
    println!("Testing n8n API connection...");
    println!("Host: {}", client.host_url());

    let limit = [("limit", "1".to_string())];
    let workflows = client.request(HttpVerb::Get, "/workflows", None, &limit).await?;
    output::success("API connection succeeded");
    println!("Accessible workflows (first page): {}", item_count(workflows));

    match client.request(HttpVerb::Get, "/executions", None, &limit).await {
        Ok(executions) => println!("Accessible executions (first page): {}", item_count(executions)),
        Err(error) => {
            tracing::debug!(%error, "execution history probe failed");
            output::warning("Could not read execution history (the key may lack permission)");
        }
    }

    output::success("Connection test complete");
    Ok(())
}

async fn list(client: &N8nClient, active_only: bool) -> Result<()> {
    println!("Fetching workflows...");
    let mut workflows = client.list_workflows(active_only.then_some(true), None).await?;
    if active_only {
        workflows.retain(|workflow| workflow.active);
        println!("Showing active workflows");
    } else {
        println!("Showing all workflows");
    }

    if workflows.is_empty() {
        println!("No matching workflows found");
        return Ok(());
    }

    println!("\nFound {} workflows:", workflows.len());
    println!("{}", output::workflows_table(&workflows));
    Ok(())
}

async fn activate(client: &N8nClient, id: &str, active: bool) -> Result<()> {
    let verb = if active { "Activating" } else { "Deactivating" };
    println!("{verb} workflow {id}...");

    let workflow = client.set_active(id, active).await?;
    output::success(format!("Workflow status is now: {}", workflow.status_label()));
    println!("Workflow name: {}", workflow.name);
    Ok(())
}

async fn executions(client: &N8nClient, workflow_id: Option<&str>, limit: u32) -> Result<()> {
    match workflow_id {
        Some(id) => println!("Fetching the last {limit} executions of workflow {id}..."),
        None => println!("Fetching the last {limit} executions..."),
    }

    let executions = client.list_executions(workflow_id, limit).await?;
    if executions.is_empty() {
        println!("No executions found");
        return Ok(());
    }

    println!("\nFound {} executions:", executions.len());
    println!("{}", output::executions_table(&executions));
    Ok(())
}

async fn webhook(client: &N8nClient, id: &str) -> Result<()> {
    println!("Inspecting webhook configuration of workflow {id}...");
    let workflow = client.get_workflow(id).await?;
    let endpoints = webhook_endpoints(client.host_url(), &workflow);

    if endpoints.is_empty() {
        output::failure("This workflow has no webhook nodes");
        return Ok(());
    }

    output::success(format!("Found {} webhook nodes:", endpoints.len()));
    println!();
    for (index, endpoint) in endpoints.iter().enumerate() {
        println!("{}. Node: {}", index + 1, endpoint.node_name);
        println!("   HTTP method: {}", endpoint.http_method);
        println!("   Path: {}", endpoint.path.as_deref().unwrap_or("[not set]"));
        match (&endpoint.url, endpoint.curl_command()) {
            (Some(url), Some(curl)) => {
                println!("   Webhook URL: {url}");
                println!("   Test command: {curl}");
            }
            _ => println!("   Webhook URL: [configure a path on the node]"),
        }
        println!();
    }
    Ok(())
}

/// Fields sent by `update`; empty when nothing was requested.
fn update_fields(name: Option<String>) -> Map<String, Value> {
    let mut fields = Map::new();
    if let Some(name) = name.filter(|name| !name.trim().is_empty()) {
        fields.insert("name".into(), Value::String(name));
    }
    fields
}

async fn update(client: &N8nClient, id: &str, name: Option<String>) -> Result<()> {
    let fields = update_fields(name);
    if fields.is_empty() {
        bail!("no fields to update; pass --name");
    }

    println!("Updating workflow {id}...");
    let workflow = client.patch_workflow(id, &Value::Object(fields)).await?;
    output::success("Workflow updated");
    println!("Workflow ID: {}", workflow.id.as_deref().unwrap_or("N/A"));
    println!("Workflow name: {}", workflow.name);
    println!("Status: {}", workflow.status_label());
    Ok(())
}

async fn deploy(client: N8nClient, file: PathBuf, activate: bool) -> Result<()> {
    println!("Deploying workflow from {}", file.display());
    let options = DeployOptions {
        activate,
        validate: false,
        dry_run: false,
    };

    let mut pipeline = DeployPipeline::new(client);
    let outcome = pipeline.deploy_file(&file, options).await?;

    let action = match outcome.action {
        DeployAction::Created => "created",
        DeployAction::Updated => "updated",
        DeployAction::Skipped => "skipped",
    };
    output::success(format!("Workflow {action}"));
    println!("Workflow ID: {}", outcome.id.as_deref().unwrap_or("N/A"));
    println!("Workflow name: {}", outcome.name);
    if let Some(error) = &outcome.activation_error {
        output::warning(format!("Activation failed: {error}"));
    }
    println!("Status: {}", if outcome.active { "active" } else { "inactive" });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn executions_limit_defaults_to_ten() {
        let cli = ControlCli::try_parse_from(["n8nctl", "executions"]).expect("parses");
        assert!(matches!(
            cli.command,
            ControlCommand::Executions { workflow_id: None, limit: 10 }
        ));
    }

    #[test]
    fn activate_accepts_disable_flag() {
        let cli = ControlCli::try_parse_from(["n8nctl", "activate", "9", "--disable"]).expect("parses");
        assert!(matches!(cli.command, ControlCommand::Activate { id, disable: true } if id == "9"));
    }

    #[test]
    fn update_without_fields_sends_nothing() {
        assert!(update_fields(None).is_empty());
        assert!(update_fields(Some("  ".into())).is_empty());
        assert_eq!(Value::Object(update_fields(Some("Renamed".into()))), json!({ "name": "Renamed" }));
    }

    #[test]
    fn item_count_reads_data_envelope() {
        assert_eq!(item_count(json!({ "data": [1, 2, 3] })), 3);
        assert_eq!(item_count(json!({ "data": {} })), 0);
    }
}
