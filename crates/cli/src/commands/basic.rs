//! `n8n-basic`: list, inspect, run and seed workflows.

use anyhow::Result;
use clap::{Parser, Subcommand};
use n8nctl_api::N8nClient;
use n8nctl_engine::sample_workflow;
use serde_json::Value;

use crate::app::EnvFileArgs;
use crate::output;

/// Basic n8n workflow operations.
#[derive(Debug, Parser)]
#[command(name = "n8n-basic", version, about, long_about = None)]
pub struct BasicCli {
    #[command(flatten)]
    pub env: EnvFileArgs,

    #[command(subcommand)]
    pub command: BasicCommand,
}

#[derive(Debug, Subcommand)]
pub enum BasicCommand {
    /// List every workflow on the instance.
    ListWorkflows,
    /// Show one workflow and its nodes.
    GetWorkflow {
        /// Workflow id.
        id: String,
    },
    /// Trigger a manual run of a workflow.
    Execute {
        /// Workflow id.
        id: String,
    },
    /// Create an inactive two-node sample workflow.
    CreateSample,
}

pub async fn run(cli: BasicCli) -> Result<()> {
    let client = cli.env.connect()?;
    match cli.command {
        BasicCommand::ListWorkflows => list_workflows(&client).await,
        BasicCommand::GetWorkflow { id } => get_workflow(&client, &id).await,
        BasicCommand::Execute { id } => execute(&client, &id).await,
        BasicCommand::CreateSample => create_sample(&client).await,
    }
}

async fn list_workflows(client: &N8nClient) -> Result<()> {
    println!("Fetching workflows...");
    let workflows = client.list_workflows(None, None).await?;
    if workflows.is_empty() {
        println!("No workflows found");
        return Ok(());
    }

    println!("\nFound {} workflows:", workflows.len());
    println!("{}", output::workflows_table(&workflows));
    Ok(())
}

async fn get_workflow(client: &N8nClient, id: &str) -> Result<()> {
    println!("Fetching workflow {id}...");
    let workflow = client.get_workflow(id).await?;

    println!();
    output::heading("Workflow details");
    println!("ID: {}", workflow.id.as_deref().unwrap_or("N/A"));
    println!("Name: {}", workflow.name);
    println!("Status: {}", workflow.status_label());
    println!("Nodes: {}", workflow.nodes.len());
    println!("Connections: {}", workflow.connections.len());
    println!("Version ID: {}", workflow.version_id.as_deref().unwrap_or("N/A"));

    if !workflow.nodes.is_empty() {
        println!("\nNodes:");
        for (index, node) in workflow.nodes.iter().enumerate() {
            println!("  {}. {} ({})", index + 1, node.name, node.node_type);
        }
    }
    Ok(())
}

async fn execute(client: &N8nClient, id: &str) -> Result<()> {
    println!("Executing workflow {id}...");
    let result = client.execute_workflow(id).await?;

    match execution_id(&result) {
        Some(execution_id) => {
            output::success("Workflow executed");
            println!("Execution ID: {execution_id}");
        }
        None => output::warning("Workflow finished but no execution id was returned"),
    }
    Ok(())
}

fn execution_id(result: &Value) -> Option<String> {
    match result.get("executionId")? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

async fn create_sample(client: &N8nClient) -> Result<()> {
    println!("Creating sample workflow...");
    let workflow = client.create_workflow(&sample_workflow()).await?;

    output::success("Sample workflow created");
    println!("Workflow ID: {}", workflow.id.as_deref().unwrap_or("N/A"));
    println!("Workflow name: {}", workflow.name);
    println!("Status: {}", workflow.status_label());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_kebab_case_subcommands() {
        let cli = BasicCli::try_parse_from(["n8n-basic", "get-workflow", "42", "--env-file", "custom.env"]).expect("parses");
        assert_eq!(cli.env.env_file, "custom.env");
        assert!(matches!(cli.command, BasicCommand::GetWorkflow { id } if id == "42"));
    }

    #[test]
    fn execution_id_accepts_strings_and_numbers() {
        assert_eq!(execution_id(&json!({ "executionId": "77" })).as_deref(), Some("77"));
        assert_eq!(execution_id(&json!({ "executionId": 78 })).as_deref(), Some("78"));
        assert_eq!(execution_id(&json!({})), None);
        assert_eq!(execution_id(&Value::Null), None);
    }
}
