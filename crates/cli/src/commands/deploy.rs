//! `n8n-deploy`: validate, deploy, batch-deploy and back up workflows.

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use n8nctl_engine::{
    DeployAction, DeployError, DeployOptions, DeployOutcome, DeployPipeline, backup_workflows, read_definition,
};
use n8nctl_types::validate_workflow;
use n8nctl_util::{expand_tilde, local_file_timestamp};

use crate::app::EnvFileArgs;
use crate::output;

/// Deployment pipeline for n8n workflow definitions.
#[derive(Debug, Parser)]
#[command(name = "n8n-deploy", version, about, long_about = None)]
pub struct DeployCli {
    #[command(flatten)]
    pub env: EnvFileArgs,

    #[command(subcommand)]
    pub command: DeployCommand,
}

/// Switches shared by `deploy` and `batch-deploy`.
#[derive(Debug, Clone, Copy, Args)]
pub struct DeployFlags {
    /// Activate workflows after deploying.
    #[arg(long)]
    pub activate: bool,
    /// Skip the structural validation step.
    #[arg(long)]
    pub no_validate: bool,
    /// Validate only; send nothing to the instance.
    #[arg(long)]
    pub dry_run: bool,
}

impl From<DeployFlags> for DeployOptions {
    fn from(flags: DeployFlags) -> Self {
        DeployOptions {
            activate: flags.activate,
            validate: !flags.no_validate,
            dry_run: flags.dry_run,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum DeployCommand {
    /// Deploy a single workflow JSON file.
    Deploy {
        file: PathBuf,
        #[command(flatten)]
        flags: DeployFlags,
    },
    /// Deploy every *.json file in a directory.
    BatchDeploy {
        dir: PathBuf,
        #[command(flatten)]
        flags: DeployFlags,
    },
    /// Check a workflow JSON file without deploying it.
    Validate { file: PathBuf },
    /// Save every workflow on the instance as a JSON file.
    Backup {
        /// Directory receiving the backup files.
        #[arg(long, default_value = "n8n_backup")]
        output_dir: String,
    },
}

pub async fn run(cli: DeployCli) -> Result<()> {
    match cli.command {
        DeployCommand::Validate { file } => validate(&file),
        DeployCommand::Deploy { file, flags } => deploy(&cli.env, &file, flags.into()).await,
        DeployCommand::BatchDeploy { dir, flags } => batch_deploy(&cli.env, &dir, flags.into()).await,
        DeployCommand::Backup { output_dir } => backup(&cli.env, &expand_tilde(&output_dir)).await,
    }
}

fn validate(file: &Path) -> Result<()> {
    println!("Validating {}", file.display());
    let definition = read_definition(file)?;
    let report = validate_workflow(&definition);

    if report.is_valid() {
        output::success("Workflow structure is valid");
        return Ok(());
    }

    output::failure("Workflow validation failed:");
    for error in &report.errors {
        println!("   - {error}");
    }
    bail!("{} validation errors in {}", report.errors.len(), file.display())
}

fn report_file(file: &Path, result: &Result<DeployOutcome, DeployError>) {
    println!("\nFile: {}", file.display());
    match result {
        Ok(outcome) => {
            println!("Workflow name: {}", outcome.name);
            match outcome.action {
                DeployAction::Skipped => output::success("Validation passed (dry run, nothing sent)"),
                DeployAction::Created => output::success(format!(
                    "Workflow created (ID: {})",
                    outcome.id.as_deref().unwrap_or("N/A")
                )),
                DeployAction::Updated => output::success(format!(
                    "Existing workflow with the same name updated (ID: {})",
                    outcome.id.as_deref().unwrap_or("N/A")
                )),
            }
            if let Some(error) = &outcome.activation_error {
                output::warning(format!("Activation failed: {error}"));
            }
            if outcome.action != DeployAction::Skipped {
                println!("Status: {}", if outcome.active { "active" } else { "inactive" });
            }
        }
        Err(DeployError::Invalid(errors)) => {
            output::failure("Workflow validation failed:");
            for error in errors {
                println!("   - {error}");
            }
        }
        Err(error) => output::failure(error.to_string()),
    }
}

/// Deploy one file. Failure details go to the per-file report; the returned
/// error only names the file.
async fn deploy(env: &EnvFileArgs, file: &Path, options: DeployOptions) -> Result<()> {
    let mut pipeline = DeployPipeline::new(env.connect()?);
    let result = pipeline.deploy_file(file, options).await;
    report_file(file, &result);
    if result.is_err() {
        bail!("{} was not deployed", file.display());
    }
    Ok(())
}

async fn batch_deploy(env: &EnvFileArgs, dir: &Path, options: DeployOptions) -> Result<()> {
    println!("Scanning directory {}", dir.display());
    let mut pipeline = DeployPipeline::new(env.connect()?);
    let report = pipeline.batch_deploy(dir, options, report_file).await?;

    if report.total == 0 {
        output::failure("No JSON files found in the directory");
        return Ok(());
    }

    println!();
    output::heading("Deployment report");
    println!("{}", output::deploy_report_table(report.total, report.succeeded, &report.stats));

    if report.stats.has_errors() {
        bail!("{} files failed to deploy; see the messages above", report.stats.errors);
    }
    output::success("All workflows deployed");
    Ok(())
}

async fn backup(env: &EnvFileArgs, output_dir: &Path) -> Result<()> {
    println!("Backing up workflows to {}", output_dir.display());
    let client = env.connect()?;
    let report = backup_workflows(&client, output_dir, &local_file_timestamp()).await?;

    if report.total() == 0 {
        output::failure("No workflows found");
        return Ok(());
    }

    for (name, path) in &report.written {
        let file_name = path.file_name().map(|name| name.to_string_lossy()).unwrap_or_default();
        output::success(format!("Backed up: {name} -> {file_name}"));
    }
    for (name, message) in &report.failures {
        output::failure(format!("Backup failed for {name}: {message}"));
    }

    println!(
        "\nBackup complete: {} of {} workflows saved to {}",
        report.written.len(),
        report.total(),
        output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn flags_map_onto_options() {
        let cli = DeployCli::try_parse_from(["n8n-deploy", "deploy", "flow.json", "--no-validate", "--activate"]).expect("parses");
        let DeployCommand::Deploy { flags, .. } = cli.command else {
            panic!("expected deploy");
        };
        assert_eq!(
            DeployOptions::from(flags),
            DeployOptions {
                activate: true,
                validate: false,
                dry_run: false
            }
        );
    }

    #[test]
    fn backup_directory_has_a_default() {
        let cli = DeployCli::try_parse_from(["n8n-deploy", "backup"]).expect("parses");
        assert!(matches!(cli.command, DeployCommand::Backup { output_dir } if output_dir == "n8n_backup"));
    }

    #[tokio::test]
    async fn failed_deploy_error_does_not_repeat_the_report() {
        let dir = tempfile::tempdir().expect("tempdir");
        let env_file = dir.path().join(".env");
        fs::write(&env_file, "N8N_HOST_URL=http://127.0.0.1:9
N8N_API_KEY=abcdefghijklmnop
").expect("write");
        let missing = dir.path().join("missing.json");
        let env = EnvFileArgs {
            env_file: env_file.display().to_string(),
        };

        let error = deploy(&env, &missing, DeployOptions::default())
            .await
            .expect_err("missing file fails");

        assert_eq!(error.to_string(), format!("{} was not deployed", missing.display()));
        assert!(error.chain().count() == 1);
    }

    #[test]
    fn validate_reports_structural_errors() {
        let dir = tempfile::tempdir().expect("tempdir");
        let valid = dir.path().join("valid.json");
        let invalid = dir.path().join("invalid.json");
        fs::write(&valid, r#"{"name":"x","nodes":[],"connections":{}}"#).expect("write");
        fs::write(&invalid, r#"{"name":"  ","nodes":{}}"#).expect("write");

        assert!(validate(&valid).is_ok());
        assert!(validate(&invalid).is_err());
        assert!(validate(&dir.path().join("missing.json")).is_err());
    }
}
