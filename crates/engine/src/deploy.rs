//! Deploy local workflow definitions to the platform.
//!
//! Deployment is an upsert keyed by workflow *name*: the remote list is
//! fetched and scanned for an exact name match; a match is replaced in place
//! (PUT), otherwise a new workflow is created (POST). The list and the write
//! are separate requests, so two concurrent deploys of the same name can both
//! create.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use n8nctl_api::{ApiError, WorkflowApi};
use n8nctl_types::{DeployStats, Workflow, validate_workflow};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Name used for definitions that do not declare one.
pub const UNNAMED_WORKFLOW: &str = "Unnamed workflow";

/// Errors for a single deploy. Each one is counted once in [`DeployStats::errors`].
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("could not read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("workflow validation failed: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("deployment failed: {0}")]
    Api(#[from] ApiError),
}

/// Switches accepted by [`DeployPipeline::deploy_file`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployOptions {
    /// Activate the workflow after deployment when it is not already active.
    pub activate: bool,
    /// Run the structural validator before touching the network.
    pub validate: bool,
    /// Stop after validation without issuing any request.
    pub dry_run: bool,
}

impl Default for DeployOptions {
    fn default() -> Self {
        Self {
            activate: false,
            validate: true,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployAction {
    Created,
    Updated,
    /// Dry run; nothing was sent.
    Skipped,
}

/// What happened to one definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOutcome {
    pub action: DeployAction,
    pub id: Option<String>,
    pub name: String,
    /// Whether the workflow is active after this deploy.
    pub active: bool,
    /// Set when activation was requested and the PATCH failed. Not counted as an error.
    pub activation_error: Option<String>,
}

/// Summary of [`DeployPipeline::batch_deploy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub stats: DeployStats,
}

/// Deploys definitions through a [`WorkflowApi`] and keeps run statistics.
pub struct DeployPipeline<A> {
    api: A,
    stats: DeployStats,
}

impl<A: WorkflowApi> DeployPipeline<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            stats: DeployStats::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn stats(&self) -> DeployStats {
        self.stats
    }

    /// Read, parse, optionally validate and upsert the definition in `path`.
    pub async fn deploy_file(&mut self, path: &Path, options: DeployOptions) -> Result<DeployOutcome, DeployError> {
        debug!(path = %path.display(), ?options, "deploying workflow file");
        let definition = match read_definition(path) {
            Ok(definition) => definition,
            Err(error) => {
                self.stats.errors += 1;
                return Err(error);
            }
        };
        self.deploy_definition(&definition, options).await
    }

    /// Upsert an already parsed definition.
    pub async fn deploy_definition(&mut self, definition: &Value, options: DeployOptions) -> Result<DeployOutcome, DeployError> {
        let result = self.try_deploy(definition, options).await;
        if let Err(error) = &result {
            warn!(%error, "workflow deployment failed");
            self.stats.errors += 1;
        }
        result
    }

    async fn try_deploy(&mut self, definition: &Value, options: DeployOptions) -> Result<DeployOutcome, DeployError> {
        let match_name = match_name(definition);
        let name = display_name(definition);

        if options.validate {
            let (is_valid, errors) = validate_workflow(definition).into_parts();
            if !is_valid {
                return Err(DeployError::Invalid(errors));
            }
        }

        if options.dry_run {
            self.stats.skipped += 1;
            info!(%name, "dry run; workflow not sent");
            return Ok(DeployOutcome {
                action: DeployAction::Skipped,
                id: None,
                name,
                active: false,
                activation_error: None,
            });
        }

        let existing = self.api.list_workflows().await?;
        let matched = match_name.and_then(|wanted| {
            existing
                .iter()
                .find(|workflow| workflow.name == wanted)
                .and_then(|workflow| workflow.id.clone())
        });

        let (action, deployed) = match matched {
            Some(id) => {
                info!(%name, %id, "replacing workflow with matching name");
                let deployed = self.api.replace_workflow(&id, definition).await?;
                self.stats.updated += 1;
                (DeployAction::Updated, deployed)
            }
            None => {
                info!(%name, "creating workflow");
                let deployed = self.api.create_workflow(definition).await?;
                self.stats.created += 1;
                (DeployAction::Created, deployed)
            }
        };

        let mut outcome = DeployOutcome {
            action,
            id: deployed.id.clone(),
            name,
            active: deployed.active,
            activation_error: None,
        };

        if options.activate && !deployed.active {
            match self.activate(&deployed).await {
                Ok(()) => outcome.active = true,
                Err(message) => {
                    warn!(name = %outcome.name, %message, "workflow deployed but activation failed");
                    outcome.activation_error = Some(message);
                }
            }
        }

        Ok(outcome)
    }

    async fn activate(&mut self, deployed: &Workflow) -> Result<(), String> {
        let id = deployed
            .id
            .as_deref()
            .ok_or_else(|| "deployed workflow has no id".to_string())?;
        self.api.set_active(id, true).await.map_err(|error| error.to_string())?;
        self.stats.activated += 1;
        Ok(())
    }

    /// Deploy every `*.json` file directly inside `dir`, in file name order.
    ///
    /// Statistics are reset first. A failing file is counted and reported
    /// through `on_file` and the batch moves on to the next one.
    pub async fn batch_deploy<F>(&mut self, dir: &Path, options: DeployOptions, mut on_file: F) -> Result<BatchReport, DeployError>
    where
        F: FnMut(&Path, &Result<DeployOutcome, DeployError>),
    {
        self.stats.reset();
        let files = json_files(dir).map_err(|source| DeployError::Read {
            path: dir.to_path_buf(),
            source,
        })?;
        info!(dir = %dir.display(), count = files.len(), "starting batch deploy");

        let mut succeeded = 0;
        for file in &files {
            let result = self.deploy_file(file, options).await;
            if result.is_ok() {
                succeeded += 1;
            }
            on_file(file, &result);
        }

        Ok(BatchReport {
            total: files.len(),
            succeeded,
            stats: self.stats,
        })
    }
}

/// Name used to find an existing workflow to replace.
///
/// A missing `name` matches [`UNNAMED_WORKFLOW`]. A `name` that is present but
/// not a string matches nothing, so the definition is always created.
fn match_name(definition: &Value) -> Option<&str> {
    match definition.get("name") {
        None => Some(UNNAMED_WORKFLOW),
        Some(Value::String(name)) => Some(name.as_str()),
        Some(_) => None,
    }
}

fn display_name(definition: &Value) -> String {
    match definition.get("name") {
        None => UNNAMED_WORKFLOW.to_string(),
        Some(Value::String(name)) => name.clone(),
        Some(other) => other.to_string(),
    }
}

/// Read and parse one definition file.
pub fn read_definition(path: &Path) -> Result<Value, DeployError> {
    let content = fs::read_to_string(path).map_err(|source| DeployError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| DeployError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn json_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let hidden = path
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.starts_with('.'));
        if !hidden && path.is_file() && path.extension().is_some_and(|extension| extension == "json") {
            files.push(path);
        }
    }
    files.sort_by(|left, right| left.file_name().cmp(&right.file_name()));
    Ok(files)
}
