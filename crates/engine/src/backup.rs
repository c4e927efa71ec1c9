//! Back up every remote workflow as a local JSON file.
//!
//! The list endpoint only returns summaries, so each workflow's full
//! definition is fetched on its own. Files are named
//! `{sanitized name}_{id}_{timestamp}.json`; one timestamp is shared by the
//! whole run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use n8nctl_api::{ApiError, WorkflowApi};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Substitute for names that sanitize to nothing.
pub const UNNAMED_FILE_STEM: &str = "unnamed_workflow";

/// Failures that stop a backup run before any workflow is written.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("could not create backup directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not list workflows: {0}")]
    List(#[source] ApiError),
}

/// Result of [`backup_workflows`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupReport {
    /// `(workflow name, written file)` in list order.
    pub written: Vec<(String, PathBuf)>,
    /// `(workflow name, error message)` for workflows that could not be saved.
    pub failures: Vec<(String, String)>,
}

impl BackupReport {
    pub fn total(&self) -> usize {
        self.written.len() + self.failures.len()
    }
}

/// Reduce a workflow name to a token safe for file names.
///
/// Alphanumerics (any script), spaces, `-` and `_` are kept, trailing
/// whitespace is trimmed and spaces become `_`.
///
/// ```rust
/// use n8nctl_engine::sanitize_file_name;
///
/// assert_eq!(sanitize_file_name("My: Workflow/Test"), "My_WorkflowTest");
/// assert_eq!(sanitize_file_name("???"), "unnamed_workflow");
/// ```
pub fn sanitize_file_name(name: &str) -> String {
    let kept: String = name
        .chars()
        .filter(|ch| ch.is_alphanumeric() || matches!(ch, ' ' | '-' | '_'))
        .collect();
    let sanitized = kept.trim_end().replace(' ', "_");
    if sanitized.is_empty() {
        UNNAMED_FILE_STEM.to_string()
    } else {
        sanitized
    }
}

pub fn backup_file_name(name: &str, id: &str, timestamp: &str) -> String {
    format!("{}_{id}_{timestamp}.json", sanitize_file_name(name))
}

/// Write the full definition of every workflow into `output_dir`.
///
/// The directory is created when missing. A workflow whose fetch or write
/// fails is recorded in [`BackupReport::failures`] and the run continues.
pub async fn backup_workflows<A>(api: &A, output_dir: &Path, timestamp: &str) -> Result<BackupReport, BackupError>
where
    A: WorkflowApi + ?Sized,
{
    fs::create_dir_all(output_dir).map_err(|source| BackupError::CreateDir {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let workflows = api.list_workflows().await.map_err(BackupError::List)?;
    info!(count = workflows.len(), dir = %output_dir.display(), "backing up workflows");

    let mut report = BackupReport::default();
    for workflow in workflows {
        let name = if workflow.name.is_empty() {
            UNNAMED_FILE_STEM.to_string()
        } else {
            workflow.name.clone()
        };

        let Some(id) = workflow.id.as_deref() else {
            warn!(%name, "skipping workflow without id");
            report.failures.push((name, "workflow has no id".to_string()));
            continue;
        };

        let path = output_dir.join(backup_file_name(&name, id, timestamp));
        match save_definition(api, id, &path).await {
            Ok(()) => {
                debug!(%name, path = %path.display(), "workflow backed up");
                report.written.push((name, path));
            }
            Err(message) => {
                warn!(%name, %id, %message, "workflow backup failed");
                report.failures.push((name, message));
            }
        }
    }

    Ok(report)
}

async fn save_definition<A>(api: &A, id: &str, path: &Path) -> Result<(), String>
where
    A: WorkflowApi + ?Sized,
{
    let definition = api
        .fetch_workflow_definition(id)
        .await
        .map_err(|error| error.to_string())?;
    let rendered = serde_json::to_string_pretty(&definition).map_err(|error| error.to_string())?;
    fs::write(path, rendered).map_err(|error| format!("could not write {}: {error}", path.display()))
}
