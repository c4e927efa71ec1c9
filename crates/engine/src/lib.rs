//! # n8nctl Engine
//!
//! Orchestration that sits between the command line front-ends and the n8n
//! API: deploying local workflow definitions (single file or a whole
//! directory), backing every remote workflow up to disk, deriving webhook
//! URLs and providing the sample workflow used by `create-sample`.
//!
//! All remote access goes through [`n8nctl_api::WorkflowApi`], so the
//! pipelines run unchanged against an in-memory store in tests.
//!
//! ## Modules
//!
//! - **`deploy`**: upsert-by-name deployment with per-run statistics
//! - **`backup`**: one timestamped JSON file per remote workflow
//! - **`webhook`**: URL and curl command construction for webhook nodes
//! - **`sample`**: the two-node sample definition

pub mod backup;
pub mod deploy;
pub mod sample;
pub mod webhook;

pub use backup::{BackupError, BackupReport, backup_file_name, backup_workflows, sanitize_file_name};
pub use deploy::{
    BatchReport, DeployAction, DeployError, DeployOptions, DeployOutcome, DeployPipeline, UNNAMED_WORKFLOW, read_definition,
};
pub use sample::{SAMPLE_WORKFLOW_NAME, sample_workflow};
pub use webhook::{DEFAULT_WEBHOOK_METHOD, WebhookEndpoint, webhook_endpoints};

#[cfg(test)]
pub(crate) mod test_support;
