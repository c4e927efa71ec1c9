//! n8n public API access.
//!
//! This crate covers everything between the command line and the remote
//! instance:
//!
//! - [`Config`]: the host URL and API key, read from a `.env` file and the
//!   process environment, validated once at startup
//! - [`N8nClient`]: a `reqwest` client bound to `{host}/api/v1` that attaches
//!   the `X-N8N-API-KEY` header and turns non-2xx responses into [`ApiError`]
//! - [`WorkflowApi`]: the narrow async seam the deploy and backup
//!   orchestration depends on
//!
//! # Example
//!
//! ```ignore
//! use n8nctl_api::{Config, HttpVerb, N8nClient};
//!
//! async fn count_workflows() -> anyhow::Result<usize> {
//!     let config = Config::load(".env".as_ref())?;
//!     let client = N8nClient::new(&config)?;
//!     let workflows = client.list_workflows(None, None).await?;
//!     Ok(workflows.len())
//! }
//! ```

mod client;
mod config;
mod error;
mod workflow_api;

pub use client::{API_BASE_PATH, API_KEY_HEADER, HttpVerb, N8nClient, unwrap_data};
pub use config::{
    API_KEY_VAR, Config, ConfigError, DEFAULT_ENV_FILE, EnvFile, EnvFileWarning, EnvStatus, HOST_URL_VAR,
    MIN_API_KEY_LENGTH, REQUIRED_VARS, env_status, load_env_file, parse_env_file,
};
pub use error::{ApiError, ErrorDetail};
pub use workflow_api::WorkflowApi;
