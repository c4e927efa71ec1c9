//! Shared record types for the n8nctl tool set.
//!
//! Remote payloads (workflows, executions) are modeled as explicit records with
//! optional fields so shape problems surface at deserialization time, while
//! unknown members are preserved for round-tripping back to the platform.

pub mod deploy;
pub mod execution;
pub mod finding;
pub mod workflow;

pub use deploy::DeployStats;
pub use execution::{Execution, ExecutionStatus, ExecutionWorkflowSummary};
pub use finding::{Finding, SecretCategory};
pub use workflow::validation::{ValidationReport, validate_workflow};
pub use workflow::{Node, Tag, WEBHOOK_NODE_TYPE, Workflow};

/// Accepts identifiers that the platform sometimes emits as numbers and
/// sometimes as strings, normalizing both to `String`.
pub(crate) mod flexible_id {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<Value>::deserialize(deserializer)?;
        Ok(match raw {
            Some(Value::String(text)) => Some(text),
            Some(Value::Number(number)) => Some(number.to_string()),
            _ => None,
        })
    }
}
