//! Execution history records. These are owned by the platform and only read here.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Reported state of an execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ExecutionStatus {
    Success,
    Error,
    Running,
    Waiting,
    /// Any status this tool does not know about, kept verbatim.
    Other(String),
}

impl From<String> for ExecutionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "success" => Self::Success,
            "error" => Self::Error,
            "running" => Self::Running,
            "waiting" => Self::Waiting,
            _ => Self::Other(value),
        }
    }
}

impl From<ExecutionStatus> for String {
    fn from(value: ExecutionStatus) -> Self {
        value.to_string()
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Error => f.write_str("error"),
            Self::Running => f.write_str("running"),
            Self::Waiting => f.write_str("waiting"),
            Self::Other(raw) => f.write_str(raw),
        }
    }
}

impl Default for ExecutionStatus {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

/// Subset of the workflow embedded in an execution record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionWorkflowSummary {
    #[serde(default)]
    pub name: Option<String>,
}

/// One entry of `GET /executions`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Execution {
    #[serde(default, deserialize_with = "crate::flexible_id::deserialize")]
    pub id: Option<String>,
    #[serde(default)]
    pub status: ExecutionStatus,
    #[serde(default)]
    pub started_at: Option<String>,
    #[serde(default)]
    pub stopped_at: Option<String>,
    #[serde(default, deserialize_with = "crate::flexible_id::deserialize")]
    pub workflow_id: Option<String>,
    #[serde(default)]
    pub workflow_data: Option<ExecutionWorkflowSummary>,
}

impl Execution {
    pub fn workflow_name(&self) -> Option<&str> {
        self.workflow_data.as_ref().and_then(|data| data.name.as_deref())
    }

    /// Parsed start timestamp; `None` when absent or not ISO-8601.
    pub fn started(&self) -> Option<DateTime<FixedOffset>> {
        self.started_at.as_deref().and_then(parse_timestamp)
    }

    /// Parsed stop timestamp; `None` when absent or not ISO-8601.
    pub fn stopped(&self) -> Option<DateTime<FixedOffset>> {
        self.stopped_at.as_deref().and_then(parse_timestamp)
    }

    /// Wall-clock run time in seconds when both timestamps parse.
    pub fn duration_seconds(&self) -> Option<f64> {
        let started = self.started()?;
        let stopped = self.stopped()?;
        Some((stopped - started).num_milliseconds() as f64 / 1000.0)
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_strings_map_to_variants() {
        let parsed: Vec<ExecutionStatus> = ["success", "error", "running", "waiting", "canceled"]
            .into_iter()
            .map(|raw| ExecutionStatus::from(raw.to_string()))
            .collect();

        assert_eq!(
            parsed,
            vec![
                ExecutionStatus::Success,
                ExecutionStatus::Error,
                ExecutionStatus::Running,
                ExecutionStatus::Waiting,
                ExecutionStatus::Other("canceled".into()),
            ]
        );
        assert_eq!(parsed[4].to_string(), "canceled");
    }

    #[test]
    fn execution_duration_uses_both_timestamps() {
        let execution: Execution = serde_json::from_value(json!({
            "id": 1021,
            "status": "success",
            "startedAt": "2024-05-01T10:00:00.000Z",
            "stoppedAt": "2024-05-01T10:00:02.500Z",
            "workflowId": "wf-1",
            "workflowData": { "name": "Daily sync" }
        }))
        .expect("deserialize execution");

        assert_eq!(execution.id.as_deref(), Some("1021"));
        assert_eq!(execution.workflow_name(), Some("Daily sync"));
        assert_eq!(execution.duration_seconds(), Some(2.5));
    }

    #[test]
    fn running_execution_has_no_duration() {
        let execution: Execution = serde_json::from_value(json!({
            "id": "9",
            "status": "running",
            "startedAt": "2024-05-01T10:00:00Z",
            "stoppedAt": null
        }))
        .expect("deserialize execution");

        assert_eq!(execution.status, ExecutionStatus::Running);
        assert!(execution.duration_seconds().is_none());
        assert!(execution.workflow_name().is_none());
    }
}
