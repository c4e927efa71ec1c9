//! Strongly typed workflow records exchanged with the platform.
//!
//! [`Workflow`] mirrors the shape returned by `GET /workflows` and
//! `GET /workflows/{id}`. Fields this tool never inspects are kept in `extra`
//! (authoring order is preserved) so a definition can be written to disk and
//! deployed again without losing data.

pub mod validation;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

/// Node type identifier of the platform's HTTP webhook trigger.
pub const WEBHOOK_NODE_TYPE: &str = "n8n-nodes-base.webhook";

/// A workflow definition as owned by the remote platform.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Workflow {
    /// Platform-assigned identifier; absent for local definitions that were never deployed.
    #[serde(
        default,
        deserialize_with = "crate::flexible_id::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    /// Human-readable name. Deploys match existing workflows by this value.
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub active: bool,
    /// Ordered node list. List endpoints may omit it.
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Edges keyed by source node name.
    #[serde(default)]
    pub connections: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<JsonValue>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Workflow {
    /// Display label for the activation state.
    pub fn status_label(&self) -> &'static str {
        if self.active { "active" } else { "inactive" }
    }

    /// Comma separated tag names.
    pub fn tag_names(&self) -> String {
        self.tags.iter().map(Tag::name).collect::<Vec<_>>().join(", ")
    }

    /// Nodes whose type is the platform's webhook trigger, in definition order.
    pub fn webhook_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|node| node.node_type == WEBHOOK_NODE_TYPE)
    }
}

/// One step of a workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Numeric version of the node implementation; the platform uses both
    /// integers and decimals (`1`, `4.2`).
    #[serde(default)]
    pub type_version: JsonValue,
    #[serde(default)]
    pub position: Vec<f64>,
    #[serde(default)]
    pub parameters: Map<String, JsonValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_id: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Node {
    /// Look up a string parameter by key.
    pub fn string_parameter(&self, key: &str) -> Option<&str> {
        self.parameters.get(key).and_then(JsonValue::as_str)
    }
}

/// Workflow tag. Older exports store bare strings, the public API returns objects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Tag {
    Name(String),
    Record {
        #[serde(
            default,
            deserialize_with = "crate::flexible_id::deserialize",
            skip_serializing_if = "Option::is_none"
        )]
        id: Option<String>,
        name: String,
    },
}

impl Tag {
    pub fn name(&self) -> &str {
        match self {
            Tag::Name(name) => name,
            Tag::Record { name, .. } => name,
        }
    }
}
