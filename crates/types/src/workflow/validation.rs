//! Structural checks applied to workflow definitions before they are deployed.
//!
//! Every rule runs independently and all violations are collected:
//! - The top-level object must contain `name`, `nodes` and `connections`.
//! - `nodes` must be an array of objects that each carry `type`,
//!   `typeVersion`, `position`, `id` and `name`.
//! - `connections` must be an object.
//! - `name` must be a string that is not blank.
//!
//! A member of the wrong container kind is reported once and its contents are
//! not inspected further. Connection targets are not checked against node names.

use serde_json::Value;

/// Members every workflow definition must declare.
pub const REQUIRED_WORKFLOW_FIELDS: [&str; 3] = ["name", "nodes", "connections"];

/// Members every node object must declare.
pub const REQUIRED_NODE_FIELDS: [&str; 5] = ["type", "typeVersion", "position", "id", "name"];

/// Outcome of [`validate_workflow`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Split into the `(is_valid, errors)` pair callers usually branch on.
    pub fn into_parts(self) -> (bool, Vec<String>) {
        (self.errors.is_empty(), self.errors)
    }
}

/// Validate a parsed workflow definition against the minimal shape contract.
pub fn validate_workflow(definition: &Value) -> ValidationReport {
    let mut errors = Vec::new();

    let Some(object) = definition.as_object() else {
        errors.push("workflow definition must be a JSON object".to_string());
        return ValidationReport { errors };
    };

    for field in REQUIRED_WORKFLOW_FIELDS {
        if !object.contains_key(field) {
            errors.push(format!("missing required field: {field}"));
        }
    }

    if let Some(nodes) = object.get("nodes") {
        match nodes.as_array() {
            Some(nodes) => {
                for (index, node) in nodes.iter().enumerate() {
                    let Some(node) = node.as_object() else {
                        errors.push(format!("node {index} must be an object"));
                        continue;
                    };
                    for field in REQUIRED_NODE_FIELDS {
                        if !node.contains_key(field) {
                            errors.push(format!("node {index} is missing required field: {field}"));
                        }
                    }
                }
            }
            None => errors.push("nodes must be an array".to_string()),
        }
    }

    if let Some(connections) = object.get("connections")
        && !connections.is_object()
    {
        errors.push("connections must be an object".to_string());
    }

    if let Some(name) = object.get("name") {
        let is_blank = name.as_str().map(|text| text.trim().is_empty()).unwrap_or(true);
        if is_blank {
            errors.push("workflow name must be a non-empty string".to_string());
        }
    }

    ValidationReport { errors }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn node(id: &str) -> Value {
        json!({
            "type": "n8n-nodes-base.set",
            "typeVersion": 1,
            "position": [0, 0],
            "id": id,
            "name": format!("Node {id}")
        })
    }

    #[test]
    fn minimal_definition_is_valid() {
        let report = validate_workflow(&json!({ "name": "x", "nodes": [], "connections": {} }));
        assert!(report.is_valid());
        assert!(report.errors.is_empty());
    }

    #[test]
    fn each_missing_top_level_field_is_reported() {
        let report = validate_workflow(&json!({}));
        assert!(!report.is_valid());
        for field in REQUIRED_WORKFLOW_FIELDS {
            assert!(
                report.errors.iter().any(|error| error.contains(field)),
                "expected an error for {field}: {:?}",
                report.errors
            );
        }
    }

    #[test]
    fn single_missing_field_fails_validation() {
        for missing in REQUIRED_WORKFLOW_FIELDS {
            let mut definition = json!({ "name": "x", "nodes": [], "connections": {} });
            definition.as_object_mut().unwrap().remove(missing);
            let (is_valid, errors) = validate_workflow(&definition).into_parts();
            assert!(!is_valid);
            assert_eq!(errors, vec![format!("missing required field: {missing}")]);
        }
    }

    #[test]
    fn node_missing_id_reports_index_once() {
        let mut broken = node("b");
        broken.as_object_mut().unwrap().remove("id");
        let definition = json!({
            "name": "x",
            "nodes": [node("a"), broken, node("c")],
            "connections": {}
        });

        let report = validate_workflow(&definition);

        assert_eq!(report.errors, vec!["node 1 is missing required field: id".to_string()]);
    }

    #[test]
    fn wrong_container_kinds_are_reported_once_without_descending() {
        let definition = json!({
            "name": "x",
            "nodes": { "0": { "type": "nope" } },
            "connections": []
        });

        let report = validate_workflow(&definition);

        assert_eq!(
            report.errors,
            vec!["nodes must be an array".to_string(), "connections must be an object".to_string()]
        );
    }

    #[test]
    fn non_object_node_is_reported_and_remaining_nodes_checked() {
        let definition = json!({ "name": "x", "nodes": ["bad", {}], "connections": {} });

        let report = validate_workflow(&definition);

        assert_eq!(report.errors[0], "node 0 must be an object");
        assert_eq!(report.errors.len(), 1 + REQUIRED_NODE_FIELDS.len());
    }

    #[test]
    fn blank_or_non_string_name_is_rejected() {
        for name in [json!("   "), json!(""), json!(17)] {
            let report = validate_workflow(&json!({ "name": name, "nodes": [], "connections": {} }));
            assert_eq!(report.errors, vec!["workflow name must be a non-empty string".to_string()]);
        }
    }

    #[test]
    fn non_object_definition_is_rejected() {
        let report = validate_workflow(&json!([1, 2, 3]));
        assert!(!report.is_valid());
        assert_eq!(report.errors.len(), 1);
    }
}
