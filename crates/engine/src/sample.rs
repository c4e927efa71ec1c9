use serde_json::{Value, json};

/// Name of the workflow created by `create-sample`.
pub const SAMPLE_WORKFLOW_NAME: &str = "Sample workflow - basic test";

/// A minimal inactive workflow: a Start node feeding a Set node that writes
/// a greeting.
pub fn sample_workflow() -> Value {
    json!({
        "name": SAMPLE_WORKFLOW_NAME,
        "nodes": [
            {
                "parameters": {},
                "type": "n8n-nodes-base.start",
                "typeVersion": 1,
                "position": [240, 300],
                "id": "start-node",
                "name": "Start"
            },
            {
                "parameters": {
                    "values": {
                        "string": [
                            { "name": "message", "value": "Hello from n8n API!" }
                        ]
                    }
                },
                "type": "n8n-nodes-base.set",
                "typeVersion": 1,
                "position": [460, 300],
                "id": "set-node",
                "name": "Set Message"
            }
        ],
        "connections": {
            "Start": {
                "main": [[{ "node": "Set Message", "type": "main", "index": 0 }]]
            }
        },
        "active": false,
        "settings": {},
        "tags": []
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use n8nctl_types::validate_workflow;

    #[test]
    fn sample_passes_validation() {
        let report = validate_workflow(&sample_workflow());
        assert!(report.is_valid(), "{:?}", report.errors);
    }
}
