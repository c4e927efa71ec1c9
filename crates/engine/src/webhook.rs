//! Webhook URL construction for a workflow's webhook trigger nodes.
//!
//! No server is involved: the URL is derived from the node's `webhookId`
//! when present, else from its `path` parameter.

use n8nctl_types::Workflow;

/// Method assumed when a webhook node does not set `httpMethod`.
pub const DEFAULT_WEBHOOK_METHOD: &str = "GET";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookEndpoint {
    pub node_name: String,
    pub http_method: String,
    /// The node's `path` parameter, when set.
    pub path: Option<String>,
    /// `None` when the node has neither a webhook id nor a path.
    pub url: Option<String>,
}

impl WebhookEndpoint {
    /// A `curl` invocation that calls the webhook, when a URL is known.
    pub fn curl_command(&self) -> Option<String> {
        self.url
            .as_ref()
            .map(|url| format!("curl -X {} \"{url}\"", self.http_method))
    }
}

/// One endpoint per webhook node of `workflow`, in node order.
pub fn webhook_endpoints(host_url: &str, workflow: &Workflow) -> Vec<WebhookEndpoint> {
    let host_url = host_url.trim_end_matches('/');
    workflow
        .webhook_nodes()
        .enumerate()
        .map(|(index, node)| {
            let path = node.string_parameter("path").filter(|path| !path.is_empty()).map(str::to_string);
            let token = node
                .webhook_id
                .as_deref()
                .filter(|id| !id.is_empty())
                .or(path.as_deref());

            WebhookEndpoint {
                node_name: if node.name.is_empty() {
                    format!("Webhook {}", index + 1)
                } else {
                    node.name.clone()
                },
                http_method: node
                    .string_parameter("httpMethod")
                    .unwrap_or(DEFAULT_WEBHOOK_METHOD)
                    .to_string(),
                url: token.map(|token| format!("{host_url}/webhook/{token}")),
                path,
            }
        })
        .collect()
}
