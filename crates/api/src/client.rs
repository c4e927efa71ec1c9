//! REST client for the n8n public API.
//!
//! [`N8nClient`] wraps a configured `reqwest::Client` and exposes one
//! parameterized [`N8nClient::request`] entry point plus typed helpers for the
//! workflow and execution endpoints the commands use.

use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

use n8nctl_types::{Execution, Workflow};
use n8nctl_util::http::parse_response_json_strict;
use reqwest::{Client, Method, header};
use serde_json::{Value, json};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::error::{ApiError, ErrorDetail};

/// Path segment every endpoint lives under.
pub const API_BASE_PATH: &str = "/api/v1";
/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "X-N8N-API-KEY";

/// HTTP verbs the API client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpVerb {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpVerb {
    pub fn method(self) -> Method {
        match self {
            HttpVerb::Get => Method::GET,
            HttpVerb::Post => Method::POST,
            HttpVerb::Put => Method::PUT,
            HttpVerb::Patch => Method::PATCH,
            HttpVerb::Delete => Method::DELETE,
        }
    }

    /// Whether a JSON body is sent with this verb.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpVerb::Post | HttpVerb::Put | HttpVerb::Patch)
    }
}

impl fmt::Display for HttpVerb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// Return the `data` member of a response envelope, or the value itself.
///
/// List endpoints answer `{ "data": [...], "nextCursor": ... }`; single
/// resources may or may not be wrapped.
pub fn unwrap_data(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => map.remove("data").unwrap_or(Value::Null),
        other => other,
    }
}

#[derive(Debug, Clone)]
/// Thin wrapper around a `reqwest::Client` pre-configured with the API key.
pub struct N8nClient {
    host_url: String,
    http: Client,
}

impl N8nClient {
    /// Build a client for `config` with no request timeout.
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        Self::build(config, None)
    }

    /// Build a client whose requests give up after `timeout`.
    pub fn with_timeout(config: &Config, timeout: Duration) -> Result<Self, ApiError> {
        Self::build(config, Some(timeout))
    }

    fn build(config: &Config, timeout: Option<Duration>) -> Result<Self, ApiError> {
        validate_host_url(config.host_url())?;

        let mut default_headers = header::HeaderMap::new();
        let mut key_value = header::HeaderValue::from_str(config.api_key()).map_err(|_| ApiError::InvalidHeader)?;
        key_value.set_sensitive(true);
        let key_name = header::HeaderName::from_bytes(API_KEY_HEADER.as_bytes()).map_err(|_| ApiError::InvalidHeader)?;
        default_headers.insert(key_name, key_value);
        default_headers.insert(header::CONTENT_TYPE, header::HeaderValue::from_static("application/json"));
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let mut builder = Client::builder().default_headers(default_headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ApiError::ClientBuild)?;

        Ok(Self {
            host_url: config.host_url().to_string(),
            http,
        })
    }

    pub fn host_url(&self) -> &str {
        &self.host_url
    }

    /// Absolute URL for an API-relative path such as `/workflows`.
    pub fn endpoint_url(&self, path: &str) -> String {
        format!("{}{}{}", self.host_url, API_BASE_PATH, path)
    }

    /// Issue one request and parse the JSON response.
    ///
    /// `body` is only sent for verbs that carry one. Non-2xx responses become
    /// [`ApiError::Status`] with the body attached; an empty 2xx body is `null`.
    pub async fn request(
        &self,
        verb: HttpVerb,
        path: &str,
        body: Option<&Value>,
        query: &[(&str, String)],
    ) -> Result<Value, ApiError> {
        let url = self.endpoint_url(path);
        let started = Instant::now();
        debug!(method = %verb, %path, "sending request");

        let mut builder = self.http.request(verb.method(), &url);
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body.filter(|_| verb.carries_body()) {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|source| {
            warn!(method = %verb, %path, error = %source, "request failed");
            ApiError::Transport { url: url.clone(), source }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|source| ApiError::Transport { url: url.clone(), source })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;

        if !status.is_success() {
            warn!(method = %verb, %path, status = status.as_u16(), elapsed_ms, "request returned error status");
            return Err(ApiError::Status {
                status,
                detail: ErrorDetail::from_body(&text),
            });
        }

        debug!(method = %verb, %path, status = status.as_u16(), elapsed_ms, "request completed");
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(parse_response_json_strict(&text, Some(status))?)
    }

    /// List workflows, optionally filtered by active state.
    ///
    /// With `limit` set a single page of at most that many records is
    /// returned; without it every page is fetched by following `nextCursor`
    /// until it is absent or repeats an earlier value.
    pub async fn list_workflows(&self, active: Option<bool>, limit: Option<u32>) -> Result<Vec<Workflow>, ApiError> {
        let mut base_query: Vec<(&str, String)> = Vec::new();
        if let Some(active) = active {
            base_query.push(("active", active.to_string()));
        }
        if let Some(limit) = limit {
            base_query.push(("limit", limit.to_string()));
        }

        let mut workflows = Vec::new();
        let mut cursor: Option<String> = None;
        let mut seen_cursors = HashSet::new();
        loop {
            let mut query = base_query.clone();
            if let Some(cursor) = &cursor {
                query.push(("cursor", cursor.clone()));
            }

            let page = self.request(HttpVerb::Get, "/workflows", None, &query).await?;
            let next_cursor = page
                .get("nextCursor")
                .and_then(Value::as_str)
                .filter(|next| !next.is_empty())
                .map(str::to_string);
            let records: Vec<Workflow> = serde_json::from_value(list_items(page))?;
            workflows.extend(records);

            match next_cursor {
                Some(next) if limit.is_none() => {
                    if !seen_cursors.insert(next.clone()) {
                        warn!(cursor = %next, "server repeated a pagination cursor; stopping");
                        break;
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }

        debug!(count = workflows.len(), "listed workflows");
        Ok(workflows)
    }

    /// Full definition of one workflow as returned by the platform.
    pub async fn get_workflow_raw(&self, id: &str) -> Result<Value, ApiError> {
        let value = self.request(HttpVerb::Get, &workflow_path(id), None, &[]).await?;
        Ok(unwrap_data(value))
    }

    pub async fn get_workflow(&self, id: &str) -> Result<Workflow, ApiError> {
        Ok(serde_json::from_value(self.get_workflow_raw(id).await?)?)
    }

    pub async fn create_workflow(&self, definition: &Value) -> Result<Workflow, ApiError> {
        let value = self
            .request(HttpVerb::Post, "/workflows", Some(definition), &[])
            .await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    /// Replace the stored definition of workflow `id` (PUT).
    pub async fn replace_workflow(&self, id: &str, definition: &Value) -> Result<Workflow, ApiError> {
        let value = self
            .request(HttpVerb::Put, &workflow_path(id), Some(definition), &[])
            .await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    /// Partially update workflow `id` (PATCH).
    pub async fn patch_workflow(&self, id: &str, fields: &Value) -> Result<Workflow, ApiError> {
        let value = self
            .request(HttpVerb::Patch, &workflow_path(id), Some(fields), &[])
            .await?;
        Ok(serde_json::from_value(unwrap_data(value))?)
    }

    pub async fn set_active(&self, id: &str, active: bool) -> Result<Workflow, ApiError> {
        self.patch_workflow(id, &json!({ "active": active })).await
    }

    /// Trigger a manual run. The response shape varies between versions, so
    /// it is returned untyped.
    pub async fn execute_workflow(&self, id: &str) -> Result<Value, ApiError> {
        let path = format!("{}/execute", workflow_path(id));
        let value = self.request(HttpVerb::Post, &path, Some(&json!({})), &[]).await?;
        Ok(unwrap_data(value))
    }

    pub async fn list_executions(&self, workflow_id: Option<&str>, limit: u32) -> Result<Vec<Execution>, ApiError> {
        let mut query = vec![("limit", limit.to_string())];
        if let Some(workflow_id) = workflow_id {
            query.push(("workflowId", workflow_id.to_string()));
        }
        let page = self.request(HttpVerb::Get, "/executions", None, &query).await?;
        Ok(serde_json::from_value(list_items(page))?)
    }
}

fn workflow_path(id: &str) -> String {
    format!("/workflows/{id}")
}

/// Items of a list response; a missing or `null` payload is an empty list.
fn list_items(page: Value) -> Value {
    match unwrap_data(page) {
        Value::Null => Value::Array(Vec::new()),
        items => items,
    }
}

/// Validate that the host URL is usable as a request base.
///
/// Rules:
/// - it must parse as an absolute URL
/// - the scheme must be `http` or `https`
/// - a host must be present
fn validate_host_url(base: &str) -> Result<(), ApiError> {
    let invalid = |reason: String| ApiError::InvalidBaseUrl {
        url: base.to_string(),
        reason,
    };

    let parsed = Url::parse(base).map_err(|error| invalid(error.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}://'", parsed.scheme())));
    }
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid("URL must include a host".into()));
    }
    Ok(())
}
