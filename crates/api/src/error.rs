use std::fmt;

use n8nctl_util::http::{JsonParseError, status_error_message};
use n8nctl_util::redact_sensitive;
use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Failures surfaced by [`crate::N8nClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid N8N_HOST_URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("API key contains characters that are not valid in an HTTP header")]
    InvalidHeader,

    #[error("could not build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{}", status_display(.status, .detail))]
    Status { status: StatusCode, detail: ErrorDetail },

    #[error(transparent)]
    Decode(#[from] JsonParseError),

    #[error("unexpected response shape: {0}")]
    Shape(#[from] serde_json::Error),
}

impl ApiError {
    /// HTTP status for non-success responses.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn status_display(status: &StatusCode, detail: &ErrorDetail) -> String {
    let headline = status_error_message(status.as_u16()).unwrap_or_else(|| format!("HTTP {status}"));
    match detail {
        ErrorDetail::Empty => headline,
        detail => format!("{headline}: {detail}"),
    }
}

/// Body of a non-success response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorDetail {
    Json(Value),
    Text(String),
    Empty,
}

impl ErrorDetail {
    pub fn from_body(body: &str) -> Self {
        if body.trim().is_empty() {
            return ErrorDetail::Empty;
        }
        match serde_json::from_str::<Value>(body) {
            Ok(value) => ErrorDetail::Json(value),
            Err(_) => ErrorDetail::Text(body.trim().to_string()),
        }
    }

    /// The `message` member n8n puts in its error payloads, if any.
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorDetail::Json(value) => value.get("message").and_then(Value::as_str),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorDetail::Json(value) => {
                let rendered = serde_json::to_string_pretty(value).map_err(|_| fmt::Error)?;
                f.write_str(&redact_sensitive(&rendered))
            }
            ErrorDetail::Text(text) => f.write_str(&redact_sensitive(text)),
            ErrorDetail::Empty => f.write_str("<empty body>"),
        }
    }
}
