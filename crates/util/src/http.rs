//! # HTTP Utilities
//!
//! Helpers for turning raw platform responses into values the commands can
//! print: strict JSON parsing with a readable failure, and status hints.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Return a user-friendly error message for common HTTP status codes.
///
/// # Example
/// ```rust
/// use n8nctl_util::http::status_error_message;
///
/// let error_401 = status_error_message(401).unwrap();
/// assert!(error_401.contains("N8N_API_KEY"));
///
/// let error_404 = status_error_message(404).unwrap();
/// assert!(error_404.contains("Not Found"));
///
/// assert!(status_error_message(500).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: check that N8N_API_KEY is set to a valid API key".into()),
        403 => Some("Forbidden (403). Hint: the API key may lack access to this resource".into()),
        404 => Some("Not Found (404). Hint: check the workflow id and that N8N_HOST_URL points at the instance root".into()),
        _ => None,
    }
}

/// Parse response text as JSON, returning `None` when it is not JSON.
///
/// # Example
/// ```rust
/// use n8nctl_util::http::parse_response_json;
///
/// assert!(parse_response_json(r#"{"message": "not found"}"#).is_some());
/// assert!(parse_response_json("<html>bad gateway</html>").is_none());
/// ```
pub fn parse_response_json(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text).ok()
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// The error carries the status code and up to 200 characters of the body
/// (whitespace collapsed) so truncated or non-JSON payloads are easy to spot.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, 200);

        JsonParseError::new(status_note, error, preview)
    })
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.len() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Access the truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strict_parse_reports_status_and_preview() {
        let error = parse_response_json_strict("<html>\n\tbad gateway</html>", Some(StatusCode::BAD_GATEWAY))
            .expect_err("html is not json");

        assert_eq!(error.body_preview(), "<html> bad gateway</html>");
        assert!(error.to_string().contains("status 502"));
    }

    #[test]
    fn strict_parse_marks_empty_bodies() {
        let error = parse_response_json_strict("   ", None).expect_err("empty body is not json");
        assert_eq!(error.body_preview(), "<empty>");
        assert!(error.to_string().contains("unknown status"));
    }

    #[test]
    fn long_previews_are_truncated() {
        let body = "x".repeat(500);
        let error = parse_response_json_strict(&body, None).expect_err("not json");
        assert!(error.body_preview().ends_with("..."));
        assert_eq!(error.body_preview().len(), 203);
    }
}
