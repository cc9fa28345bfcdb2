// ABOUTME: Submission error taxonomy and response parsing for the template API

use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

/// Keys accepted as the created template identifier, in order of preference
const IDENTIFIER_KEYS: &[&str] = &["id", "_id", "templateId"];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmissionError {
    /// Non-2xx response; `message` is what the user sees
    #[error("{message}")]
    Server { status: u16, message: String },
    #[error("Submission timed out after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Could not reach template API: {0}")]
    Transport(String),
    #[error("Unexpected response from template API: {0}")]
    InvalidResponse(String),
}

impl SubmissionError {
    /// Whether sending the same payload again could succeed
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Server { status, .. } => *status >= 500 || *status == 408 || *status == 429,
            Self::Timeout(_) | Self::Transport(_) => true,
            Self::InvalidResponse(_) => false,
        }
    }
}

/// Turn a status code and raw body into the created template id or an error
pub fn parse_create_response(status: u16, body: &str) -> Result<String, SubmissionError> {
    let json: Option<Value> = serde_json::from_str(body).ok();

    if (200..300).contains(&status) {
        let json = json.ok_or_else(|| {
            SubmissionError::InvalidResponse("response body is not JSON".to_string())
        })?;
        return extract_identifier(&json).ok_or_else(|| {
            SubmissionError::InvalidResponse("response is missing an id field".to_string())
        });
    }

    let message = json
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map_or_else(|| format!("Server returned {status}"), str::to_string);

    Err(SubmissionError::Server { status, message })
}

fn extract_identifier(value: &Value) -> Option<String> {
    for key in IDENTIFIER_KEYS {
        match value.get(key) {
            Some(Value::String(s)) if !s.is_empty() => return Some(s.clone()),
            Some(Value::Number(n)) => return Some(n.to_string()),
            _ => {}
        }
    }
    // Some deployments wrap the record in a data envelope
    value.get("data").and_then(extract_identifier)
}
