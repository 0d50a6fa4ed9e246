//! Errors of calls against the backend API.

use serde_json::Value;
use thiserror::Error;

/// Shown when the backend gave no usable message.
pub const FALLBACK_MESSAGE: &str = "request failed, please try again later";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No token, or the backend answered 401. The session must be dropped.
    #[error("not authenticated, please re-login")]
    Unauthenticated,

    #[error("network error: {0}")]
    Network(String),

    /// Backend rejected the request; `message` is what the user is shown.
    #[error("{message} ({status})")]
    Api { status: u16, message: String },

    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, ApiError::Unauthenticated)
    }

    /// Message for display, without the status decoration.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Extract a human-readable message from an error body.
///
/// Looks at `message`, `msg` and `error` (in that order) of a JSON object;
/// anything else yields [`FALLBACK_MESSAGE`].
pub fn message_from_body(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .as_ref()
        .and_then(message_from_value)
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string())
}

pub(crate) fn message_from_value(value: &Value) -> Option<String> {
    ["message", "msg", "error"]
        .iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|msg| !msg.is_empty())
        .map(str::to_string)
}
