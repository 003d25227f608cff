//! Error envelope returned on every non-success path.
//!
//! The gateway always emits `{ "error": "<message>" }`, optionally with a
//! `details` payload copied from upstream. The upstream API itself may answer
//! with a structured `{ code, message, remediation }` object instead, and
//! nothing stops a future version from sending something else entirely, so
//! readers go through [`ErrorField`] rather than assuming a shape.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Structured upstream error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub code: String,
    pub message: String,
    #[serde(default)]
    pub remediation: String,
}

/// The `error` field of an error body, in whichever shape it arrived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorField {
    /// Bare string, as produced by the gateway.
    Message(String),
    /// Structured object carrying at least a `message`.
    Envelope(ErrorEnvelope),
    /// Any other JSON value.
    Other(Value),
}

impl ErrorField {
    /// Interpret an arbitrary JSON value as an error field.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(message) => Self::Message(message),
            Value::Object(_) => match serde_json::from_value::<ErrorEnvelope>(value.clone()) {
                Ok(envelope) => Self::Envelope(envelope),
                Err(_) => Self::Other(value),
            },
            other => Self::Other(other),
        }
    }

    /// Best-effort human-readable message.
    ///
    /// Prefers the structured `message`; anything without one is rendered as
    /// JSON so no error text is lost.
    pub fn message(&self) -> String {
        match self {
            Self::Message(message) => message.clone(),
            Self::Envelope(envelope) if !envelope.message.is_empty() => envelope.message.clone(),
            Self::Envelope(envelope) => serde_json::to_string(envelope).unwrap_or_default(),
            Self::Other(value) => value.to_string(),
        }
    }
}

impl fmt::Display for ErrorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl From<String> for ErrorField {
    fn from(message: String) -> Self {
        Self::Message(message)
    }
}

impl From<&str> for ErrorField {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorField,
    /// Raw upstream payload, kept for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ErrorResponse {
    /// Create an error body carrying only a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorField::Message(message.into()),
            details: None,
        }
    }

    /// Create an error body with an attached upstream payload.
    pub fn with_details(message: impl Into<String>, details: Value) -> Self {
        Self {
            error: ErrorField::Message(message.into()),
            details: Some(details),
        }
    }

    /// Create an error body for a failed upstream status.
    pub fn upstream_status(status: u16, body: &str) -> Self {
        Self::new(format!("Upstream API error [{status}]: {body}"))
    }
}
