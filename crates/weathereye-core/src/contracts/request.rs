//! Gateway request body.

use serde::{Deserialize, Serialize};

use crate::domain::Operation;

/// JSON body posted to the gateway.
///
/// `operation` selects the upstream behaviour; every other field is forwarded
/// to the upstream API as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    pub operation: Operation,
    pub stream_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl RequestEnvelope {
    /// Envelope for a one-off condition check.
    pub fn single_check(stream_url: impl Into<String>, condition: impl Into<String>) -> Self {
        Self {
            operation: Operation::SingleCheck,
            stream_url: stream_url.into(),
            condition: Some(condition.into()),
            webhook_url: None,
        }
    }

    /// Envelope for creating an upstream monitoring job.
    pub fn monitor_start(
        stream_url: impl Into<String>,
        condition: impl Into<String>,
        webhook_url: impl Into<String>,
    ) -> Self {
        Self {
            operation: Operation::MonitorStart,
            stream_url: stream_url.into(),
            condition: Some(condition.into()),
            webhook_url: Some(webhook_url.into()),
        }
    }

    /// Envelope for opening a narration stream.
    pub fn digest_stream(stream_url: impl Into<String>) -> Self {
        Self {
            operation: Operation::DigestStream,
            stream_url: stream_url.into(),
            condition: None,
            webhook_url: None,
        }
    }
}
