//! Typed upstream replies.

use serde::{Deserialize, Serialize};

/// Outcome of a `single-check` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingleCheckResult {
    /// Whether the condition holds for the current frame.
    pub triggered: bool,
    /// Upstream's natural-language reasoning.
    pub explanation: String,
    /// Upstream inference latency in milliseconds.
    pub latency_ms: u64,
}

/// Handle to an upstream monitoring job created by `monitor-start`.
///
/// The job lives entirely upstream; nothing here tracks it further.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorHandle {
    pub job_id: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_false_trigger_is_preserved() {
        let result: SingleCheckResult = serde_json::from_str(
            r#"{"triggered": false, "explanation": "dry pavement", "latency_ms": 0}"#,
        )
        .unwrap();
        assert!(!result.triggered);
        assert_eq!(result.latency_ms, 0);
    }

    #[test]
    fn test_unknown_fields_are_ignored() {
        let handle: MonitorHandle = serde_json::from_str(
            r#"{"job_id": "job_42", "status": "running", "created_at": "now"}"#,
        )
        .unwrap();
        assert_eq!(handle.job_id, "job_42");
        assert_eq!(handle.status, "running");
    }
}
