//! The gateway request discriminant.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// One of the three upstream behaviours a gateway request can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Operation {
    /// Evaluate a yes/no condition against the feed once.
    SingleCheck,
    /// Create an upstream monitoring job that reports to a webhook.
    MonitorStart,
    /// Open a continuous natural-language narration of the feed.
    DigestStream,
}

impl Operation {
    /// Every accepted operation, in the order they are listed to callers.
    pub const ALL: [Self; 3] = [Self::SingleCheck, Self::MonitorStart, Self::DigestStream];

    /// Wire name of the operation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SingleCheck => "single-check",
            Self::MonitorStart => "monitor-start",
            Self::DigestStream => "digest-stream",
        }
    }

    /// Path segment of the matching upstream API endpoint.
    pub const fn upstream_path(self) -> &'static str {
        match self {
            Self::SingleCheck => "check-once",
            Self::MonitorStart => "live-monitor",
            Self::DigestStream => "live-digest",
        }
    }

    /// Whether the upstream answers with an event stream instead of one JSON body.
    pub const fn is_streaming(self) -> bool {
        matches!(self, Self::DigestStream)
    }

    /// Comma-separated list of accepted wire names.
    pub fn allowed_list() -> String {
        Self::ALL
            .iter()
            .map(|op| op.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| CoreError::InvalidOperation(s.to_string()))
    }
}
