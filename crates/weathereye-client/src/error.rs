//! Error types for the client broker.

use thiserror::Error;

/// Result type alias for broker operations.
pub type BrokerResult<T> = Result<T, BrokerError>;

/// Errors surfaced to callers of the broker.
#[derive(Debug, Error)]
pub enum BrokerError {
    /// Network failure reaching the gateway; carries the transport's message.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The gateway (or upstream through it) answered with an `error` field.
    #[error("{0}")]
    Gateway(String),

    /// Non-success status with no error message in the body.
    #[error("HTTP {0}")]
    Status(u16),

    /// Success status, but the body is not the expected shape.
    #[error("Invalid response from gateway: {0}")]
    InvalidResponse(String),

    /// A digest session is already running on this controller.
    #[error("A digest session is already active")]
    SessionActive,

    /// No digest session to stop.
    #[error("No digest session is active")]
    NoActiveSession,

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),
}
