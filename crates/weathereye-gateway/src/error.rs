//! Gateway error types and their HTTP mapping.
//!
//! Every variant renders as a JSON [`ErrorResponse`] so callers always get a
//! parseable body, whatever went wrong.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;
use thiserror::Error;
use weathereye_core::{CoreError, ErrorResponse};

/// Result type alias for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors raised while handling a gateway request.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// No upstream credential was configured at startup.
    #[error("Upstream API key is not configured")]
    MissingApiKey,

    /// Missing or unknown `operation`.
    #[error(transparent)]
    Validation(#[from] CoreError),

    /// Request body is not a JSON object.
    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    /// Upstream answered a single-shot operation with a non-success status.
    #[error("Upstream API error [{status}]")]
    UpstreamStatus {
        /// Upstream HTTP status code
        status: u16,
        /// Upstream body, as JSON when it parses, else as a string
        details: Value,
    },

    /// Upstream refused to open the event stream.
    #[error("Upstream API error [{status}]: {body}")]
    UpstreamStream {
        /// Upstream HTTP status code
        status: u16,
        /// Upstream body as text
        body: String,
    },

    /// Upstream answered with a success status but an unparseable body.
    #[error("Malformed upstream reply: {0}")]
    MalformedUpstream(String),

    /// Network failure talking to upstream.
    #[error("Upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// HTTP status for this error. Upstream statuses are mirrored.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::UpstreamStatus { status, .. } | Self::UpstreamStream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Self::MissingApiKey
            | Self::MalformedBody(_)
            | Self::MalformedUpstream(_)
            | Self::Transport(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.to_string();
        let body = match self {
            Self::UpstreamStatus { details, .. } => ErrorResponse::with_details(message, details),
            _ => ErrorResponse::new(message),
        };

        (status, Json(body)).into_response()
    }
}
