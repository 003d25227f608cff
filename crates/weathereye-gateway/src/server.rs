//! Axum HTTP server for the gateway.
//!
//! [`create_router`] builds the routes for in-process use (tests, embedding);
//! [`serve`] runs them on a pre-bound listener until cancelled.

use std::any::Any;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderName, Method},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use bytes::Bytes;
use reqwest::Client;
use serde_json::Value;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any as AnyOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};
use weathereye_core::{CoreError, Operation};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, GatewayResult};
use crate::forward::{Payload, forward_json, forward_stream};

/// Shared application state for the gateway.
#[derive(Clone)]
struct AppState {
    /// HTTP client for forwarding requests upstream.
    client: Client,
    /// Immutable configuration, including the credential.
    config: Arc<GatewayConfig>,
}

/// Build the gateway router.
///
/// Fails only if the HTTP client cannot be constructed.
pub fn create_router(config: GatewayConfig) -> GatewayResult<Router> {
    if !config.has_api_key() {
        warn!("Upstream API key is not configured; every gateway request will fail");
    }

    let client = Client::builder()
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| GatewayError::Internal(format!("Failed to build HTTP client: {e}")))?;

    let cors = build_cors_layer(&config);
    let state = AppState {
        client,
        config: Arc::new(config),
    };

    Ok(Router::new()
        .route("/health", get(health_check))
        .route("/gateway", post(gateway))
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

/// Start the gateway with a pre-bound listener.
///
/// Runs until the cancellation token is triggered.
pub async fn serve(
    listener: TcpListener,
    config: GatewayConfig,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let addr = listener.local_addr()?;
    info!(upstream = %config.upstream_url, "Gateway starting on {addr}");

    let app = create_router(config)?;

    info!("Gateway listening on http://{addr}/gateway");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    info!("Gateway shut down");
    Ok(())
}

/// Build the CORS layer. Preflights are answered by the layer itself.
fn build_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let headers: Vec<HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers(headers)
}

/// Turn a handler panic into the usual JSON error body.
fn handle_panic(_payload: Box<dyn Any + Send + 'static>) -> Response {
    error!("Gateway handler panicked");
    GatewayError::Internal("Unexpected gateway failure".to_string()).into_response()
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

/// Validate, authenticate and forward one gateway request.
async fn gateway(State(state): State<AppState>, body: Bytes) -> Response {
    match handle_request(&state, &body).await {
        Ok(response) => response,
        Err(err) => {
            let status = err.status();
            if status.is_server_error() {
                error!(status = %status, "Gateway request failed: {err}");
            } else {
                warn!(status = %status, "Gateway request rejected: {err}");
            }
            err.into_response()
        }
    }
}

async fn handle_request(state: &AppState, body: &[u8]) -> GatewayResult<Response> {
    // Configuration fault short-circuits before anything else is looked at.
    let api_key = state
        .config
        .api_key
        .as_deref()
        .ok_or(GatewayError::MissingApiKey)?;

    let (operation, payload) = parse_request(body)?;
    let upstream_url = state.config.upstream_endpoint(operation);

    info!(operation = %operation, "Processing gateway request");
    debug!(upstream = %upstream_url, "Routing to upstream");

    if operation.is_streaming() {
        forward_stream(&state.client, &upstream_url, api_key, &payload).await
    } else {
        forward_json(
            &state.client,
            &upstream_url,
            api_key,
            &payload,
            state.config.request_timeout,
        )
        .await
    }
}

/// Split a request body into its operation and the fields to forward.
pub(crate) fn parse_request(body: &[u8]) -> GatewayResult<(Operation, Payload)> {
    let mut fields: Payload =
        serde_json::from_slice(body).map_err(|e| GatewayError::MalformedBody(e.to_string()))?;

    let operation = match fields.remove("operation") {
        None | Some(Value::Null) => return Err(CoreError::MissingOperation.into()),
        Some(Value::String(name)) => name.parse::<Operation>()?,
        Some(other) => return Err(CoreError::InvalidOperation(other.to_string()).into()),
    };

    Ok((operation, fields))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_check() {
        let response = health_check().await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_parse_request_strips_operation() {
        let (operation, payload) = parse_request(
            br#"{"operation": "single-check", "stream_url": "https://cam", "condition": "rain?"}"#,
        )
        .unwrap();
        assert_eq!(operation, Operation::SingleCheck);
        assert!(!payload.contains_key("operation"));
        assert_eq!(payload["stream_url"], "https://cam");
        assert_eq!(payload["condition"], "rain?");
    }

    #[test]
    fn test_parse_request_missing_operation() {
        let err = parse_request(br#"{"stream_url": "https://cam"}"#).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Validation(CoreError::MissingOperation)
        ));
    }

    #[test]
    fn test_parse_request_unknown_operation() {
        let err = parse_request(br#"{"operation": "forecast"}"#).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("forecast"));
    }

    #[test]
    fn test_parse_request_non_string_operation() {
        let err = parse_request(br#"{"operation": 7}"#).unwrap_err();
        assert!(matches!(
            err,
            GatewayError::Validation(CoreError::InvalidOperation(ref v)) if v == "7"
        ));
    }

    #[test]
    fn test_parse_request_rejects_non_object() {
        let err = parse_request(b"[1, 2]").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedBody(_)));

        let err = parse_request(b"").unwrap_err();
        assert!(matches!(err, GatewayError::MalformedBody(_)));
    }

    #[test]
    fn test_router_builds_without_api_key() {
        assert!(create_router(GatewayConfig::new()).is_ok());
    }
}
