//! Request forwarding to the upstream vision API.
//!
//! Single-shot operations are buffered and relayed as JSON; the digest
//! operation is piped through as an unmodified byte stream.

use std::time::Duration;

use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use futures_util::TryStreamExt;
use reqwest::Client;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{GatewayError, GatewayResult};

/// Request body fields forwarded upstream (everything except `operation`).
pub type Payload = Map<String, Value>;

/// Forward a single-shot operation and relay its JSON reply.
///
/// # Arguments
///
/// * `client` - HTTP client to use for the request
/// * `upstream_url` - Full URL of the upstream endpoint
/// * `api_key` - Server-held upstream credential
/// * `payload` - Fields to post as the JSON body
/// * `timeout` - Total time allowed for the upstream round trip
pub async fn forward_json(
    client: &Client,
    upstream_url: &str,
    api_key: &str,
    payload: &Payload,
    timeout: Duration,
) -> GatewayResult<Response> {
    debug!("Forwarding to {upstream_url}");

    let response = client
        .post(upstream_url)
        .bearer_auth(api_key)
        .timeout(timeout)
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        let details = serde_json::from_slice::<Value>(&body)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body).into_owned()));
        warn!(status = %status, "Upstream rejected request");
        return Err(GatewayError::UpstreamStatus {
            status: status.as_u16(),
            details,
        });
    }

    // Relay the original bytes, but only once they are known to be JSON.
    if let Err(e) = serde_json::from_slice::<Value>(&body) {
        return Err(GatewayError::MalformedUpstream(e.to_string()));
    }

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
}

/// Forward the digest operation and pipe the upstream event stream through.
///
/// A failed upstream status is read to completion and reported as JSON; it is
/// never relayed as an event stream.
pub async fn forward_stream(
    client: &Client,
    upstream_url: &str,
    api_key: &str,
    payload: &Payload,
) -> GatewayResult<Response> {
    debug!("Opening stream to {upstream_url}");

    let response = client
        .post(upstream_url)
        .bearer_auth(api_key)
        .json(payload)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await?;
        warn!(status = %status, "Upstream refused stream");
        return Err(GatewayError::UpstreamStream {
            status: status.as_u16(),
            body,
        });
    }

    let byte_stream = response.bytes_stream().map_err(std::io::Error::other);

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("x-accel-buffering", "no") // Disable nginx buffering
        .body(Body::from_stream(byte_stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
}
