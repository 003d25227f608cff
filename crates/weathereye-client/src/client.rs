//! Gateway client: single-shot calls and digest session start-up.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, header};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use weathereye_core::{MonitorHandle, RequestEnvelope, SingleCheckResult};

use crate::config::BrokerConfig;
use crate::digest::{DigestSession, error_message};
use crate::error::{BrokerError, BrokerResult};

/// Client for the WeatherEye gateway.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    http: Client,
    config: Arc<BrokerConfig>,
}

impl GatewayClient {
    /// Create a client from configuration.
    pub fn new(config: BrokerConfig) -> BrokerResult<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| BrokerError::ClientBuild(e.to_string()))?;

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Ask whether `condition` currently holds on the feed at `stream_url`.
    pub async fn check_once(
        &self,
        stream_url: &str,
        condition: &str,
    ) -> BrokerResult<SingleCheckResult> {
        self.invoke(&RequestEnvelope::single_check(stream_url, condition))
            .await
    }

    /// Create an upstream job that watches for `condition` and notifies `webhook_url`.
    pub async fn start_monitor(
        &self,
        stream_url: &str,
        condition: &str,
        webhook_url: &str,
    ) -> BrokerResult<MonitorHandle> {
        self.invoke(&RequestEnvelope::monitor_start(
            stream_url,
            condition,
            webhook_url,
        ))
        .await
    }

    /// Open a narration stream for the feed at `stream_url`.
    ///
    /// Returns immediately, before the connection is made. Each event is
    /// passed to `on_message` in arrival order; a failure is passed once to
    /// `on_error`. Stopping the session reports nothing to either callback.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime.
    pub fn start_digest<M, E>(
        &self,
        stream_url: &str,
        on_message: M,
        on_error: E,
    ) -> DigestSession
    where
        M: FnMut(String) + Send + 'static,
        E: FnOnce(String) + Send + 'static,
    {
        debug!(stream_url, "Starting digest session");
        let request = self
            .request(&RequestEnvelope::digest_stream(stream_url))
            .header(header::ACCEPT, "text/event-stream");
        DigestSession::spawn(request, on_message, on_error)
    }

    /// Build a gateway POST carrying the envelope and client credentials.
    fn request(&self, envelope: &RequestEnvelope) -> RequestBuilder {
        let mut builder = self.http.post(&self.config.gateway_url).json(envelope);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key).header("apikey", key);
        }
        builder
    }

    /// One gateway round trip, unwrapped into `T` or a single error.
    async fn invoke<T: DeserializeOwned>(&self, envelope: &RequestEnvelope) -> BrokerResult<T> {
        debug!(operation = %envelope.operation, "Invoking gateway");

        let response = self
            .request(envelope)
            .timeout(self.config.timeout)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;

        let body: Value = match serde_json::from_slice(&bytes) {
            Ok(body) => body,
            Err(_) if !status.is_success() => return Err(BrokerError::Status(status.as_u16())),
            Err(e) => return Err(BrokerError::InvalidResponse(e.to_string())),
        };

        if let Some(message) = error_message(&body) {
            return Err(BrokerError::Gateway(message));
        }
        if !status.is_success() {
            return Err(BrokerError::Status(status.as_u16()));
        }

        serde_json::from_value(body).map_err(|e| BrokerError::InvalidResponse(e.to_string()))
    }
}
