//! Serve command handler.

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use weathereye_gateway::GatewayConfig;

use super::cancel_on_ctrl_c;

/// Assemble the gateway configuration from command-line overrides.
pub fn build_config(
    host: Option<String>,
    port: Option<u16>,
    upstream_url: Option<String>,
    api_key: Option<String>,
) -> GatewayConfig {
    let mut config = GatewayConfig::new().with_optional_api_key(api_key);
    if let Some(host) = host {
        config = config.with_host(host);
    }
    if let Some(port) = port {
        config = config.with_port(port);
    }
    if let Some(url) = upstream_url {
        config = config.with_upstream_url(url);
    }
    config
}

/// Execute the serve command.
///
/// Runs until Ctrl-C, then drains in-flight requests.
pub async fn execute(config: GatewayConfig) -> Result<()> {
    let address = config.bind_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {address}"))?;

    let cancel = CancellationToken::new();
    cancel_on_ctrl_c(cancel.clone());

    weathereye_gateway::serve(listener, config, cancel).await
}
