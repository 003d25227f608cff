//! Subcommands.

use clap::{Args, Subcommand};
use weathereye_client::{BrokerConfig, GatewayClient};

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Run the gateway in front of the upstream analysis API
    Serve {
        /// Interface to bind (default 127.0.0.1)
        #[arg(long)]
        host: Option<String>,
        /// Port to listen on (default 8787)
        #[arg(short, long)]
        port: Option<u16>,
        /// Upstream API base URL
        #[arg(long, env = "WEATHEREYE_UPSTREAM_URL")]
        upstream_url: Option<String>,
        /// Upstream credential
        #[arg(long, env = "TRIO_API_KEY", hide_env_values = true)]
        api_key: Option<String>,
    },

    /// Ask once whether a condition holds on a live feed
    Check {
        /// Live video feed URL
        stream_url: String,
        /// Natural-language condition, e.g. "is it raining"
        condition: String,
        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Start an upstream job that calls a webhook when a condition appears
    Monitor {
        /// Live video feed URL
        stream_url: String,
        /// Natural-language condition to watch for
        condition: String,
        /// URL notified when the condition triggers
        webhook_url: String,
        #[command(flatten)]
        gateway: GatewayArgs,
    },

    /// Print the live narration of a feed until it ends or Ctrl-C
    Digest {
        /// Live video feed URL
        stream_url: String,
        #[command(flatten)]
        gateway: GatewayArgs,
    },
}

/// Where client commands send their requests.
#[derive(Args, Debug, Clone)]
pub struct GatewayArgs {
    /// Gateway endpoint
    #[arg(long, env = "WEATHEREYE_GATEWAY_URL")]
    pub gateway_url: Option<String>,
    /// Key presented to the gateway
    #[arg(long, env = "WEATHEREYE_API_KEY", hide_env_values = true)]
    pub client_key: Option<String>,
}

impl GatewayArgs {
    /// Broker configuration for these arguments.
    pub fn config(&self) -> BrokerConfig {
        let config = BrokerConfig::new().with_optional_api_key(self.client_key.clone());
        match &self.gateway_url {
            Some(url) => config.with_gateway_url(url),
            None => config,
        }
    }

    /// Build a client for these arguments.
    pub fn client(&self) -> anyhow::Result<GatewayClient> {
        Ok(GatewayClient::new(self.config())?)
    }
}
