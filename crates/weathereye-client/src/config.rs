//! Public configuration for the gateway client.

use std::fmt;
use std::time::Duration;

/// Gateway endpoint used when none is configured.
pub const DEFAULT_GATEWAY_URL: &str = "http://127.0.0.1:8787/gateway";

/// Configuration for the gateway client.
///
/// # Example
///
/// ```
/// use weathereye_client::BrokerConfig;
/// use std::time::Duration;
///
/// let config = BrokerConfig::new()
///     .with_gateway_url("https://edge.example.com/functions/v1/trio-api")
///     .with_api_key("publishable-key")
///     .with_timeout(Duration::from_secs(90));
/// ```
#[derive(Clone)]
pub struct BrokerConfig {
    /// Full URL of the gateway endpoint
    pub(crate) gateway_url: String,
    /// Optional client key, sent as `Authorization: Bearer` and `apikey`
    pub(crate) api_key: Option<String>,
    /// Total timeout for single-shot calls (digest streams are unbounded)
    pub(crate) timeout: Duration,
    /// Timeout for establishing connections
    pub(crate) connect_timeout: Duration,
    /// User agent string for HTTP requests
    pub(crate) user_agent: String,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            gateway_url: DEFAULT_GATEWAY_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            user_agent: concat!("weathereye-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("gateway_url", &self.gateway_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl BrokerConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the gateway endpoint URL.
    #[must_use]
    pub fn with_gateway_url(mut self, url: impl Into<String>) -> Self {
        self.gateway_url = url.into();
        self
    }

    /// Set the client key presented to the gateway.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set an optional client key. Empty strings count as absent.
    #[must_use]
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Set the total timeout for single-shot calls.
    ///
    /// Defaults to 120 seconds.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the connect timeout.
    ///
    /// Defaults to 10 seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// The configured gateway endpoint.
    pub fn gateway_url(&self) -> &str {
        &self.gateway_url
    }
}
