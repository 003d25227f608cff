//! Gateway configuration.
//!
//! Built once at process start and shared immutably by every request.

use std::fmt;
use std::time::Duration;

use weathereye_core::Operation;

/// Base URL of the upstream vision API.
pub const DEFAULT_UPSTREAM_URL: &str = "https://trio.machinefi.com/api";

/// Request headers browsers are allowed to send on cross-origin calls.
pub const DEFAULT_ALLOWED_HEADERS: &[&str] = &[
    "authorization",
    "x-client-info",
    "apikey",
    "content-type",
    "x-supabase-client-platform",
    "x-supabase-client-platform-version",
    "x-supabase-client-runtime",
    "x-supabase-client-runtime-version",
];

/// Configuration for the gateway server.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use weathereye_gateway::GatewayConfig;
///
/// let config = GatewayConfig::new()
///     .with_port(8787)
///     .with_api_key("sk-live-123")
///     .with_request_timeout(Duration::from_secs(60));
/// assert!(config.has_api_key());
/// ```
#[derive(Clone)]
pub struct GatewayConfig {
    /// Host to bind to.
    pub(crate) host: String,
    /// Port to bind to (0 for auto-assign).
    pub(crate) port: u16,
    /// Upstream API base URL, without the operation path.
    pub(crate) upstream_url: String,
    /// Server-held upstream credential.
    pub(crate) api_key: Option<String>,
    /// Total timeout for single-shot operations. Streams are not bounded.
    pub(crate) request_timeout: Duration,
    /// Timeout for establishing upstream connections.
    pub(crate) connect_timeout: Duration,
    /// Request headers allowed by the CORS policy.
    pub(crate) allowed_headers: Vec<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8787,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            api_key: None,
            request_timeout: Duration::from_secs(120),
            connect_timeout: Duration::from_secs(10),
            allowed_headers: DEFAULT_ALLOWED_HEADERS
                .iter()
                .map(|h| (*h).to_string())
                .collect(),
        }
    }
}

// Hand-written so the credential never ends up in logs.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("upstream_url", &self.upstream_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("request_timeout", &self.request_timeout)
            .field("connect_timeout", &self.connect_timeout)
            .field("allowed_headers", &self.allowed_headers)
            .finish()
    }
}

impl GatewayConfig {
    /// Create a new configuration with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the host to bind to.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the port to bind to.
    #[must_use]
    pub const fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the upstream API base URL.
    ///
    /// Defaults to [`DEFAULT_UPSTREAM_URL`].
    #[must_use]
    pub fn with_upstream_url(mut self, url: impl Into<String>) -> Self {
        self.upstream_url = url.into();
        self
    }

    /// Set the upstream credential.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set an optional upstream credential. Empty strings count as absent.
    #[must_use]
    pub fn with_optional_api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key.filter(|k| !k.trim().is_empty());
        self
    }

    /// Set the total timeout for `single-check` and `monitor-start`.
    ///
    /// Defaults to 120 seconds.
    #[must_use]
    pub const fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the upstream connect timeout.
    ///
    /// Defaults to 10 seconds.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Replace the CORS allowed request headers.
    #[must_use]
    pub fn with_allowed_headers(mut self, headers: Vec<String>) -> Self {
        self.allowed_headers = headers;
        self
    }

    /// Address string suitable for `TcpListener::bind`.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Whether an upstream credential is configured.
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Full upstream URL for an operation.
    pub fn upstream_endpoint(&self, operation: Operation) -> String {
        format!(
            "{}/{}",
            self.upstream_url.trim_end_matches('/'),
            operation.upstream_path()
        )
    }
}
