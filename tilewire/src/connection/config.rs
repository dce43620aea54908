//! Connection configuration.

use crate::config::{
    DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_HOST, DEFAULT_IDLE_TIMEOUT_MS, DEFAULT_MAX_REQUESTS,
    DEFAULT_PORT, DEFAULT_URL_PREFIX,
};
use std::time::Duration;

/// Settings for a [`TileConnection`](super::TileConnection).
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use tilewire::connection::ConnectionConfig;
///
/// let config = ConnectionConfig::new()
///     .with_server("tiles.example.org", 8080)
///     .with_max_requests(20)
///     .with_read_timeout(Some(Duration::from_secs(5)));
///
/// assert_eq!(config.port(), 8080);
/// assert_eq!(config.max_requests(), 20);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    host: String,
    port: u16,
    /// Path before `<z>/<x>/<y>.osmtile`, with leading and trailing slash
    url_prefix: String,
    /// Requests served by one connection before it is replaced
    max_requests: u32,
    /// Idle time after which a connection is replaced instead of reused
    idle_timeout: Duration,
    connect_timeout: Duration,
    /// Bound on each blocking read; `None` blocks indefinitely
    read_timeout: Option<Duration>,
}

impl ConnectionConfig {
    /// Create a new connection configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile server host and port.
    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    /// Set the request path prefix.
    pub fn with_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.url_prefix = prefix.into();
        self
    }

    /// Set the number of requests per connection. Values below 1 are raised to 1.
    pub fn with_max_requests(mut self, max_requests: u32) -> Self {
        self.max_requests = max_requests.max(1);
        self
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.read_timeout = timeout;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }

    /// `host:port` for logging.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            url_prefix: DEFAULT_URL_PREFIX.to_string(),
            max_requests: DEFAULT_MAX_REQUESTS,
            idle_timeout: Duration::from_millis(DEFAULT_IDLE_TIMEOUT_MS),
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout: None,
        }
    }
}
