//! Fetcher configuration.

use crate::config::ConfigFile;
use crate::connection::ConnectionConfig;
use crate::wire::DEFAULT_SCALE;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings of a [`TileFetcher`](super::TileFetcher).
///
/// # Example
///
/// ```
/// use tilewire::fetcher::FetcherConfig;
///
/// let config = FetcherConfig::new()
///     .with_server("127.0.0.1", 8080)
///     .with_cache_dir("/tmp/tiles");
///
/// assert_eq!(config.connection().port(), 8080);
/// assert!(config.cache_dir().is_some());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FetcherConfig {
    connection: ConnectionConfig,
    /// Disk cache directory; `None` disables caching
    cache_dir: Option<PathBuf>,
    /// Divisor applied to wire coordinates
    scale: f32,
}

impl FetcherConfig {
    /// Create a new fetcher configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_connection(mut self, connection: ConnectionConfig) -> Self {
        self.connection = connection;
        self
    }

    /// Set the tile server host and port.
    pub fn with_server(mut self, host: impl Into<String>, port: u16) -> Self {
        self.connection = self.connection.with_server(host, port);
        self
    }

    /// Enable the disk cache in `dir`.
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Disable the disk cache.
    pub fn without_cache(mut self) -> Self {
        self.cache_dir = None;
        self
    }

    /// Set the coordinate divisor from the wire and render tile sizes.
    pub fn with_tile_sizes(mut self, reference: f32, render: f32) -> Self {
        self.scale = reference / render;
        self
    }

    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    pub fn cache_dir(&self) -> Option<&Path> {
        self.cache_dir.as_deref()
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            connection: ConnectionConfig::default(),
            cache_dir: None,
            scale: DEFAULT_SCALE,
        }
    }
}

impl From<&ConfigFile> for FetcherConfig {
    fn from(config: &ConfigFile) -> Self {
        let read_timeout = match config.connection.read_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };

        let connection = ConnectionConfig::new()
            .with_server(config.server.host.clone(), config.server.port)
            .with_url_prefix(config.server.url_prefix.clone())
            .with_max_requests(config.connection.max_requests)
            .with_idle_timeout(Duration::from_millis(config.connection.idle_timeout_ms))
            .with_connect_timeout(Duration::from_millis(config.connection.connect_timeout_ms))
            .with_read_timeout(read_timeout);

        Self {
            connection,
            cache_dir: config
                .cache
                .enabled
                .then(|| config.cache.directory.clone()),
            scale: config.decoder.scale(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_cache() {
        let config = FetcherConfig::default();
        assert!(config.cache_dir().is_none());
        assert_eq!(config.scale(), 4096.0 / 400.0);
    }

    #[test]
    fn test_from_config_file() {
        let mut file = ConfigFile::default();
        file.server.host = "tiles.local".to_string();
        file.server.port = 8080;
        file.connection.max_requests = 5;
        file.connection.read_timeout_ms = 1500;
        file.cache.enabled = true;
        file.cache.directory = PathBuf::from("/tmp/tilewire-cache");
        file.decoder.render_tile_size = 256.0;

        let config = FetcherConfig::from(&file);

        assert_eq!(config.connection().host(), "tiles.local");
        assert_eq!(config.connection().port(), 8080);
        assert_eq!(config.connection().max_requests(), 5);
        assert_eq!(
            config.connection().read_timeout(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(config.cache_dir(), Some(Path::new("/tmp/tilewire-cache")));
        assert_eq!(config.scale(), 16.0);
    }

    #[test]
    fn test_disabled_cache_and_zero_read_timeout() {
        let file = ConfigFile::default();

        let config = FetcherConfig::from(&file);

        assert!(config.cache_dir().is_none());
        assert_eq!(config.connection().read_timeout(), None);
    }

    #[test]
    fn test_without_cache() {
        let config = FetcherConfig::new().with_cache_dir("/tmp/x").without_cache();
        assert!(config.cache_dir().is_none());
    }
}
