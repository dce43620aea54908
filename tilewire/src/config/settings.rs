//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;

/// Complete configuration loaded from config.ini.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    /// Tile server address
    pub server: ServerSettings,
    /// Connection reuse and timeouts
    pub connection: ConnectionSettings,
    /// Disk cache settings
    pub cache: CacheSettings,
    /// Coordinate scaling
    pub decoder: DecoderSettings,
    /// Logging settings
    pub logging: LoggingSettings,
}

/// Tile server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Path prefix before `<z>/<x>/<y>.osmtile`, always ending in `/`
    pub url_prefix: String,
}

/// Connection configuration. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// Requests per connection before it is replaced
    pub max_requests: u32,
    /// Idle time after which a connection is replaced
    pub idle_timeout_ms: u64,
    pub connect_timeout_ms: u64,
    /// Per-read timeout; 0 disables it
    pub read_timeout_ms: u64,
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub enabled: bool,
    /// Cache directory path
    pub directory: PathBuf,
}

/// Decoder configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct DecoderSettings {
    /// Coordinate range of the wire format
    pub reference_tile_size: f32,
    /// Coordinate range delivered to the sink
    pub render_tile_size: f32,
}

impl DecoderSettings {
    /// Divisor applied to wire coordinates.
    pub fn scale(&self) -> f32 {
        self.reference_tile_size / self.render_tile_size
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingSettings {
    /// Default filter level when `RUST_LOG` is not set
    pub level: String,
    /// Log file path
    pub file: PathBuf,
}
