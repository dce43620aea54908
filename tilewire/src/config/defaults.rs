//! Default values and constants for all configuration settings.

use std::path::PathBuf;

use super::file::config_directory;
use super::settings::*;
use crate::wire::{REFERENCE_TILE_SIZE, RENDER_TILE_SIZE};

// =============================================================================
// Server
// =============================================================================

pub const DEFAULT_HOST: &str = "city.informatik.uni-bremen.de";
pub const DEFAULT_PORT: u16 = 80;
pub const DEFAULT_URL_PREFIX: &str = "/osci/oscim/";

// =============================================================================
// Connection
// =============================================================================

/// Requests served by one socket before it is replaced.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Idle time after which a socket is not reused (10 s).
pub const DEFAULT_IDLE_TIMEOUT_MS: u64 = 10_000;

/// Connect timeout per address (30 s).
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 30_000;

/// Reads block indefinitely by default.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 0;

// =============================================================================
// Cache, decoder, logging
// =============================================================================

pub const DEFAULT_CACHE_ENABLED: bool = false;

pub const DEFAULT_REFERENCE_TILE_SIZE: f32 = REFERENCE_TILE_SIZE;
pub const DEFAULT_RENDER_TILE_SIZE: f32 = RENDER_TILE_SIZE;

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Accepted values for `[logging] level`.
pub const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Default cache directory (~/.tilewire/cache).
pub fn default_cache_dir() -> PathBuf {
    config_directory().join("cache")
}

/// Default log file (~/.tilewire/logs/tilewire.log).
pub fn default_log_file() -> PathBuf {
    config_directory().join("logs").join("tilewire.log")
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            server: ServerSettings {
                host: DEFAULT_HOST.to_string(),
                port: DEFAULT_PORT,
                url_prefix: DEFAULT_URL_PREFIX.to_string(),
            },
            connection: ConnectionSettings {
                max_requests: DEFAULT_MAX_REQUESTS,
                idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
                connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
                read_timeout_ms: DEFAULT_READ_TIMEOUT_MS,
            },
            cache: CacheSettings {
                enabled: DEFAULT_CACHE_ENABLED,
                directory: default_cache_dir(),
            },
            decoder: DecoderSettings {
                reference_tile_size: DEFAULT_REFERENCE_TILE_SIZE,
                render_tile_size: DEFAULT_RENDER_TILE_SIZE,
            },
            logging: LoggingSettings {
                level: DEFAULT_LOG_LEVEL.to_string(),
                file: default_log_file(),
            },
        }
    }
}
