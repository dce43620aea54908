//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::path::Path;

use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let cache_enabled = if config.cache.enabled { "true" } else { "false" };

    format!(
        r#"[server]
; Tile server host name or address
host = {}
; TCP port (plain HTTP, no TLS)
port = {}
; Path before <zoom>/<x>/<y>.osmtile
url_prefix = {}

[connection]
; Requests sent over one connection before it is replaced (default: 100)
max_requests = {}
; A connection idle for longer than this is replaced, in milliseconds (default: 10000)
idle_timeout_ms = {}
; Timeout for establishing a connection, in milliseconds (default: 30000)
connect_timeout_ms = {}
; Timeout for each socket read, in milliseconds; 0 disables it (default: 0)
read_timeout_ms = {}

[cache]
; Keep a copy of every fetched tile on disk (default: false)
enabled = {}
; One <zoom>-<x>-<y>.tile file per tile
directory = {}

[decoder]
; Coordinate range used by the server (default: 4096)
reference_tile_size = {}
; Coordinate range delivered to the renderer (default: 400)
render_tile_size = {}

[logging]
; trace, debug, info, warn or error; RUST_LOG overrides this (default: info)
level = {}
file = {}
"#,
        config.server.host,
        config.server.port,
        config.server.url_prefix,
        config.connection.max_requests,
        config.connection.idle_timeout_ms,
        config.connection.connect_timeout_ms,
        config.connection.read_timeout_ms,
        cache_enabled,
        path_to_string(&config.cache.directory),
        config.decoder.reference_tile_size,
        config.decoder.render_tile_size,
        config.logging.level,
        path_to_string(&config.logging.file),
    )
}

/// Convert a path to string, using ~ for home directory.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}
