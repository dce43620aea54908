//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::defaults::LOG_LEVELS;
use super::file::ConfigFileError;
use super::settings::ConfigFile;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [server] section
    if let Some(section) = ini.section(Some("server")) {
        if let Some(v) = section.get("host") {
            let v = v.trim();
            if v.is_empty() {
                return Err(invalid("server", "host", v, "must not be empty"));
            }
            config.server.host = v.to_string();
        }
        if let Some(v) = section.get("port") {
            let port: u16 = parse_number("server", "port", v, "must be a port number (1-65535)")?;
            if port == 0 {
                return Err(invalid("server", "port", v, "must be a port number (1-65535)"));
            }
            config.server.port = port;
        }
        if let Some(v) = section.get("url_prefix") {
            let v = v.trim();
            if !v.starts_with('/') {
                return Err(invalid("server", "url_prefix", v, "must start with '/'"));
            }
            config.server.url_prefix = if v.ends_with('/') {
                v.to_string()
            } else {
                format!("{}/", v)
            };
        }
    }

    // [connection] section
    if let Some(section) = ini.section(Some("connection")) {
        if let Some(v) = section.get("max_requests") {
            let max: u32 = parse_number(
                "connection",
                "max_requests",
                v,
                "must be a positive integer",
            )?;
            if max == 0 {
                return Err(invalid(
                    "connection",
                    "max_requests",
                    v,
                    "must be a positive integer",
                ));
            }
            config.connection.max_requests = max;
        }
        if let Some(v) = section.get("idle_timeout_ms") {
            config.connection.idle_timeout_ms = parse_number(
                "connection",
                "idle_timeout_ms",
                v,
                "must be an integer (milliseconds)",
            )?;
        }
        if let Some(v) = section.get("connect_timeout_ms") {
            let ms: u64 = parse_number(
                "connection",
                "connect_timeout_ms",
                v,
                "must be a positive integer (milliseconds)",
            )?;
            if ms == 0 {
                return Err(invalid(
                    "connection",
                    "connect_timeout_ms",
                    v,
                    "must be a positive integer (milliseconds)",
                ));
            }
            config.connection.connect_timeout_ms = ms;
        }
        if let Some(v) = section.get("read_timeout_ms") {
            config.connection.read_timeout_ms = parse_number(
                "connection",
                "read_timeout_ms",
                v,
                "must be an integer (milliseconds, 0 = none)",
            )?;
        }
    }

    // [cache] section
    if let Some(section) = ini.section(Some("cache")) {
        if let Some(v) = section.get("enabled") {
            config.cache.enabled = parse_bool(v);
        }
        if let Some(v) = section.get("directory") {
            let v = v.trim();
            if !v.is_empty() {
                config.cache.directory = expand_tilde(v);
            }
        }
    }

    // [decoder] section
    if let Some(section) = ini.section(Some("decoder")) {
        if let Some(v) = section.get("reference_tile_size") {
            config.decoder.reference_tile_size =
                parse_tile_size("reference_tile_size", v)?;
        }
        if let Some(v) = section.get("render_tile_size") {
            config.decoder.render_tile_size = parse_tile_size("render_tile_size", v)?;
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("level") {
            let v = v.trim().to_lowercase();
            if !LOG_LEVELS.contains(&v.as_str()) {
                return Err(ConfigFileError::InvalidValue {
                    section: "logging".to_string(),
                    key: "level".to_string(),
                    value: v,
                    reason: "must be one of: trace, debug, info, warn, error".to_string(),
                });
            }
            config.logging.level = v;
        }
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    Ok(config)
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse_number<T: FromStr>(
    section: &str,
    key: &str,
    value: &str,
    reason: &str,
) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, reason))
}

fn parse_tile_size(key: &str, value: &str) -> Result<f32, ConfigFileError> {
    let size: f32 = parse_number("decoder", key, value, "must be a positive number")?;
    if !size.is_finite() || size <= 0.0 {
        return Err(invalid("decoder", key, value, "must be a positive number"));
    }
    Ok(size)
}

/// Parse a boolean value from a config string.
/// Accepts: true/false, yes/no, 1/0, on/off (case-insensitive)
pub(super) fn parse_bool(value: &str) -> bool {
    let v = value.trim().to_lowercase();
    v == "true" || v == "1" || v == "yes" || v == "on"
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::defaults::*;
    use tempfile::TempDir;

    fn load(content: &str) -> Result<ConfigFile, ConfigFileError> {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");
        std::fs::write(&config_path, content).unwrap();
        ConfigFile::load_from(&config_path)
    }

    #[test]
    fn test_partial_config() {
        // Only specify some settings, rest should use defaults
        let config = load(
            r#"
[server]
host = localhost
port = 8080

[connection]
max_requests = 20
"#,
        )
        .unwrap();

        // Specified values
        assert_eq!(config.server.host, "localhost");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.connection.max_requests, 20);

        // Default values
        assert_eq!(config.server.url_prefix, DEFAULT_URL_PREFIX);
        assert_eq!(config.connection.idle_timeout_ms, DEFAULT_IDLE_TIMEOUT_MS);
        assert!(!config.cache.enabled);
    }

    #[test]
    fn test_invalid_port() {
        let err = load("[server]\nport = 70000\n").unwrap_err();
        assert!(err.to_string().contains("server.port"));

        let err = load("[server]\nport = 0\n").unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_url_prefix_gets_trailing_slash() {
        let config = load("[server]\nurl_prefix = /tiles\n").unwrap();
        assert_eq!(config.server.url_prefix, "/tiles/");
    }

    #[test]
    fn test_url_prefix_must_be_absolute() {
        let err = load("[server]\nurl_prefix = tiles/\n").unwrap_err();
        assert!(err.to_string().contains("must start with '/'"));
    }

    #[test]
    fn test_zero_max_requests_rejected() {
        let err = load("[connection]\nmax_requests = 0\n").unwrap_err();
        assert!(matches!(err, ConfigFileError::InvalidValue { ref key, .. } if key == "max_requests"));
    }

    #[test]
    fn test_read_timeout() {
        let config = load("[connection]\nread_timeout_ms = 1500\n").unwrap();
        assert_eq!(config.connection.read_timeout_ms, 1500);
    }

    #[test]
    fn test_cache_section() {
        let config = load("[cache]\nenabled = yes\ndirectory = /var/cache/tiles\n").unwrap();
        assert!(config.cache.enabled);
        assert_eq!(config.cache.directory, PathBuf::from("/var/cache/tiles"));
    }

    #[test]
    fn test_decoder_sizes() {
        let config = load("[decoder]\nrender_tile_size = 256\n").unwrap();
        assert_eq!(config.decoder.render_tile_size, 256.0);
        assert_eq!(config.decoder.scale(), 16.0);

        assert!(load("[decoder]\nrender_tile_size = 0\n").is_err());
        assert!(load("[decoder]\nreference_tile_size = big\n").is_err());
    }

    #[test]
    fn test_log_level() {
        let config = load("[logging]\nlevel = DEBUG\n").unwrap();
        assert_eq!(config.logging.level, "debug");

        let err = load("[logging]\nlevel = loud\n").unwrap_err();
        assert!(err.to_string().contains("must be one of"));
    }

    #[test]
    fn test_expand_tilde() {
        let path = expand_tilde("~/test/path");
        if let Some(home) = dirs::home_dir() {
            assert_eq!(path, home.join("test/path"));
        }

        // Non-tilde paths should be unchanged
        let path = expand_tilde("/absolute/path");
        assert_eq!(path, PathBuf::from("/absolute/path"));
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "1", "yes", "on", " TRUE "] {
            assert!(parse_bool(v), "{} should be true", v);
        }
        for v in ["false", "0", "no", "off", ""] {
            assert!(!parse_bool(v), "{} should be false", v);
        }
    }
}
