//! Configuration management CLI commands.
//!
//! Provides `config init`, `config show` and `config path`.

use clap::Subcommand;
use std::path::{Path, PathBuf};
use tilewire::config::{config_file_path, ConfigFile};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Write a config file with default settings
    Init {
        /// Where to write the file (default: ~/.tilewire/config.ini)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective settings
    Show {
        /// Config file to read (default: ~/.tilewire/config.ini)
        #[arg(long)]
        path: Option<PathBuf>,
    },

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init { path, force } => run_init(&resolve(path), force),
        ConfigCommands::Show { path } => run_show(&resolve(path)),
        ConfigCommands::Path => run_path(),
    }
}

fn resolve(path: Option<PathBuf>) -> PathBuf {
    path.unwrap_or_else(config_file_path)
}

/// Write the default configuration.
fn run_init(path: &Path, force: bool) -> Result<(), CliError> {
    if force {
        ConfigFile::default().save_to(path)?;
        println!("Wrote default configuration to {}", path.display());
        return Ok(());
    }

    if ConfigFile::ensure_exists_at(path)? {
        println!("Created configuration file: {}", path.display());
    } else {
        println!("Configuration file already exists: {}", path.display());
        println!("Use --force to overwrite it with defaults.");
    }
    Ok(())
}

/// Print the settings a fetch would use.
fn run_show(path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(path)?;

    if path.exists() {
        println!("# {}", path.display());
    } else {
        println!("# {} (not found, showing defaults)", path.display());
    }
    print!("{}", format_settings(&config));
    Ok(())
}

/// Show the configuration file path.
fn run_path() -> Result<(), CliError> {
    println!("{}", config_file_path().display());
    Ok(())
}

fn format_settings(config: &ConfigFile) -> String {
    let read_timeout = match config.connection.read_timeout_ms {
        0 => "disabled".to_string(),
        ms => format!("{} ms", ms),
    };
    let sections: [(&str, Vec<(&str, String)>); 5] = [
        (
            "server",
            vec![
                ("host", config.server.host.clone()),
                ("port", config.server.port.to_string()),
                ("url_prefix", config.server.url_prefix.clone()),
            ],
        ),
        (
            "connection",
            vec![
                ("max_requests", config.connection.max_requests.to_string()),
                (
                    "idle_timeout",
                    format!("{} ms", config.connection.idle_timeout_ms),
                ),
                (
                    "connect_timeout",
                    format!("{} ms", config.connection.connect_timeout_ms),
                ),
                ("read_timeout", read_timeout),
            ],
        ),
        (
            "cache",
            vec![
                ("enabled", config.cache.enabled.to_string()),
                ("directory", config.cache.directory.display().to_string()),
            ],
        ),
        (
            "decoder",
            vec![
                (
                    "reference_tile_size",
                    config.decoder.reference_tile_size.to_string(),
                ),
                ("render_tile_size", config.decoder.render_tile_size.to_string()),
                ("scale", config.decoder.scale().to_string()),
            ],
        ),
        (
            "logging",
            vec![
                ("level", config.logging.level.clone()),
                ("file", config.logging.file.display().to_string()),
            ],
        ),
    ];

    let mut out = String::new();
    for (section, entries) in &sections {
        out.push_str(&format!("\n[{}]\n", section));
        for (key, value) in entries {
            out.push_str(&format!("  {} = {}\n", key, value));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_settings_lists_every_section() {
        let text = format_settings(&ConfigFile::default());
        for section in ["[server]", "[connection]", "[cache]", "[decoder]", "[logging]"] {
            assert!(text.contains(section), "missing {}", section);
        }
        assert!(text.contains("  max_requests = 100\n"));
        assert!(text.contains("  read_timeout = disabled\n"));
    }

    #[test]
    fn test_init_does_not_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.ini");
        std::fs::write(&path, "[server]\nport = 8080\n").unwrap();

        run_init(&path, false).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap().server.port, 8080);

        run_init(&path, true).unwrap();
        assert_eq!(ConfigFile::load_from(&path).unwrap(), ConfigFile::default());
    }
}
