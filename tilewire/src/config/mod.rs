//! Configuration file for the tile fetcher and CLI.
//!
//! # Example
//!
//! ```
//! use tilewire::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! assert_eq!(config.connection.max_requests, 100);
//! assert_eq!(config.decoder.scale(), 4096.0 / 400.0);
//! ```

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use settings::{
    CacheSettings, ConfigFile, ConnectionSettings, DecoderSettings, LoggingSettings,
    ServerSettings,
};
