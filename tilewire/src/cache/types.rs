//! Cache error type.

use std::path::PathBuf;
use thiserror::Error;

/// Cache-related errors.
///
/// Never fatal for a query: the tile is served without caching.
#[derive(Debug, Error)]
pub enum CacheError {
    /// I/O error during cache operations
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configured cache path exists but is not a directory
    #[error("Cache path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    /// The cache directory cannot be written
    #[error("Cache directory is read-only: {}", .0.display())]
    ReadOnly(PathBuf),
}
