//! Disk cache for tile bodies.
//!
//! One flat directory, one file per tile, written while the tile streams
//! from the network and committed by rename once decoding succeeded.

mod disk;
mod path;
mod stats;
mod types;

pub use disk::{CacheWriter, CachedTile, DiskCache};
pub use path::{cache_file_name, cache_path, temp_path, TEMP_SUFFIX, TILE_EXTENSION};
pub use stats::CacheStats;
pub use types::CacheError;
