//! Cache path construction and filename handling.

use crate::coord::TileCoord;
use std::path::{Path, PathBuf};

/// File extension of committed tiles.
pub const TILE_EXTENSION: &str = "tile";

/// Suffix appended to a tile file name while it is being written.
pub const TEMP_SUFFIX: &str = ".tmp";

/// File name of a cached tile: `<z>-<x>-<y>.tile`.
///
/// # Example
///
/// ```
/// use tilewire::cache::cache_file_name;
/// use tilewire::coord::TileCoord;
///
/// let tile = TileCoord::new(14, 8800, 5373).unwrap();
/// assert_eq!(cache_file_name(&tile), "14-8800-5373.tile");
/// ```
pub fn cache_file_name(tile: &TileCoord) -> String {
    format!("{}-{}-{}.{}", tile.zoom, tile.x, tile.y, TILE_EXTENSION)
}

/// Full path of a cached tile. The cache is flat; there are no
/// per-zoom subdirectories.
pub fn cache_path(cache_dir: &Path, tile: &TileCoord) -> PathBuf {
    cache_dir.join(cache_file_name(tile))
}

/// Path a tile is streamed to before it is committed.
pub fn temp_path(cache_dir: &Path, tile: &TileCoord) -> PathBuf {
    cache_dir.join(format!("{}{}", cache_file_name(tile), TEMP_SUFFIX))
}
