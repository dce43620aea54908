//! Tile addressing.
//!
//! Provides the [`TileCoord`] request key used for request lines and cache
//! file names.

mod types;

pub use types::{CoordError, TileCoord, MAX_ZOOM};
