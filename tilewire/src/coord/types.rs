//! Coordinate type definitions

use std::fmt;

/// Highest zoom level the tile server publishes.
pub const MAX_ZOOM: u8 = 20;

/// Slippy-map tile address used as the request key.
///
/// Immutable and cheap to copy; the same value keys the request line and the
/// disk cache file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileCoord {
    /// Zoom level
    pub zoom: u8,
    /// X coordinate (west to east)
    pub x: u32,
    /// Y coordinate (north to south)
    pub y: u32,
}

impl TileCoord {
    /// Creates a tile coordinate, validating it against the zoom level.
    pub fn new(zoom: u8, x: u32, y: u32) -> Result<Self, CoordError> {
        if zoom > MAX_ZOOM {
            return Err(CoordError::InvalidZoom(zoom));
        }
        let limit = 1u64 << zoom;
        if u64::from(x) >= limit {
            return Err(CoordError::OutOfRange { axis: 'x', value: x, zoom });
        }
        if u64::from(y) >= limit {
            return Err(CoordError::OutOfRange { axis: 'y', value: y, zoom });
        }
        Ok(Self { zoom, x, y })
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.zoom, self.x, self.y)
    }
}

/// Errors that can occur when constructing a tile coordinate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    /// Zoom level is above [`MAX_ZOOM`]
    InvalidZoom(u8),
    /// Column or row does not exist at this zoom level
    OutOfRange { axis: char, value: u32, zoom: u8 },
}

impl fmt::Display for CoordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoordError::InvalidZoom(zoom) => {
                write!(
                    f,
                    "Invalid zoom level: {} (must be between 0 and {})",
                    zoom, MAX_ZOOM
                )
            }
            CoordError::OutOfRange { axis, value, zoom } => {
                write!(
                    f,
                    "Tile {} coordinate {} does not exist at zoom {} (max {})",
                    axis,
                    value,
                    zoom,
                    (1u64 << zoom) - 1
                )
            }
        }
    }
}

impl std::error::Error for CoordError {}
