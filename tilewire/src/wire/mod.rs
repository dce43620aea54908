//! Tile wire format.
//!
//! A tile body is a protobuf-like sequence of fields. Every field starts
//! with a varint key whose upper bits (`key >> 3`) select the field; the
//! low three bits are ignored. A zero key ends the tile early.
//!
//! Tile-level fields:
//!
//! | field | name         | payload                                  |
//! |-------|--------------|------------------------------------------|
//! | 1     | `NUM_TAGS`   | varint: number of variable tags          |
//! | 2     | `TAG_KEYS`   | packed varints: dictionary key id per tag|
//! | 3     | `TAG_VALUES` | string: value of the next variable tag   |
//! | 11    | `LINE`       | element                                  |
//! | 12    | `POLY`       | element                                  |
//! | 13    | `POINT`      | element                                  |
//!
//! An element is a length-prefixed span with its own fields:
//!
//! | field | name          | payload                                    |
//! |-------|---------------|--------------------------------------------|
//! | 1     | `NUM_INDICES` | varint: subpath count, default 1           |
//! | 11    | `TAGS`        | packed varints: tag references             |
//! | 12    | `INDEX`       | packed varints: node count per subpath     |
//! | 13    | `COORDS`      | packed zigzag deltas, alternating x and y  |
//! | 21    | `LAYER`       | varint, default 5                          |
//!
//! Tag references below [`TAG_LIMIT`](crate::tags::TAG_LIMIT) address the
//! built-in dictionary; larger ones address the tile's variable tags.

mod buffer;
mod decoder;
pub mod encoder;
mod error;
mod varint;

pub use buffer::{ByteStream, ReadBuffer, BUFFER_SIZE};
pub use decoder::{DecodeSummary, WireDecoder, DEFAULT_LAYER, SUBPATH_END};
pub use encoder::{ElementBuilder, TileEncoder};
pub use error::{ElementError, FormatError};
pub use varint::{
    decode_varint32, encode_varint32, varint_len, zigzag_decode, zigzag_encode, VarintError,
    MAX_VARINT_LEN,
};

/// Wire units per render-tile unit, as produced by the tile server.
pub const REFERENCE_TILE_SIZE: f32 = 4096.0;

/// Render-tile size the decoded coordinates are scaled to.
pub const RENDER_TILE_SIZE: f32 = 400.0;

/// Default coordinate divisor.
pub const DEFAULT_SCALE: f32 = REFERENCE_TILE_SIZE / RENDER_TILE_SIZE;

pub(crate) const TILE_NUM_TAGS: u32 = 1;
pub(crate) const TILE_TAG_KEYS: u32 = 2;
pub(crate) const TILE_TAG_VALUES: u32 = 3;
pub(crate) const TILE_LINE: u32 = 11;
pub(crate) const TILE_POLY: u32 = 12;
pub(crate) const TILE_POINT: u32 = 13;

pub(crate) const ELEM_NUM_INDICES: u32 = 1;
pub(crate) const ELEM_TAGS: u32 = 11;
pub(crate) const ELEM_INDEX: u32 = 12;
pub(crate) const ELEM_COORDS: u32 = 13;
pub(crate) const ELEM_LAYER: u32 = 21;
