//! Decoding error types.

use super::varint::VarintError;
use crate::tags::TagBindError;
use std::io;
use thiserror::Error;

/// Fault that invalidates the whole tile.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Varint longer than the tolerated maximum
    #[error("malformed varint at content offset {offset}")]
    MalformedVarint { offset: usize },

    /// A single field does not fit the read buffer
    #[error("requested span of {requested} bytes exceeds buffer capacity {capacity}")]
    SpanTooLarge { requested: usize, capacity: usize },

    /// Content ended before a field was complete
    #[error("tile content truncated: needed {needed} bytes at offset {offset}, {available} left")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A tag value is not UTF-8
    #[error("tag value at content offset {offset} is not valid UTF-8")]
    InvalidUtf8 { offset: usize },

    /// `TAG_KEYS` listed more keys than `NUM_TAGS` announced
    #[error("tile declares {declared} variable tags but lists {found} key ids")]
    TagCountExceeded { declared: usize, found: usize },

    /// A `TAG_VALUES` string could not be bound
    #[error("invalid variable tag: {0}")]
    TagBind(#[from] TagBindError),

    /// Reading the underlying stream failed. Not a fault of the tile
    /// itself; callers classify it by where the bytes came from.
    #[error("stream read failed: {0}")]
    Read(#[from] io::Error),
}

impl FormatError {
    pub(crate) fn from_varint(err: VarintError, offset: usize, available: usize) -> Self {
        match err {
            VarintError::Malformed => FormatError::MalformedVarint { offset },
            VarintError::Truncated(read) => FormatError::Truncated {
                offset,
                needed: read + 1,
                available,
            },
        }
    }
}

/// Reason a single element was dropped. Decoding continues with the next one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ElementError {
    /// The element carried no `TAGS` field
    #[error("element has no tags")]
    MissingTags,

    /// `NUM_INDICES` was zero
    #[error("element declares zero subpaths")]
    NoSubpaths,

    /// `INDEX` listed fewer node counts than `NUM_INDICES`
    #[error("element declares {declared} subpaths but index lists {found}")]
    IndexCount { declared: usize, found: usize },

    /// No coordinates were announced, so the coordinate stream was skipped
    #[error("element has no coordinates")]
    EmptyGeometry,

    /// Decoded coordinate count differs from the index total
    #[error("expected {expected} coordinates, decoded {decoded}")]
    CoordinateMismatch { expected: usize, decoded: usize },

    /// Field number not defined for elements
    #[error("unknown element field {0}")]
    UnknownField(u32),
}
