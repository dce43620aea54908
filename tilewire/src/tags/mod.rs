//! Attribute tags attached to decoded elements.
//!
//! Two kinds of tags reach a [`TileSink`](crate::fetcher::TileSink):
//!
//! - **constant** tags come from the process-wide [`TagDictionary`] and are
//!   shared by every tile,
//! - **variable** tags are declared inside a tile (typically names and refs)
//!   and live in that tile's [`TagTable`].
//!
//! Tag strings are reference counted so resolving a tag for an element never
//! copies string data.

mod dictionary;
mod table;

pub use dictionary::{TagDictionary, TAG_LIMIT};
pub use table::{TagBindError, TagTable};

use std::fmt;
use std::sync::Arc;

/// Well-known key carrying a feature's display name.
pub const KEY_NAME: &str = "name";

/// One key/value attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Attribute key, always one of the dictionary's keys
    pub key: Arc<str>,
    /// Attribute value
    pub value: Arc<str>,
    /// True when the value was declared by the current tile rather than
    /// taken from the dictionary
    pub is_variable: bool,
}

impl Tag {
    /// Creates a dictionary constant.
    pub fn constant(key: Arc<str>, value: impl Into<Arc<str>>) -> Self {
        Self {
            key,
            value: value.into(),
            is_variable: false,
        }
    }

    /// Creates a tile-local tag.
    pub fn variable(key: Arc<str>, value: impl Into<Arc<str>>) -> Self {
        Self {
            key,
            value: value.into(),
            is_variable: true,
        }
    }

    /// Returns true if this tag has the given key and value.
    pub fn is(&self, key: &str, value: &str) -> bool {
        &*self.key == key && &*self.value == value
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}
