//! Per-tile table of variable tags.

use super::{Tag, TagDictionary};
use thiserror::Error;

const MAX_PRESIZE: usize = 4096;

/// Failure binding a `TAG_VALUES` string to its slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagBindError {
    /// More values than key ids were received
    #[error("tag value for slot {slot} has no key id (only {declared} keys declared)")]
    NoKey { slot: usize, declared: usize },

    /// The key id is not in the dictionary's key table
    #[error("tag key id {key_id} for slot {slot} is not a dictionary key")]
    UnknownKey { slot: usize, key_id: u32 },
}

/// Variable tags declared by the tile currently being decoded.
///
/// Filled in three steps that mirror the tile layout: [`declare`](Self::declare)
/// from `NUM_TAGS`, [`set_key_ids`](Self::set_key_ids) from `TAG_KEYS`, then one
/// [`bind_next`](Self::bind_next) per `TAG_VALUES` occurrence. Element tag
/// references may only address slots that are already bound.
///
/// The backing vectors keep their capacity across tiles.
#[derive(Debug, Default)]
pub struct TagTable {
    key_ids: Vec<u32>,
    tags: Vec<Tag>,
    declared: usize,
}

impl TagTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forgets every tag from the previous tile.
    pub fn reset(&mut self) {
        self.key_ids.clear();
        self.tags.clear();
        self.declared = 0;
    }

    /// Records the variable tag count announced by the tile.
    pub fn declare(&mut self, count: usize) {
        self.declared = count;
        // Announced counts come off the wire; grow on demand past this
        let wanted = count.min(MAX_PRESIZE);
        if wanted > self.tags.capacity() {
            self.tags.reserve(wanted - self.tags.len());
        }
    }

    /// Number of slots announced by `NUM_TAGS`.
    pub fn declared(&self) -> usize {
        self.declared
    }

    /// Replaces the key ids, one per slot.
    pub fn set_key_ids(&mut self, key_ids: impl IntoIterator<Item = u32>) {
        self.key_ids.clear();
        self.key_ids.extend(key_ids);
    }

    /// Binds `value` to the next unbound slot, using the slot's key id.
    pub fn bind_next(
        &mut self,
        dictionary: &TagDictionary,
        value: &str,
    ) -> Result<&Tag, TagBindError> {
        let slot = self.tags.len();
        let key_id = *self.key_ids.get(slot).ok_or(TagBindError::NoKey {
            slot,
            declared: self.key_ids.len(),
        })?;
        let key = dictionary
            .key(key_id)
            .ok_or(TagBindError::UnknownKey { slot, key_id })?;

        self.tags.push(Tag::variable(key.clone(), value));
        Ok(&self.tags[slot])
    }

    /// Number of bound tags; valid reference indices are `0..bound()`.
    #[inline]
    pub fn bound(&self) -> usize {
        self.tags.len()
    }

    /// Returns the bound tag at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Tag> {
        self.tags.get(index)
    }
}
