use serde::{Deserialize, Serialize};

use super::{Level, EMPTY_LEVEL};

/// Result of a dequeue or peek
///
/// A lookup that found nothing carries the configured sentinel instead of a
/// bare value, so a real element that happens to equal the sentinel is still
/// distinguishable from an empty queue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome<T> {
    /// An element taken from (or seen at the head of) the bucket for `level`
    Found { value: T, level: Level },

    /// Nothing was available at `level` (`0` for whole-queue lookups)
    Empty { sentinel: T, level: Level },
}

impl<T> Outcome<T> {
    pub fn found(value: T, level: Level) -> Self {
        Self::Found { value, level }
    }

    /// Empty outcome for a whole-queue lookup
    pub fn empty(sentinel: T) -> Self {
        Self::Empty { sentinel, level: EMPTY_LEVEL }
    }

    /// Empty outcome for a lookup on one level
    pub fn empty_at(sentinel: T, level: Level) -> Self {
        Self::Empty { sentinel, level }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found { .. })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty { .. })
    }

    /// The level the element came from, or the level that was empty
    pub fn level(&self) -> Level {
        match self {
            Self::Found { level, .. } | Self::Empty { level, .. } => *level,
        }
    }

    /// The element, or the sentinel when nothing was available
    pub fn value(&self) -> &T {
        match self {
            Self::Found { value, .. } => value,
            Self::Empty { sentinel, .. } => sentinel,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Found { value, .. } => value,
            Self::Empty { sentinel, .. } => sentinel,
        }
    }

    /// The element only; `None` for empty lookups
    pub fn into_found(self) -> Option<T> {
        match self {
            Self::Found { value, .. } => Some(value),
            Self::Empty { .. } => None,
        }
    }
}
