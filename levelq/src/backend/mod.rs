pub mod memory;

use crate::{Level, QueueResult};

pub use memory::MemoryStore;

/// Storage primitives for priority buckets
///
/// Implementations own the `{level -> bucket}` mapping; the key set of that
/// mapping is the active-level set. Every method must be safe to call from
/// many threads at once without external locking, and none may block waiting
/// for an element or for space.
pub trait PriorityStore<T>: Send + Sync {
    /// Append to the tail of an active level
    ///
    /// `on_commit` runs while the bucket is still locked, so anything it
    /// records is ordered exactly like the bucket mutations themselves.
    fn append_with<F>(&self, value: T, level: Level, on_commit: F) -> QueueResult<()>
    where
        F: FnOnce(&T, Level);

    /// Append to the lowest active level, resolved at call time
    ///
    /// Returns the level the value went to.
    fn append_default_with<F>(&self, value: T, on_commit: F) -> QueueResult<Level>
    where
        F: FnOnce(&T, Level);

    /// Create the level if missing, then append, as one step
    ///
    /// Returns `true` if the level had to be created.
    fn provision_and_append_with<F>(&self, value: T, level: Level, on_commit: F) -> bool
    where
        F: FnOnce(&T, Level);

    /// Remove the head of one level (`None` when that bucket is empty)
    ///
    /// `on_commit` only runs when an element was removed.
    fn pop_level_with<F>(&self, level: Level, on_commit: F) -> QueueResult<Option<T>>
    where
        F: FnOnce(&T, Level);

    /// Remove the head of the highest non-empty level
    fn pop_with<F>(&self, on_commit: F) -> Option<(T, Level)>
    where
        F: FnOnce(&T, Level);

    fn append(&self, value: T, level: Level) -> QueueResult<()> {
        self.append_with(value, level, |_, _| {})
    }

    fn append_default(&self, value: T) -> QueueResult<Level> {
        self.append_default_with(value, |_, _| {})
    }

    fn provision_and_append(&self, value: T, level: Level) -> bool {
        self.provision_and_append_with(value, level, |_, _| {})
    }

    fn pop_level(&self, level: Level) -> QueueResult<Option<T>> {
        self.pop_level_with(level, |_, _| {})
    }

    fn pop(&self) -> Option<(T, Level)> {
        self.pop_with(|_, _| {})
    }

    /// Head of one level without removing it
    fn peek_level(&self, level: Level) -> QueueResult<Option<T>>
    where
        T: Clone;

    /// Head of the highest non-empty level without removing it
    fn peek(&self) -> Option<(T, Level)>
    where
        T: Clone;

    /// Ensure the level exists; returns `true` if a bucket was created
    fn add_level(&self, level: Level) -> bool;

    /// Drop the level and everything queued in it; absent levels are a no-op
    fn delete_level(&self, level: Level) -> bool;

    /// Point-in-time element count across all levels
    fn total_len(&self) -> usize;

    fn len_of(&self, level: Level) -> QueueResult<usize>;

    /// Head-to-tail copy of one bucket
    fn snapshot(&self, level: Level) -> QueueResult<Vec<T>>
    where
        T: Clone;

    /// Active levels, in no particular order
    fn levels(&self) -> Vec<Level>;

    fn contains_level(&self, level: Level) -> bool;

    fn min_level(&self) -> Option<Level>;

    /// Remove every level and bucket
    fn clear(&self);

    /// Value handed out when a lookup finds nothing
    fn sentinel(&self) -> &T;
}
