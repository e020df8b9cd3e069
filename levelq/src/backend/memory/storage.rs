use std::collections::VecDeque;

use dashmap::{mapref::entry::Entry, DashMap};
use parking_lot::Mutex;

use crate::{
    QueueResult, QueueError, Level,
    backend::PriorityStore,
    types::priority::{lowest, service_order},
};

/// One level's FIFO buffer
pub(crate) struct Bucket<T> {
    items: Mutex<VecDeque<T>>,
}

impl<T> Bucket<T> {
    fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
        }
    }

    /// Push, then run `on_commit` before the lock is released
    fn push_back_with(&self, value: T, on_commit: impl FnOnce(&T)) {
        let mut items = self.items.lock();
        items.push_back(value);
        if let Some(value) = items.back() {
            on_commit(value);
        }
    }

    /// Pop, then run `on_commit` before the lock is released
    fn pop_front_with(&self, on_commit: impl FnOnce(&T)) -> Option<T> {
        let mut items = self.items.lock();
        let value = items.pop_front()?;
        on_commit(&value);
        Some(value)
    }

    fn front(&self) -> Option<T>
    where
        T: Clone,
    {
        self.items.lock().front().cloned()
    }

    fn len(&self) -> usize {
        self.items.lock().len()
    }

    fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.items.lock().iter().cloned().collect()
    }
}

/// Default-priority appends give up after this many minimum levels vanish
/// between resolution and append
pub const MAX_RESOLVE_ATTEMPTS: usize = 64;

/// In-memory bucket store
///
/// Buckets live in a sharded map keyed by level. Every bucket operation runs
/// while holding that level's map entry, so a concurrent `delete_level` on
/// the same level either happens entirely before it (the operation sees the
/// level as gone) or entirely after it (the element goes away with the
/// bucket). No operation holds more than one bucket lock.
pub struct MemoryStore<T> {
    /// Bucket storage: level -> FIFO buffer
    pub(crate) buckets: DashMap<Level, Bucket<T>>,

    /// Returned by lookups that find nothing
    sentinel: T,
}

impl<T> MemoryStore<T> {
    /// Create a store with the initial levels and sentinel
    pub fn new(levels: impl IntoIterator<Item = Level>, sentinel: T) -> QueueResult<Self> {
        Self::build(DashMap::new(), levels, sentinel)
    }

    /// Create a store with an explicit shard count (power of two, > 1)
    pub fn with_shard_amount(
        levels: impl IntoIterator<Item = Level>,
        sentinel: T,
        shard_amount: usize,
    ) -> QueueResult<Self> {
        if shard_amount < 2 || !shard_amount.is_power_of_two() {
            return Err(QueueError::invalid_configuration(format!(
                "shard amount must be a power of two greater than 1, got {}",
                shard_amount
            )));
        }
        Self::build(DashMap::with_shard_amount(shard_amount), levels, sentinel)
    }

    fn build(
        buckets: DashMap<Level, Bucket<T>>,
        levels: impl IntoIterator<Item = Level>,
        sentinel: T,
    ) -> QueueResult<Self> {
        for level in levels {
            buckets.entry(level).or_insert_with(Bucket::new);
        }

        if buckets.is_empty() {
            return Err(QueueError::invalid_configuration(
                "at least one priority level is required",
            ));
        }

        Ok(Self { buckets, sentinel })
    }
}

impl<T: Send + Sync> PriorityStore<T> for MemoryStore<T> {
    fn append_with<F>(&self, value: T, level: Level, on_commit: F) -> QueueResult<()>
    where
        F: FnOnce(&T, Level),
    {
        let bucket = self.buckets.get(&level).ok_or(QueueError::LevelNotFound(level))?;
        bucket.push_back_with(value, |value| on_commit(value, level));
        Ok(())
    }

    fn append_default_with<F>(&self, value: T, on_commit: F) -> QueueResult<Level>
    where
        F: FnOnce(&T, Level),
    {
        let mut level = self.min_level().ok_or(QueueError::NoActiveLevels)?;
        for _ in 0..MAX_RESOLVE_ATTEMPTS {
            if let Some(bucket) = self.buckets.get(&level) {
                bucket.push_back_with(value, |value| on_commit(value, level));
                return Ok(level);
            }
            // Minimum was deleted after it was resolved; resolve again
            level = self.min_level().ok_or(QueueError::NoActiveLevels)?;
        }
        Err(QueueError::LevelNotFound(level))
    }

    fn provision_and_append_with<F>(&self, value: T, level: Level, on_commit: F) -> bool
    where
        F: FnOnce(&T, Level),
    {
        match self.buckets.entry(level) {
            Entry::Occupied(entry) => {
                entry.get().push_back_with(value, |value| on_commit(value, level));
                false
            }
            Entry::Vacant(entry) => {
                // The vacant entry holds the shard write lock until the insert
                entry
                    .insert(Bucket::new())
                    .push_back_with(value, |value| on_commit(value, level));
                true
            }
        }
    }

    fn pop_level_with<F>(&self, level: Level, on_commit: F) -> QueueResult<Option<T>>
    where
        F: FnOnce(&T, Level),
    {
        let bucket = self.buckets.get(&level).ok_or(QueueError::LevelNotFound(level))?;
        Ok(bucket.pop_front_with(|value| on_commit(value, level)))
    }

    fn pop_with<F>(&self, on_commit: F) -> Option<(T, Level)>
    where
        F: FnOnce(&T, Level),
    {
        let mut on_commit = Some(on_commit);
        for level in service_order(self.levels()) {
            // Levels deleted since the snapshot are skipped
            let Some(bucket) = self.buckets.get(&level) else {
                continue;
            };
            let popped = bucket.pop_front_with(|value| {
                if let Some(on_commit) = on_commit.take() {
                    on_commit(value, level);
                }
            });
            if let Some(value) = popped {
                return Some((value, level));
            }
        }
        None
    }

    fn peek_level(&self, level: Level) -> QueueResult<Option<T>>
    where
        T: Clone,
    {
        let bucket = self.buckets.get(&level).ok_or(QueueError::LevelNotFound(level))?;
        Ok(bucket.front())
    }

    fn peek(&self) -> Option<(T, Level)>
    where
        T: Clone,
    {
        for level in service_order(self.levels()) {
            let Some(bucket) = self.buckets.get(&level) else {
                continue;
            };
            if let Some(value) = bucket.front() {
                return Some((value, level));
            }
        }
        None
    }

    fn add_level(&self, level: Level) -> bool {
        let mut created = false;
        self.buckets.entry(level).or_insert_with(|| {
            created = true;
            Bucket::new()
        });
        created
    }

    fn delete_level(&self, level: Level) -> bool {
        self.buckets.remove(&level).is_some()
    }

    fn total_len(&self) -> usize {
        self.buckets.iter().map(|entry| entry.value().len()).sum()
    }

    fn len_of(&self, level: Level) -> QueueResult<usize> {
        let bucket = self.buckets.get(&level).ok_or(QueueError::LevelNotFound(level))?;
        Ok(bucket.len())
    }

    fn snapshot(&self, level: Level) -> QueueResult<Vec<T>>
    where
        T: Clone,
    {
        let bucket = self.buckets.get(&level).ok_or(QueueError::LevelNotFound(level))?;
        Ok(bucket.to_vec())
    }

    fn levels(&self) -> Vec<Level> {
        self.buckets.iter().map(|entry| *entry.key()).collect()
    }

    fn contains_level(&self, level: Level) -> bool {
        self.buckets.contains_key(&level)
    }

    fn min_level(&self) -> Option<Level> {
        lowest(self.buckets.iter().map(|entry| *entry.key()))
    }

    fn clear(&self) {
        self.buckets.clear();
    }

    fn sentinel(&self) -> &T {
        &self.sentinel
    }
}
