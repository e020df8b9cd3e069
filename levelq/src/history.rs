use parking_lot::RwLock;

use crate::{HistoryRecord, QueueAction};

/// Append-only audit trail of every enqueue and dequeue
///
/// Records are never mutated or removed. Readers get a consistent prefix;
/// a snapshot may miss an append that is in flight on another thread.
pub struct HistoryLog<T> {
    records: RwLock<Vec<HistoryRecord<T>>>,
}

impl<T> HistoryLog<T> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: RwLock::new(Vec::with_capacity(capacity)),
        }
    }

    /// Append a record
    pub fn push(&self, record: HistoryRecord<T>) {
        self.records.write().push(record);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Number of records with the given action
    pub fn count(&self, action: QueueAction) -> usize {
        self.records
            .read()
            .iter()
            .filter(|record| record.action == action)
            .count()
    }

    /// Copy of the log in insertion order
    pub fn snapshot(&self) -> Vec<HistoryRecord<T>>
    where
        T: Clone,
    {
        self.records.read().clone()
    }

    /// Render the log as a JSON array
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> crate::QueueResult<String>
    where
        T: serde::Serialize,
    {
        let records = self.records.read();
        Ok(serde_json::to_string(&*records)?)
    }
}

impl<T> Default for HistoryLog<T> {
    fn default() -> Self {
        Self::new()
    }
}
