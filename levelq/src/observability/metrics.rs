use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Live counters for queue operations
pub struct QueueMetrics {
    enqueued: AtomicU64,
    dequeued: AtomicU64,
    empty_dequeues: AtomicU64,
    levels_added: AtomicU64,
    levels_deleted: AtomicU64,
    observer_failures: AtomicU64,
}

impl QueueMetrics {
    pub fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            dequeued: AtomicU64::new(0),
            empty_dequeues: AtomicU64::new(0),
            levels_added: AtomicU64::new(0),
            levels_deleted: AtomicU64::new(0),
            observer_failures: AtomicU64::new(0),
        }
    }

    pub fn increment_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dequeue; `found` is false when the sentinel was handed out
    pub fn increment_dequeued(&self, found: bool) {
        if found {
            self.dequeued.fetch_add(1, Ordering::Relaxed);
        } else {
            self.empty_dequeues.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn increment_levels_added(&self) {
        self.levels_added.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_levels_deleted(&self) {
        self.levels_deleted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_observer_failures(&self) {
        self.observer_failures.fetch_add(1, Ordering::Relaxed);
    }

    // Getters for global metrics
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    pub fn dequeued(&self) -> u64 {
        self.dequeued.load(Ordering::Relaxed)
    }

    pub fn empty_dequeues(&self) -> u64 {
        self.empty_dequeues.load(Ordering::Relaxed)
    }

    pub fn levels_added(&self) -> u64 {
        self.levels_added.load(Ordering::Relaxed)
    }

    pub fn levels_deleted(&self) -> u64 {
        self.levels_deleted.load(Ordering::Relaxed)
    }

    pub fn observer_failures(&self) -> u64 {
        self.observer_failures.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            enqueued: self.enqueued(),
            dequeued: self.dequeued(),
            empty_dequeues: self.empty_dequeues(),
            levels_added: self.levels_added(),
            levels_deleted: self.levels_deleted(),
            observer_failures: self.observer_failures(),
        }
    }
}

impl Default for QueueMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable counter values
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub enqueued: u64,
    pub dequeued: u64,
    pub empty_dequeues: u64,
    pub levels_added: u64,
    pub levels_deleted: u64,
    pub observer_failures: u64,
}

impl MetricsSnapshot {
    /// Share of dequeue calls that found nothing, as a percentage
    pub fn empty_rate(&self) -> f64 {
        let total = self.dequeued + self.empty_dequeues;
        if total == 0 {
            0.0
        } else {
            (self.empty_dequeues as f64 / total as f64) * 100.0
        }
    }

    /// Elements enqueued but not yet handed out (ignores deleted levels)
    pub fn outstanding(&self) -> u64 {
        self.enqueued.saturating_sub(self.dequeued)
    }
}
