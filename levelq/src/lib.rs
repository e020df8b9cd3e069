//! # levelq: Multi-Level Priority Queue
//!
//! **Concurrent priority buckets with runtime-resizable levels**
//!
//! levelq stores elements in one FIFO bucket per priority level and always
//! serves the highest non-empty level first. Levels can be added and removed
//! while producers and consumers are running, and every enqueue/dequeue is
//! written to an audit history and announced to observers.
//!
//! ## 🎯 Features
//!
//! - **Strict Priority Order**: level 5 drains completely before level 3 is considered
//! - **FIFO Within a Level**: append order is removal order, under any thread interleaving
//! - **Dynamic Levels**: add, delete or auto-provision levels at runtime without losing in-flight elements
//! - **Non-Blocking**: empty lookups return the configured sentinel immediately, never wait
//! - **Typed Empty Results**: [`Outcome`] keeps "found an element equal to the sentinel" apart from "found nothing"
//! - **Audit Trail**: append-only [`HistoryRecord`] log of every committed enqueue/dequeue
//! - **Structured Observability**: sync observers, a broadcast event stream and live counters
//!
//! ## 🚀 Quick Start
//!
//! ```rust
//! use levelq::prelude::*;
//!
//! # fn main() -> QueueResult<()> {
//! let queue: PriorityQueue<String> = PriorityQueue::new([1, 11, 111], "NONE".to_string())?;
//!
//! queue.on_dequeued(|event| {
//!     println!("took {} from level {}", event.value, event.priority);
//!     Ok(())
//! });
//!
//! queue.enqueue_at("a".to_string(), 1)?;
//! queue.enqueue_at("b".to_string(), 111)?;
//! queue.enqueue_at("c".to_string(), 11)?;
//!
//! assert_eq!(queue.dequeue()?.into_value(), "b");
//! assert_eq!(queue.dequeue()?.into_value(), "c");
//! assert_eq!(queue.dequeue()?.into_value(), "a");
//!
//! let empty = queue.dequeue()?;
//! assert!(empty.is_empty());
//! assert_eq!(empty.into_value(), "NONE");
//!
//! assert_eq!(queue.history_len(), 7);
//! # Ok(())
//! # }
//! ```

pub mod types;
pub mod error;
pub mod config;
pub mod backend;
pub mod history;
pub mod observers;
pub mod observability;
pub mod queue;

// Core API exports
pub use queue::PriorityQueue;
pub use types::{
    Level, EMPTY_LEVEL, Outcome, QueueAction, QueueEvent, HistoryRecord,
};
pub use error::{QueueError, QueueResult};
pub use config::QueueConfig;
pub use backend::{PriorityStore, MemoryStore};
pub use history::HistoryLog;
pub use observers::{ListenerId, Observer, ObserverHub};

// Observability exports
pub use observability::{BoxStream, MetricsSnapshot, ObservabilityLayer, QueueMetrics};

#[cfg(feature = "tracing-basic")]
pub use observability::{init_json_tracing, init_tracing};

/// Everything needed to build, feed and drain a queue
pub mod prelude {
    pub use crate::{
        PriorityQueue, QueueConfig, PriorityStore, MemoryStore,
    };

    pub use crate::{
        Level, Outcome, QueueAction, QueueEvent, HistoryRecord, QueueError, QueueResult,
    };

    pub use crate::{ListenerId, MetricsSnapshot};
}
