use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Level, QueueAction, QueueEvent};

/// History record - written once per enqueue/dequeue, never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord<T> {
    /// What happened
    pub action: QueueAction,

    /// Element enqueued or dequeued (the sentinel for empty dequeues)
    pub value: T,

    /// Level the element went to or came from
    pub priority: Level,

    /// When the store mutation was recorded
    pub at: DateTime<Utc>,
}

impl<T> HistoryRecord<T> {
    /// Create a record stamped with the current time
    pub fn new(action: QueueAction, value: T, priority: Level) -> Self {
        Self {
            action,
            value,
            priority,
            at: Utc::now(),
        }
    }

    pub fn is_enqueue(&self) -> bool {
        self.action == QueueAction::Enqueue
    }

    pub fn is_dequeue(&self) -> bool {
        self.action == QueueAction::Dequeue
    }

    /// Observer payload for this record
    pub fn to_event(&self) -> QueueEvent<T>
    where
        T: Clone,
    {
        QueueEvent {
            action: self.action,
            value: self.value.clone(),
            priority: self.priority,
        }
    }
}
