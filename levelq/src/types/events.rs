use serde::{Deserialize, Serialize};

use super::Level;

/// Kind of queue mutation recorded in history and delivered to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueueAction {
    Enqueue,
    Dequeue,
}

impl QueueAction {
    /// Get event type name as string
    pub fn name(self) -> &'static str {
        match self {
            Self::Enqueue => "enqueue",
            Self::Dequeue => "dequeue",
        }
    }
}

impl std::fmt::Display for QueueAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for QueueAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enqueue" | "enqueued" => Ok(Self::Enqueue),
            "dequeue" | "dequeued" => Ok(Self::Dequeue),
            _ => Err(format!("Invalid queue action: {}", s)),
        }
    }
}

/// Immutable payload handed to enqueue/dequeue observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueEvent<T> {
    pub action: QueueAction,
    pub value: T,
    pub priority: Level,
}

impl<T> QueueEvent<T> {
    pub fn enqueued(value: T, priority: Level) -> Self {
        Self { action: QueueAction::Enqueue, value, priority }
    }

    pub fn dequeued(value: T, priority: Level) -> Self {
        Self { action: QueueAction::Dequeue, value, priority }
    }
}
