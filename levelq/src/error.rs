use std::sync::Arc;

use thiserror::Error;

use crate::Level;

/// Result type for queue operations
pub type QueueResult<T> = Result<T, QueueError>;

/// Errors reported by the store and the queue facade
#[derive(Error, Debug, Clone)]
pub enum QueueError {
    /// An absent value was passed where an element is required
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The operation requires an active priority level
    #[error("Priority level does not exist: {0}")]
    LevelNotFound(Level),

    /// Default-priority enqueue with an empty level set
    #[error("No active priority levels")]
    NoActiveLevels,

    /// Construction or configuration was rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An enqueue/dequeue observer returned an error
    #[error("Observer failed: {0}")]
    Observer(Arc<anyhow::Error>),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl QueueError {
    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Wrap a listener failure
    pub fn observer(err: anyhow::Error) -> Self {
        Self::Observer(Arc::new(err))
    }

    /// Check if the error is a missing-level lookup
    pub fn is_level_not_found(&self) -> bool {
        matches!(self, Self::LevelNotFound(_))
    }
}

#[cfg(feature = "json")]
impl From<serde_json::Error> for QueueError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
