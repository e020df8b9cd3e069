//! # Queue configuration
//!
//! `QueueConfig` holds the tunables that are not part of a queue's identity
//! (levels and sentinel are constructor arguments). Values can be set with
//! the builder methods or layered from the environment:
//!
//! ```bash
//! export LEVELQ__EVENT_BUFFER=4096
//! export LEVELQ__SHARD_AMOUNT=16
//! export LEVELQ__HISTORY_CAPACITY=100000
//! ```
//!
//! ```rust
//! use levelq::QueueConfig;
//!
//! let config = QueueConfig::from_env("LEVELQ__").unwrap();
//! assert!(config.validate().is_ok());
//! ```

use crate::{QueueError, QueueResult};

/// Configuration for a priority queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueConfig {
    /// Capacity of the broadcast event stream; slow subscribers lag past this
    pub event_buffer: usize,
    /// Shard count for the level map (power of two > 1); `None` lets the map decide
    pub shard_amount: Option<usize>,
    /// Records to reserve up front in the history log
    pub history_capacity: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            event_buffer: 1024,
            shard_amount: None,
            history_capacity: 0,
        }
    }
}

impl QueueConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_event_buffer(mut self, event_buffer: usize) -> Self {
        self.event_buffer = event_buffer;
        self
    }

    pub fn with_shard_amount(mut self, shard_amount: usize) -> Self {
        self.shard_amount = Some(shard_amount);
        self
    }

    pub fn with_history_capacity(mut self, history_capacity: usize) -> Self {
        self.history_capacity = history_capacity;
        self
    }

    /// Reject values the queue cannot run with
    pub fn validate(&self) -> QueueResult<()> {
        if self.event_buffer == 0 {
            return Err(QueueError::invalid_configuration("event_buffer must be greater than 0"));
        }
        if let Some(shards) = self.shard_amount {
            if shards < 2 || !shards.is_power_of_two() {
                return Err(QueueError::invalid_configuration(format!(
                    "shard_amount must be a power of two greater than 1, got {}",
                    shards
                )));
            }
        }
        Ok(())
    }

    /// Defaults overridden by `{prefix}EVENT_BUFFER`, `{prefix}SHARD_AMOUNT`
    /// and `{prefix}HISTORY_CAPACITY` from the process environment
    pub fn from_env(prefix: &str) -> QueueResult<Self> {
        Self::from_vars(prefix, std::env::vars())
    }

    /// Same as [`QueueConfig::from_env`] over an explicit key/value source
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> QueueResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::default();

        for (key, value) in vars {
            let Some(name) = key.as_ref().strip_prefix(prefix) else {
                continue;
            };
            let value = value.as_ref().trim();

            match name.to_lowercase().as_str() {
                "event_buffer" => config.event_buffer = parse_usize(name, value)?,
                "shard_amount" => config.shard_amount = Some(parse_usize(name, value)?),
                "history_capacity" => config.history_capacity = parse_usize(name, value)?,
                _ => {}
            }
        }

        config.validate()?;
        Ok(config)
    }
}

fn parse_usize(key: &str, value: &str) -> QueueResult<usize> {
    value.parse::<usize>().map_err(|_| {
        QueueError::invalid_configuration(format!("{} expects an unsigned integer, got '{}'", key, value))
    })
}
