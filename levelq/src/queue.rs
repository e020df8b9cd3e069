use tracing::{debug, info, instrument};

use crate::{
    QueueResult, QueueError, QueueConfig, Level, Outcome,
    QueueAction, QueueEvent, HistoryRecord, MetricsSnapshot,
    backend::{MemoryStore, PriorityStore},
    history::HistoryLog,
    observability::{BoxStream, ObservabilityLayer},
    observers::{ListenerId, ObserverHub},
};

/// Multi-level priority queue with observers and an audit history
///
/// Elements go into the bucket of a priority level and come out highest
/// level first, FIFO within a level. Every committed enqueue/dequeue is
/// written to the history log while its bucket is still locked, so the log
/// order is the commit order. It is then published to the event stream and
/// handed to the registered observers on the calling thread. An observer
/// error is returned to the caller after the store mutation has committed.
///
/// All methods take `&self`; share the queue between threads with an `Arc`.
pub struct PriorityQueue<T, S = MemoryStore<T>> {
    store: S,
    history: HistoryLog<T>,
    observers: ObserverHub<T>,
    observability: ObservabilityLayer<T>,
    config: QueueConfig,
}

impl<T> PriorityQueue<T, MemoryStore<T>>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a queue with the initial levels and the sentinel returned by empty lookups
    pub fn new<L, V>(levels: L, sentinel: V) -> QueueResult<Self>
    where
        L: IntoIterator<Item = Level>,
        V: Into<Option<T>>,
    {
        Self::with_config(levels, sentinel, QueueConfig::default())
    }

    /// Create a queue with custom configuration
    pub fn with_config<L, V>(levels: L, sentinel: V, config: QueueConfig) -> QueueResult<Self>
    where
        L: IntoIterator<Item = Level>,
        V: Into<Option<T>>,
    {
        config.validate()?;
        let sentinel = sentinel
            .into()
            .ok_or_else(|| QueueError::invalid_configuration("a sentinel value is required"))?;

        let store = match config.shard_amount {
            Some(shards) => MemoryStore::with_shard_amount(levels, sentinel, shards)?,
            None => MemoryStore::new(levels, sentinel)?,
        };

        Self::with_store(store, config)
    }
}

impl<T, S> PriorityQueue<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: PriorityStore<T>,
{
    /// Create a queue over an already-built store
    pub fn with_store(store: S, config: QueueConfig) -> QueueResult<Self> {
        config.validate()?;
        if store.min_level().is_none() {
            return Err(QueueError::invalid_configuration(
                "at least one priority level is required",
            ));
        }

        info!("Created priority queue with levels {:?}", store.levels());

        Ok(Self {
            store,
            history: HistoryLog::with_capacity(config.history_capacity),
            observers: ObserverHub::new(),
            observability: ObservabilityLayer::new(config.event_buffer),
            config,
        })
    }

    // ---------------------------------------------------------------------
    // Commands
    // ---------------------------------------------------------------------

    /// Enqueue at `level`, creating the level first if it does not exist
    pub fn enqueue_at<V: Into<Option<T>>>(&self, value: V, level: Level) -> QueueResult<()> {
        let value = require_value(value)?;

        let mut record = None;
        let created = self.store.provision_and_append_with(value, level, |value, level| {
            record = Some(self.log(QueueAction::Enqueue, value, level));
        });
        if created {
            self.observability.metrics().increment_levels_added();
            info!("Auto-provisioned priority level {}", level);
        }
        debug!("Enqueued element at level {}", level);

        self.publish(record, true)
    }

    /// Enqueue at the lowest active level, resolved at call time
    ///
    /// Returns the level used. Fails with [`QueueError::NoActiveLevels`]
    /// after [`PriorityQueue::clear`] until a level is added again.
    pub fn enqueue<V: Into<Option<T>>>(&self, value: V) -> QueueResult<Level> {
        let value = require_value(value)?;

        let mut record = None;
        let level = self.store.append_default_with(value, |value, level| {
            record = Some(self.log(QueueAction::Enqueue, value, level));
        })?;
        debug!("Enqueued element at default level {}", level);

        self.publish(record, true)?;
        Ok(level)
    }

    /// Dequeue the head of one level
    ///
    /// An empty bucket yields [`Outcome::Empty`] carrying the sentinel; that
    /// dequeue is recorded and observed like any other.
    pub fn dequeue_at(&self, level: Level) -> QueueResult<Outcome<T>> {
        let mut record = None;
        let popped = self.store.pop_level_with(level, |value, level| {
            record = Some(self.log(QueueAction::Dequeue, value, level));
        })?;

        let outcome = match popped {
            Some(value) => Outcome::found(value, level),
            None => Outcome::empty_at(self.store.sentinel().clone(), level),
        };
        debug!("Dequeued at level {} (found: {})", level, outcome.is_found());

        self.finish_dequeue(record, outcome)
    }

    /// Dequeue from the highest non-empty level
    ///
    /// When nothing is queued the sentinel is returned, recorded and
    /// observed at level `0`.
    pub fn dequeue(&self) -> QueueResult<Outcome<T>> {
        let mut record = None;
        let popped = self.store.pop_with(|value, level| {
            record = Some(self.log(QueueAction::Dequeue, value, level));
        });

        let outcome = match popped {
            Some((value, level)) => Outcome::found(value, level),
            None => Outcome::empty(self.store.sentinel().clone()),
        };
        debug!("Dequeued at level {} (found: {})", outcome.level(), outcome.is_found());

        self.finish_dequeue(record, outcome)
    }

    /// Ensure a level exists; returns `true` if it was created
    #[instrument(skip(self), level = "debug")]
    pub fn add_level(&self, level: Level) -> bool {
        let created = self.store.add_level(level);
        if created {
            self.observability.metrics().increment_levels_added();
            info!("Added priority level {}", level);
        }
        created
    }

    /// Ensure every level exists; returns how many were created
    pub fn add_levels(&self, levels: impl IntoIterator<Item = Level>) -> usize {
        levels
            .into_iter()
            .filter(|level| self.add_level(*level))
            .count()
    }

    /// Delete a level and every element queued in it
    #[instrument(skip(self), level = "debug")]
    pub fn delete_level(&self, level: Level) -> QueueResult<()> {
        if !self.store.delete_level(level) {
            return Err(QueueError::LevelNotFound(level));
        }
        self.observability.metrics().increment_levels_deleted();
        info!("Deleted priority level {}", level);
        Ok(())
    }

    /// Remove every level and element
    ///
    /// The queue has no levels afterwards: default-priority enqueues fail
    /// until a level is added or auto-provisioned.
    #[instrument(skip(self), level = "debug")]
    pub fn clear(&self) {
        self.store.clear();
        info!("Cleared all priority levels");
    }

    // ---------------------------------------------------------------------
    // Queries
    // ---------------------------------------------------------------------

    /// Head of one level without removing it
    pub fn peek_at(&self, level: Level) -> QueueResult<Outcome<T>> {
        Ok(match self.store.peek_level(level)? {
            Some(value) => Outcome::found(value, level),
            None => Outcome::empty_at(self.store.sentinel().clone(), level),
        })
    }

    /// Head of the highest non-empty level without removing it
    pub fn peek(&self) -> Outcome<T> {
        match self.store.peek() {
            Some((value, level)) => Outcome::found(value, level),
            None => Outcome::empty(self.store.sentinel().clone()),
        }
    }

    /// Copy of one level's elements, head to tail
    pub fn full_bucket(&self, level: Level) -> QueueResult<Vec<T>> {
        self.store.snapshot(level)
    }

    /// Elements queued at `level`; `0` when the level does not exist
    pub fn len_of(&self, level: Level) -> usize {
        self.store.len_of(level).unwrap_or(0)
    }

    /// Elements queued across all levels (point-in-time)
    pub fn len(&self) -> usize {
        self.store.total_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Active levels, in no particular order
    pub fn levels(&self) -> Vec<Level> {
        self.store.levels()
    }

    pub fn contains_level(&self, level: Level) -> bool {
        self.store.contains_level(level)
    }

    pub fn sentinel(&self) -> &T {
        self.store.sentinel()
    }

    /// Copy of the history log in insertion order
    pub fn history(&self) -> Vec<HistoryRecord<T>> {
        self.history.snapshot()
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// History records with the given action
    pub fn history_count(&self, action: QueueAction) -> usize {
        self.history.count(action)
    }

    /// History log as a JSON array
    #[cfg(feature = "json")]
    pub fn history_json(&self) -> QueueResult<String>
    where
        T: serde::Serialize,
    {
        self.history.to_json()
    }

    // ---------------------------------------------------------------------
    // Observers and observability
    // ---------------------------------------------------------------------

    /// Call `observer` after every committed enqueue
    pub fn on_enqueued<F>(&self, observer: F) -> ListenerId
    where
        F: Fn(&QueueEvent<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observers.on(QueueAction::Enqueue, observer)
    }

    /// Call `observer` after every committed dequeue, sentinel dequeues included
    pub fn on_dequeued<F>(&self, observer: F) -> ListenerId
    where
        F: Fn(&QueueEvent<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observers.on(QueueAction::Dequeue, observer)
    }

    pub fn once_enqueued<F>(&self, observer: F) -> ListenerId
    where
        F: Fn(&QueueEvent<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observers.once(QueueAction::Enqueue, observer)
    }

    pub fn once_dequeued<F>(&self, observer: F) -> ListenerId
    where
        F: Fn(&QueueEvent<T>) -> anyhow::Result<()> + Send + Sync + 'static,
    {
        self.observers.once(QueueAction::Dequeue, observer)
    }

    /// Unregister an observer
    pub fn off(&self, id: ListenerId) -> bool {
        self.observers.off(id)
    }

    /// Unregister every observer, or only those for one action
    pub fn remove_observers(&self, action: Option<QueueAction>) -> usize {
        self.observers.remove_all(action)
    }

    pub fn observer_count(&self, action: QueueAction) -> usize {
        self.observers.count(action)
    }

    /// Live stream of history records committed after this call
    pub fn event_stream(&self) -> BoxStream<HistoryRecord<T>> {
        self.observability.event_stream()
    }

    /// Open event streams
    pub fn stream_subscribers(&self) -> usize {
        self.observability.subscriber_count()
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.observability.metrics_snapshot()
    }

    pub fn config(&self) -> &QueueConfig {
        &self.config
    }

    /// Get store reference
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Append to the history log; called while the touched bucket is locked
    fn log(&self, action: QueueAction, value: &T, level: Level) -> HistoryRecord<T> {
        let record = HistoryRecord::new(action, value.clone(), level);
        self.history.push(record.clone());
        record
    }

    /// Empty dequeues mutate nothing, so their record is written here
    fn finish_dequeue(
        &self,
        record: Option<HistoryRecord<T>>,
        outcome: Outcome<T>,
    ) -> QueueResult<Outcome<T>> {
        let record = match record {
            Some(record) => record,
            None => self.log(QueueAction::Dequeue, outcome.value(), outcome.level()),
        };
        self.publish(Some(record), outcome.is_found())?;
        Ok(outcome)
    }

    /// Stream and counters, then observers
    fn publish(&self, record: Option<HistoryRecord<T>>, found: bool) -> QueueResult<()> {
        let Some(record) = record else {
            return Ok(());
        };
        let event = record.to_event();
        self.observability.record(record, found);

        self.observers.emit(&event).map_err(|err| {
            self.observability.metrics().increment_observer_failures();
            err
        })
    }
}

fn require_value<T, V: Into<Option<T>>>(value: V) -> QueueResult<T> {
    value
        .into()
        .ok_or_else(|| QueueError::invalid_argument("cannot enqueue an absent value"))
}
