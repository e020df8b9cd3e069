use std::pin::Pin;

use futures_core::Stream;
use tokio::sync::broadcast;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use tracing::trace;

use crate::{HistoryRecord, MetricsSnapshot, QueueAction};
use super::QueueMetrics;

/// Type alias for boxed streams (stable Rust compatible)
pub type BoxStream<T> = Pin<Box<dyn Stream<Item = T> + Send + 'static>>;

/// Event stream and counters for one queue
pub struct ObservabilityLayer<T> {
    event_broadcaster: broadcast::Sender<HistoryRecord<T>>,
    metrics: QueueMetrics,
}

impl<T: Clone + Send + 'static> ObservabilityLayer<T> {
    /// Create new observability layer with the given stream buffer
    pub fn new(event_buffer: usize) -> Self {
        let (event_broadcaster, _) = broadcast::channel(event_buffer.max(1));

        Self {
            event_broadcaster,
            metrics: QueueMetrics::new(),
        }
    }

    /// Publish a committed enqueue/dequeue
    pub fn record(&self, record: HistoryRecord<T>, found: bool) {
        match record.action {
            QueueAction::Enqueue => self.metrics.increment_enqueued(),
            QueueAction::Dequeue => self.metrics.increment_dequeued(found),
        }

        if self.event_broadcaster.receiver_count() > 0 {
            trace!("Publishing {} event at level {}", record.action, record.priority);
            // Receivers may drop between the check and the send
            let _ = self.event_broadcaster.send(record);
        }
    }

    /// Live stream of records committed after this call; lagged items are skipped
    pub fn event_stream(&self) -> BoxStream<HistoryRecord<T>> {
        let stream = BroadcastStream::new(self.event_broadcaster.subscribe())
            .filter_map(|result| result.ok());

        Box::pin(stream)
    }

    pub fn subscriber_count(&self) -> usize {
        self.event_broadcaster.receiver_count()
    }

    /// Get live metrics
    pub fn metrics(&self) -> &QueueMetrics {
        &self.metrics
    }

    pub fn metrics_snapshot(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
