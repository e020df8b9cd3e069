pub mod metrics;
pub mod tracing;
pub mod analytics;

pub use metrics::{MetricsSnapshot, QueueMetrics};
pub use analytics::{BoxStream, ObservabilityLayer};

#[cfg(feature = "tracing-basic")]
pub use self::tracing::{init_json_tracing, init_tracing};
