//! Subscriber setup for binaries and demos.
//!
//! The library itself only emits `tracing` events; installing a subscriber
//! is left to the application. These helpers cover the common case.

#[cfg(feature = "tracing-basic")]
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "levelq=info";

/// Install a human-readable subscriber filtered by `RUST_LOG`.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-basic")]
pub fn init_tracing() -> bool {
    fmt()
        .with_env_filter(env_filter())
        .with_thread_names(true)
        .try_init()
        .is_ok()
}

/// Install a JSON subscriber filtered by `RUST_LOG`.
#[cfg(feature = "tracing-basic")]
pub fn init_json_tracing() -> bool {
    fmt()
        .json()
        .with_env_filter(env_filter())
        .try_init()
        .is_ok()
}

#[cfg(feature = "tracing-basic")]
fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}
