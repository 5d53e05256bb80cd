//! Job progress reporting trait.

use async_trait::async_trait;

/// Receives progress updates from a running source adapter.
///
/// Adapters report at least once at start and once at completion; any
/// number of intermediate updates is allowed. Reporting is infallible from
/// the adapter's point of view; sinks log their own delivery failures.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Reports progress as a percent in `[0, 100]` plus a short message.
    ///
    /// Implementations clamp out-of-range values.
    async fn report(&self, percent: u8, message: &str);
}

/// A sink that discards every update, for tests and detached runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullProgress;

#[async_trait]
impl ProgressSink for NullProgress {
    async fn report(&self, _percent: u8, _message: &str) {}
}
