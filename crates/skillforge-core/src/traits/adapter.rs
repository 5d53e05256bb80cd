//! Source adapter trait.

use super::ProgressSink;
use crate::{JobConfig, JobOutcome, Result, SourceKind};
use async_trait::async_trait;

/// Translates one source kind into a persisted skill package.
///
/// An adapter collects raw units from its source, runs them through the
/// extraction pipeline, assembles and persists the package, and returns a
/// summary outcome. Partial sub-fetch failures degrade with a warning;
/// only an unusable configuration or a total extraction failure is fatal
/// to the run.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    /// The source kind this adapter handles.
    fn kind(&self) -> SourceKind;

    /// Runs one job to completion.
    ///
    /// Progress is reported through `progress` at least at start and at
    /// completion.
    ///
    /// # Errors
    ///
    /// Returns a configuration error before any progress is reported when
    /// the config names no usable source, or an execution error when the
    /// pipeline fails irrecoverably.
    async fn run(&self, config: &JobConfig, progress: &dyn ProgressSink) -> Result<JobOutcome>;
}
