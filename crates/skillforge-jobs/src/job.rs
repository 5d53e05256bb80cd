//! Job records and their status lifecycle.
//!
//! A [`Job`] tracks one asynchronous source adapter execution from
//! submission to its terminal state. The only legal transitions are
//! `Queued → Running` and `Running → Completed | Failed`; terminal states
//! are never left. Transition methods are crate-private so all mutation
//! funnels through the job manager.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use skillforge_core::{JobConfig, JobId, JobOutcome, SourceKind};
use std::fmt;

/// Note attached to a job forced back to the queue after a restart.
pub const REQUEUE_NOTE: &str = "re-queued after restart";

/// Lifecycle state of one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Waiting in the dispatch queue.
    Queued,
    /// Dispatched to a source adapter.
    Running,
    /// Finished successfully; the result summary is attached.
    Completed,
    /// Finished with an error; the failure message is attached.
    Failed,
}

impl JobStatus {
    /// Returns `true` for the two terminal states.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    /// Returns the lowercase wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tracked execution of a source adapter.
///
/// Exclusively owned by the job manager; external callers only read
/// snapshots. The `config` is the immutable input, everything else is
/// bookkeeping updated as the job moves through its lifecycle.
///
/// # Examples
///
/// ```
/// use skillforge_core::{JobConfig, SkillName, SourceConfig, WebSourceConfig};
/// use skillforge_jobs::{Job, JobStatus};
///
/// # fn example() -> Result<(), skillforge_core::Error> {
/// let job = Job::new(JobConfig {
///     name: SkillName::new("react-docs")?,
///     description: "React documentation".to_string(),
///     source: SourceConfig::Web(WebSourceConfig {
///         start_urls: vec!["https://react.dev".to_string()],
///         ..WebSourceConfig::default()
///     }),
/// });
/// assert_eq!(job.status, JobStatus::Queued);
/// assert_eq!(job.progress, 0);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// Unique identifier, also the basis of the persistence key.
    pub id: JobId,
    /// Source kind, derived from the config at submission.
    pub kind: SourceKind,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Completion percent in `[0, 100]`.
    pub progress: u8,
    /// Latest human-readable progress message.
    pub message: String,
    /// Immutable input describing the source to scrape.
    pub config: JobConfig,
    /// Outcome summary, present once completed.
    pub result: Option<JobOutcome>,
    /// Failure description, present once failed.
    pub error: Option<String>,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// Time of the most recent mutation.
    pub updated_at: DateTime<Utc>,
    /// Time the job reached a terminal state.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Creates a freshly queued job for the given configuration.
    #[must_use]
    pub fn new(config: JobConfig) -> Self {
        let now = Utc::now();
        Self {
            id: JobId::generate(),
            kind: config.kind(),
            status: JobStatus::Queued,
            progress: 0,
            message: "queued".to_string(),
            config,
            result: None,
            error: None,
            created_at: now,
            updated_at: now,
            completed_at: None,
        }
    }

    /// Moves the job into the running state.
    ///
    /// Returns `false` without mutating when the job is not queued.
    pub(crate) fn start(&mut self) -> bool {
        if self.status != JobStatus::Queued {
            return false;
        }
        self.status = JobStatus::Running;
        self.message = "running".to_string();
        self.updated_at = Utc::now();
        true
    }

    /// Completes a running job with its outcome summary.
    ///
    /// Returns `false` without mutating when the job is not running.
    pub(crate) fn complete(&mut self, outcome: JobOutcome) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }
        let now = Utc::now();
        self.status = JobStatus::Completed;
        self.progress = 100;
        self.message = "completed".to_string();
        self.result = Some(outcome);
        self.updated_at = now;
        self.completed_at = Some(now);
        true
    }

    /// Fails a running job, capturing the error message verbatim.
    ///
    /// Returns `false` without mutating when the job is not running.
    pub(crate) fn fail(&mut self, error: impl Into<String>) -> bool {
        if self.status != JobStatus::Running {
            return false;
        }
        let error = error.into();
        let now = Utc::now();
        self.status = JobStatus::Failed;
        self.message = error.clone();
        self.error = Some(error);
        self.updated_at = now;
        self.completed_at = Some(now);
        true
    }

    /// Forces an interrupted job back to the queue after a restart.
    ///
    /// Returns `false` without mutating for terminal jobs.
    pub(crate) fn requeue_after_restart(&mut self) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.status = JobStatus::Queued;
        self.message = REQUEUE_NOTE.to_string();
        self.updated_at = Utc::now();
        true
    }

    /// Records a progress update without changing the status.
    ///
    /// Percent values above 100 are clamped.
    pub(crate) fn update_progress(&mut self, percent: u8, message: &str) {
        self.progress = percent.min(100);
        self.message = message.to_string();
        self.updated_at = Utc::now();
    }

    /// Whether this terminal job has outlived the retention window.
    pub(crate) fn expired(&self, retention: chrono::Duration, now: DateTime<Utc>) -> bool {
        self.status.is_terminal()
            && self
                .completed_at
                .is_some_and(|done| now.signed_duration_since(done) > retention)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use skillforge_core::{SkillName, SourceConfig, WebSourceConfig};

    fn config() -> JobConfig {
        JobConfig {
            name: SkillName::new("docs").unwrap(),
            description: "Docs".to_string(),
            source: SourceConfig::Web(WebSourceConfig {
                start_urls: vec!["https://example.com".to_string()],
                ..WebSourceConfig::default()
            }),
        }
    }

    fn outcome() -> JobOutcome {
        JobOutcome {
            skill_id: "docs-aaaa0001".to_string(),
            skill_name: SkillName::new("docs").unwrap(),
            pages_scraped: 3,
            files_generated: 4,
            download_url: None,
        }
    }

    #[test]
    fn test_new_job_is_queued() {
        let job = Job::new(config());
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.progress, 0);
        assert!(job.result.is_none());
        assert!(job.error.is_none());
        assert!(job.completed_at.is_none());
    }

    #[test]
    fn test_start_only_from_queued() {
        let mut job = Job::new(config());
        assert!(job.start());
        assert_eq!(job.status, JobStatus::Running);
        assert!(!job.start());
    }

    #[test]
    fn test_complete_attaches_result() {
        let mut job = Job::new(config());
        assert!(!job.complete(outcome()), "completing a queued job");

        job.start();
        assert!(job.complete(outcome()));
        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.progress, 100);
        assert!(job.completed_at.is_some());
        assert_eq!(job.result.as_ref().unwrap().pages_scraped, 3);
    }

    #[test]
    fn test_fail_captures_message_verbatim() {
        let mut job = Job::new(config());
        job.start();
        assert!(job.fail("Fetch failed for https://example.com: timed out"));
        assert_eq!(job.status, JobStatus::Failed);
        assert_eq!(
            job.error.as_deref(),
            Some("Fetch failed for https://example.com: timed out")
        );
        assert!(job.completed_at.is_some());
    }

    #[test]
    fn test_no_transition_leaves_terminal() {
        let mut job = Job::new(config());
        job.start();
        job.complete(outcome());

        assert!(!job.fail("late error"));
        assert!(!job.start());
        assert!(!job.requeue_after_restart());
        assert_eq!(job.status, JobStatus::Completed);
        assert!(job.error.is_none());
    }

    #[test]
    fn test_requeue_after_restart_notes_the_requeue() {
        let mut job = Job::new(config());
        job.start();

        assert!(job.requeue_after_restart());
        assert_eq!(job.status, JobStatus::Queued);
        assert_eq!(job.message, REQUEUE_NOTE);
    }

    #[test]
    fn test_update_progress_clamps_and_keeps_status() {
        let mut job = Job::new(config());
        job.start();

        job.update_progress(150, "crawling");
        assert_eq!(job.progress, 100);
        assert_eq!(job.message, "crawling");
        assert_eq!(job.status, JobStatus::Running);
    }

    #[test]
    fn test_expired_requires_terminal_and_age() {
        let retention = Duration::hours(24);
        let now = Utc::now();

        let mut job = Job::new(config());
        assert!(!job.expired(retention, now), "queued jobs never expire");

        job.start();
        job.complete(outcome());
        assert!(!job.expired(retention, now), "fresh terminal job");

        job.completed_at = Some(now - Duration::hours(25));
        assert!(job.expired(retention, now));
    }

    #[test]
    fn test_status_serde_lowercase() {
        let json = serde_json::to_string(&JobStatus::Running).unwrap();
        assert_eq!(json, "\"running\"");
        let back: JobStatus = serde_json::from_str("\"failed\"").unwrap();
        assert_eq!(back, JobStatus::Failed);
    }

    #[test]
    fn test_job_record_round_trips() {
        let mut job = Job::new(config());
        job.start();
        job.complete(outcome());

        let json = serde_json::to_string(&job).unwrap();
        let back: Job = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, job.id);
        assert_eq!(back.status, JobStatus::Completed);
        assert_eq!(back.result.unwrap().skill_id, "docs-aaaa0001");
    }
}
