//! Bounded-concurrency job scheduling with persisted state.
//!
//! The [`JobManager`] owns the job table and the FIFO dispatch queue. All
//! mutation funnels through its operations; external callers only read
//! snapshots. A polling scheduler loop admits queued jobs while fewer than
//! the configured ceiling are running, dispatches each without awaiting
//! it, and is re-kicked whenever a dispatched execution finishes.
//!
//! Persistence failures are logged as warnings; the in-memory table stays
//! authoritative for the rest of the process lifetime.
//!
//! # Examples
//!
//! ```no_run
//! use skillforge_core::{JobConfig, SkillName, SourceConfig, WebSourceConfig};
//! use skillforge_jobs::JobManager;
//! use skillforge_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), skillforge_core::Error> {
//! let manager = JobManager::builder(Arc::new(MemoryStore::new()))
//!     .max_concurrent_jobs(2)
//!     .build();
//!
//! let id = manager
//!     .submit(JobConfig {
//!         name: SkillName::new("react-docs")?,
//!         description: "React documentation".to_string(),
//!         source: SourceConfig::Web(WebSourceConfig {
//!             start_urls: vec!["https://react.dev".to_string()],
//!             ..WebSourceConfig::default()
//!         }),
//!     })
//!     .await?;
//!
//! let snapshot = manager.job(&id).await;
//! assert!(snapshot.is_some());
//! # Ok(())
//! # }
//! ```

use crate::job::{Job, JobStatus};
use async_trait::async_trait;
use chrono::Utc;
use skillforge_core::{
    BlobStore, Error, JobConfig, JobId, JobOutcome, ProgressSink, Result, SourceAdapter,
    SourceKind, get_json, put_json,
};
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

/// Prefix under which job records persist in the blob store.
const JOB_KEY_PREFIX: &str = "job-";

/// Tunables for the job manager.
#[derive(Debug, Clone)]
pub struct JobManagerSettings {
    /// Maximum number of jobs in the running state at once.
    pub max_concurrent_jobs: usize,
    /// Admission re-check interval while the ceiling is reached.
    pub poll_interval: Duration,
    /// How long terminal jobs are retained before the sweep removes them.
    pub retention: chrono::Duration,
    /// Interval between retention sweeps.
    pub sweep_interval: Duration,
}

impl Default for JobManagerSettings {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 3,
            poll_interval: Duration::from_secs(1),
            retention: chrono::Duration::hours(24),
            sweep_interval: Duration::from_secs(3600),
        }
    }
}

struct Inner {
    jobs: RwLock<HashMap<JobId, Job>>,
    queue: Mutex<VecDeque<JobId>>,
    adapters: HashMap<SourceKind, Arc<dyn SourceAdapter>>,
    store: Arc<dyn BlobStore>,
    settings: JobManagerSettings,
    /// Re-entrancy guard: set while a scheduler loop instance is live.
    scheduling: AtomicBool,
}

/// Owns the job table, dispatch queue, and scheduler loop.
///
/// Cheaply cloneable; clones share the same state. Built through
/// [`JobManager::builder`] with the source adapters registered up front.
#[derive(Clone)]
pub struct JobManager {
    inner: Arc<Inner>,
}

impl fmt::Debug for JobManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobManager")
            .field("settings", &self.inner.settings)
            .finish_non_exhaustive()
    }
}

impl JobManager {
    /// Starts building a manager over the given blob store.
    #[must_use]
    pub fn builder(store: Arc<dyn BlobStore>) -> JobManagerBuilder {
        JobManagerBuilder {
            store,
            settings: JobManagerSettings::default(),
            adapters: HashMap::new(),
        }
    }

    /// Submits a new job and kicks the scheduler.
    ///
    /// The job record is persisted immediately in the queued state.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the config names no usable
    /// source; no job is created in that case.
    pub async fn submit(&self, config: JobConfig) -> Result<JobId> {
        config.validate()?;

        let job = Job::new(config);
        let id = job.id.clone();
        info!(job = %id, kind = %job.kind, skill = %job.config.name, "job submitted");

        self.persist(&job).await;
        self.inner.jobs.write().await.insert(id.clone(), job);
        self.inner.queue.lock().await.push_back(id.clone());
        self.kick();
        Ok(id)
    }

    /// Returns a snapshot of one job.
    pub async fn job(&self, id: &JobId) -> Option<Job> {
        self.inner.jobs.read().await.get(id).cloned()
    }

    /// Returns snapshots of every tracked job, oldest first.
    pub async fn jobs(&self) -> Vec<Job> {
        let mut jobs: Vec<Job> = self.inner.jobs.read().await.values().cloned().collect();
        jobs.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        jobs
    }

    /// Number of jobs currently in the running state.
    pub async fn running_count(&self) -> usize {
        self.inner
            .jobs
            .read()
            .await
            .values()
            .filter(|job| job.status == JobStatus::Running)
            .count()
    }

    /// Number of jobs waiting in the dispatch queue.
    pub async fn queued_count(&self) -> usize {
        self.inner.queue.lock().await.len()
    }

    /// Records a progress update for a non-terminal job.
    ///
    /// Percent values above 100 are clamped; the status never changes.
    /// Unknown ids and terminal jobs are ignored.
    pub async fn update_progress(&self, id: &JobId, percent: u8, message: &str) {
        let snapshot = {
            let mut jobs = self.inner.jobs.write().await;
            match jobs.get_mut(id) {
                Some(job) if !job.status.is_terminal() => {
                    job.update_progress(percent, message);
                    Some(job.clone())
                }
                _ => None,
            }
        };
        if let Some(job) = snapshot {
            self.persist(&job).await;
        }
    }

    /// Reloads persisted job records and re-queues interrupted jobs.
    ///
    /// Records found in the running or queued state are forced back to
    /// queued with a note and re-appended to the dispatch queue in
    /// submission order; terminal records are loaded as-is so they remain
    /// queryable until the retention sweep removes them. Returns the
    /// number of re-queued jobs.
    ///
    /// # Errors
    ///
    /// Returns an error if the store key scan fails. Individual unreadable
    /// records are skipped with a warning.
    pub async fn recover(&self) -> Result<usize> {
        let keys = self.inner.store.keys(JOB_KEY_PREFIX).await?;
        let mut loaded = Vec::new();
        for key in keys {
            match get_json::<Job>(self.inner.store.as_ref(), &key).await {
                Ok(Some(job)) => loaded.push(job),
                Ok(None) => {}
                Err(err) => warn!(key, error = %err, "skipping unreadable job record"),
            }
        }
        loaded.sort_by(|a, b| a.created_at.cmp(&b.created_at));

        let mut requeued = 0;
        for mut job in loaded {
            let resume = job.requeue_after_restart();
            if resume {
                warn!(job = %job.id, "re-queueing job interrupted by restart");
                self.persist(&job).await;
                requeued += 1;
            }
            let id = job.id.clone();
            self.inner.jobs.write().await.insert(id.clone(), job);
            if resume {
                self.inner.queue.lock().await.push_back(id);
            }
        }

        if requeued > 0 {
            info!(requeued, "restart recovery re-queued interrupted jobs");
            self.kick();
        }
        Ok(requeued)
    }

    /// Removes terminal jobs that have outlived the retention window.
    ///
    /// Returns the number of removed jobs.
    pub async fn sweep_expired(&self) -> usize {
        let now = Utc::now();
        let retention = self.inner.settings.retention;
        let expired: Vec<JobId> = {
            let jobs = self.inner.jobs.read().await;
            jobs.values()
                .filter(|job| job.expired(retention, now))
                .map(|job| job.id.clone())
                .collect()
        };

        for id in &expired {
            self.inner.jobs.write().await.remove(id);
            if let Err(err) = self.inner.store.delete(&id.store_key()).await {
                warn!(job = %id, error = %err, "failed to delete expired job record");
            }
        }
        if !expired.is_empty() {
            debug!(removed = expired.len(), "retention sweep removed terminal jobs");
        }
        expired.len()
    }

    /// Spawns the periodic retention sweep task.
    ///
    /// The task runs for the life of the process; the returned handle can
    /// abort it in tests.
    pub fn spawn_retention_sweeper(&self) -> tokio::task::JoinHandle<()> {
        let manager = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(manager.inner.settings.sweep_interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                manager.sweep_expired().await;
            }
        })
    }

    /// Starts a scheduler loop instance unless one is already live.
    fn kick(&self) {
        if self
            .inner
            .scheduling
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return;
        }
        let manager = self.clone();
        tokio::spawn(async move { manager.run_scheduler().await });
    }

    /// Drains the queue, admitting jobs up to the concurrency ceiling.
    async fn run_scheduler(&self) {
        loop {
            if self.running_count().await >= self.inner.settings.max_concurrent_jobs {
                tokio::time::sleep(self.inner.settings.poll_interval).await;
                continue;
            }

            let Some(id) = self.inner.queue.lock().await.pop_front() else {
                break;
            };

            let dispatched = {
                let mut jobs = self.inner.jobs.write().await;
                let started = match jobs.get_mut(&id) {
                    Some(job) => job.start().then(|| job.clone()),
                    None => None,
                };
                match started {
                    Some(job) => Some(job),
                    None => {
                        debug!(job = %id, "skipping dequeued job that is no longer queued");
                        None
                    }
                }
            };
            if let Some(job) = dispatched {
                self.persist(&job).await;
                self.dispatch(job);
            }
        }

        self.inner.scheduling.store(false, Ordering::Release);
        // A submit that raced the loop exit saw the guard still set; re-check
        // so its job is not stranded.
        if !self.inner.queue.lock().await.is_empty() {
            self.kick();
        }
    }

    /// Runs one job in its own task, without the scheduler awaiting it.
    fn dispatch(&self, job: Job) {
        let manager = self.clone();
        tokio::spawn(async move {
            let id = job.id.clone();
            info!(job = %id, kind = %job.kind, "job dispatched");

            let progress = ManagerProgress {
                manager: manager.clone(),
                id: id.clone(),
            };
            let outcome = match manager.inner.adapters.get(&job.kind) {
                Some(adapter) => adapter.run(&job.config, &progress).await,
                None => Err(Error::ConfigError {
                    message: format!("no adapter registered for source kind '{}'", job.kind),
                }),
            };
            manager.finish(&id, outcome).await;
            manager.kick();
        });
    }

    /// Applies a terminal transition and persists the final record.
    async fn finish(&self, id: &JobId, outcome: Result<JobOutcome>) {
        let snapshot = {
            let mut jobs = self.inner.jobs.write().await;
            let Some(job) = jobs.get_mut(id) else {
                warn!(job = %id, "finished job is no longer tracked");
                return;
            };
            let changed = match outcome {
                Ok(result) => {
                    info!(job = %id, skill = %result.skill_id, "job completed");
                    job.complete(result)
                }
                Err(err) => {
                    warn!(job = %id, error = %err, "job failed");
                    job.fail(err.to_string())
                }
            };
            changed.then(|| job.clone())
        };
        if let Some(job) = snapshot {
            self.persist(&job).await;
        }
    }

    /// Writes the job record to the store, warning on failure.
    async fn persist(&self, job: &Job) {
        if let Err(err) = put_json(self.inner.store.as_ref(), &job.id.store_key(), job).await {
            warn!(
                job = %job.id,
                error = %err,
                "failed to persist job record; in-memory state stays authoritative"
            );
        }
    }
}

/// Routes adapter progress reports into the owning manager.
struct ManagerProgress {
    manager: JobManager,
    id: JobId,
}

#[async_trait]
impl ProgressSink for ManagerProgress {
    async fn report(&self, percent: u8, message: &str) {
        self.manager.update_progress(&self.id, percent, message).await;
    }
}

/// Builder for [`JobManager`].
pub struct JobManagerBuilder {
    store: Arc<dyn BlobStore>,
    settings: JobManagerSettings,
    adapters: HashMap<SourceKind, Arc<dyn SourceAdapter>>,
}

impl fmt::Debug for JobManagerBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobManagerBuilder")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl JobManagerBuilder {
    /// Registers a source adapter under its own kind.
    ///
    /// Registering a second adapter for the same kind replaces the first.
    #[must_use]
    pub fn adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.adapters.insert(adapter.kind(), adapter);
        self
    }

    /// Sets the concurrency ceiling (minimum 1).
    #[must_use]
    pub fn max_concurrent_jobs(mut self, ceiling: usize) -> Self {
        self.settings.max_concurrent_jobs = ceiling.max(1);
        self
    }

    /// Sets the admission re-check interval.
    #[must_use]
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.settings.poll_interval = interval;
        self
    }

    /// Sets the terminal-job retention window.
    #[must_use]
    pub fn retention(mut self, window: chrono::Duration) -> Self {
        self.settings.retention = window;
        self
    }

    /// Replaces the whole settings block.
    #[must_use]
    pub fn settings(mut self, settings: JobManagerSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Finishes the build.
    #[must_use]
    pub fn build(self) -> JobManager {
        JobManager {
            inner: Arc::new(Inner {
                jobs: RwLock::new(HashMap::new()),
                queue: Mutex::new(VecDeque::new()),
                adapters: self.adapters,
                store: self.store,
                settings: self.settings,
                scheduling: AtomicBool::new(false),
            }),
        }
    }
}
