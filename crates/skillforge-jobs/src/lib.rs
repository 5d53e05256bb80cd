//! Asynchronous job lifecycle for skill generation.
//!
//! This crate owns the job state machine and the scheduler that drives
//! source adapter executions:
//!
//! - **Job records**: [`Job`] and [`JobStatus`], moving strictly
//!   `queued → running → completed | failed`
//! - **Scheduling**: a FIFO dispatch queue with a polling
//!   bounded-concurrency admission loop and fire-and-forget execution
//! - **Persistence**: every job record is written through the blob store
//!   as it changes, so a restart can recover
//! - **Recovery**: interrupted jobs are forced back to the queue with a
//!   note and re-run at least once
//! - **Retention**: terminal jobs are swept after a fixed window
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
//! let manager = JobManager::builder(Arc::new(MemoryStore::new())).build();
//! manager.recover().await?;
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
//! println!("submitted {id}");
//! # Ok(())
//! # }
//! ```

mod job;
mod manager;

pub use job::{Job, JobStatus, REQUEUE_NOTE};
pub use manager::{JobManager, JobManagerBuilder, JobManagerSettings};
