//! Repository API collaborator trait.
//!
//! Mirrors the subset of a hosted-repository REST API the repository
//! adapter consumes. Every operation is independently failable; the
//! adapter degrades on individual failures instead of aborting.

use crate::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::SecretString;
use std::collections::HashMap;
use std::sync::Arc;

/// Top-level repository metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoMetadata {
    /// Repository name.
    pub name: String,
    /// Repository description, when set.
    pub description: Option<String>,
    /// Star count.
    pub stars: u64,
    /// Fork count.
    pub forks: u64,
    /// Primary language, when detected.
    pub language: Option<String>,
    /// Whether the issue tracker is enabled.
    pub has_issues: bool,
    /// Web locator of the repository.
    pub html_url: String,
}

/// One entry of the repository file tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoTreeEntry {
    /// Slash-separated path relative to the repository root.
    pub path: String,
    /// Whether the entry is a directory.
    pub is_dir: bool,
}

/// Issue filter state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IssueState {
    /// Currently open issues.
    Open,
    /// Closed issues, most recent first.
    Closed,
}

/// One issue record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoIssue {
    /// Issue number.
    pub number: u64,
    /// Issue title.
    pub title: String,
    /// Issue body text, when present.
    pub body: Option<String>,
}

/// One release record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRelease {
    /// Release tag, e.g. `v1.2.0`.
    pub tag: String,
    /// Release display name, when set.
    pub name: Option<String>,
    /// Release notes body, when present.
    pub body: Option<String>,
    /// Publication timestamp, when known.
    pub published_at: Option<DateTime<Utc>>,
}

/// Read-only access to one hosted repository.
#[async_trait]
pub trait RepoClient: Send + Sync {
    /// Fetches top-level repository metadata.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the repository cannot be read.
    async fn metadata(&self, owner: &str, repo: &str) -> Result<RepoMetadata>;

    /// Fetches per-language byte counts.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the language listing fails.
    async fn languages(&self, owner: &str, repo: &str) -> Result<HashMap<String, u64>>;

    /// Fetches the decoded README text, if the repository has one.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the README request fails.
    async fn readme(&self, owner: &str, repo: &str) -> Result<Option<String>>;

    /// Fetches the recursive file tree.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the tree request fails.
    async fn file_tree(&self, owner: &str, repo: &str) -> Result<Vec<RepoTreeEntry>>;

    /// Lists issues in the given state.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the issue listing fails.
    async fn issues(&self, owner: &str, repo: &str, state: IssueState) -> Result<Vec<RepoIssue>>;

    /// Lists published releases, most recent first.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the release listing fails.
    async fn releases(&self, owner: &str, repo: &str) -> Result<Vec<RepoRelease>>;

    /// Fetches the decoded content of one file by path.
    ///
    /// Returns `Ok(None)` if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the file request fails for any other reason.
    async fn file(&self, owner: &str, repo: &str, path: &str) -> Result<Option<String>>;
}

/// Builds a [`RepoClient`] for one job, carrying its optional API token.
pub trait RepoClientFactory: Send + Sync {
    /// Opens a client, authenticated when a token is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be constructed.
    fn open(&self, token: Option<&SecretString>) -> Result<Arc<dyn RepoClient>>;
}
