//! Repository scrape adapter.
//!
//! Every repository API call is independently failable; a failed call
//! logs a warning and leaves its snapshot field empty. Issues are only
//! requested when the repository metadata says the tracker is enabled.

use super::persist_package;
use crate::repo::{CHANGELOG_CANDIDATES, RepoSnapshot, build_units};
use async_trait::async_trait;
use skillforge_build::{BuildRequest, PackageBuilder};
use skillforge_core::traits::{IssueState, RepoClient, RepoClientFactory};
use skillforge_core::{
    Error, JobConfig, JobOutcome, ProgressSink, Result, SourceAdapter, SourceConfig, SourceKind,
};
use skillforge_store::PackageStore;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::warn;

/// Scrapes a hosted repository and packages its documentation surface.
pub struct RepoAdapter {
    clients: Arc<dyn RepoClientFactory>,
    builder: Arc<PackageBuilder>,
    packages: PackageStore,
}

impl std::fmt::Debug for RepoAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepoAdapter").finish_non_exhaustive()
    }
}

impl RepoAdapter {
    /// Creates the adapter over a repository client factory and package
    /// pipeline.
    #[must_use]
    pub fn new(
        clients: Arc<dyn RepoClientFactory>,
        builder: Arc<PackageBuilder>,
        packages: PackageStore,
    ) -> Self {
        Self {
            clients,
            builder,
            packages,
        }
    }
}

#[async_trait]
impl SourceAdapter for RepoAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Repository
    }

    async fn run(&self, config: &JobConfig, progress: &dyn ProgressSink) -> Result<JobOutcome> {
        config.validate()?;
        let SourceConfig::Repository(repo_config) = &config.source else {
            return Err(Error::ConfigError {
                message: "repository adapter received a non-repository source".to_string(),
            });
        };
        let (owner, repo) = repo_config.split()?;

        progress.report(5, "connecting to repository").await;
        let client = self.clients.open(repo_config.token.as_ref())?;

        let metadata = match client.metadata(owner, repo).await {
            Ok(meta) => Some(meta),
            Err(error) => {
                warn!(%error, "metadata fetch failed");
                None
            }
        };

        progress.report(20, "fetching repository content").await;
        let languages = match client.languages(owner, repo).await {
            Ok(languages) => languages,
            Err(error) => {
                warn!(%error, "language listing failed");
                HashMap::new()
            }
        };
        let readme = match client.readme(owner, repo).await {
            Ok(readme) => readme,
            Err(error) => {
                warn!(%error, "readme fetch failed");
                None
            }
        };
        let tree = match client.file_tree(owner, repo).await {
            Ok(tree) => tree,
            Err(error) => {
                warn!(%error, "file tree fetch failed");
                Vec::new()
            }
        };

        progress.report(50, "fetching issues and releases").await;
        let has_issues = metadata.as_ref().is_some_and(|meta| meta.has_issues);
        let (open_issues, closed_issues) = if has_issues {
            (
                fetch_issues(client.as_ref(), owner, repo, IssueState::Open).await,
                fetch_issues(client.as_ref(), owner, repo, IssueState::Closed).await,
            )
        } else {
            (None, None)
        };
        let releases = match client.releases(owner, repo).await {
            Ok(releases) => releases,
            Err(error) => {
                warn!(%error, "release listing failed");
                Vec::new()
            }
        };
        let changelog = fetch_changelog(client.as_ref(), owner, repo).await;

        progress.report(80, "extracting documentation units").await;
        let snapshot = RepoSnapshot {
            metadata,
            languages,
            readme,
            tree,
            open_issues,
            closed_issues,
            releases,
            changelog,
        };
        let units = build_units(config.name.as_str(), &snapshot);
        if units.is_empty() {
            return Err(Error::ExtractionFailed {
                subject: repo_config.repository.clone(),
                message: "repository yielded no documentation units".to_string(),
                source: None,
            });
        }

        progress.report(95, "building skill package").await;
        let request = BuildRequest {
            name: config.name.clone(),
            description: config.description.clone(),
            units,
            kind: SourceKind::Repository,
            source_url: snapshot.metadata.as_ref().map(|meta| meta.html_url.clone()),
        };
        let outcome = persist_package(&self.builder, &self.packages, &request).await?;
        progress.report(100, "completed").await;
        Ok(outcome)
    }
}

async fn fetch_issues(
    client: &dyn RepoClient,
    owner: &str,
    repo: &str,
    state: IssueState,
) -> Option<Vec<skillforge_core::traits::RepoIssue>> {
    match client.issues(owner, repo, state).await {
        Ok(issues) => Some(issues),
        Err(error) => {
            warn!(%error, ?state, "issue listing failed");
            None
        }
    }
}

/// Tries the changelog candidates in priority order; the first hit wins.
async fn fetch_changelog(client: &dyn RepoClient, owner: &str, repo: &str) -> Option<String> {
    for candidate in CHANGELOG_CANDIDATES {
        match client.file(owner, repo, candidate).await {
            Ok(Some(text)) => return Some(text),
            Ok(None) => {}
            Err(error) => warn!(path = candidate, %error, "changelog fetch failed"),
        }
    }
    None
}
