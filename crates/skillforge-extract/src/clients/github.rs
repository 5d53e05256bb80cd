//! GitHub REST implementation of the repository collaborator.
//!
//! One client instance serves one job; the factory bakes the job's
//! optional token into the client's default headers so the secret never
//! travels through the call graph.

use super::{FETCH_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use skillforge_core::traits::{
    IssueState, RepoClient, RepoClientFactory, RepoIssue, RepoMetadata, RepoRelease, RepoTreeEntry,
};
use skillforge_core::{Error, Result};
use std::collections::HashMap;
use std::sync::Arc;

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const RAW_ACCEPT: &str = "application/vnd.github.raw+json";
const PAGE_LIMIT: usize = 30;

#[derive(Debug, Deserialize)]
struct RepoDto {
    name: String,
    description: Option<String>,
    stargazers_count: u64,
    forks_count: u64,
    language: Option<String>,
    has_issues: bool,
    html_url: String,
}

#[derive(Debug, Deserialize)]
struct TreeDto {
    tree: Vec<TreeEntryDto>,
}

#[derive(Debug, Deserialize)]
struct TreeEntryDto {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct IssueDto {
    number: u64,
    title: String,
    body: Option<String>,
    /// Present on pull requests, which the issues endpoint also returns.
    pull_request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ReleaseDto {
    tag_name: String,
    name: Option<String>,
    body: Option<String>,
    published_at: Option<DateTime<Utc>>,
}

/// [`RepoClient`] backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base: String,
}

impl GithubClient {
    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = get_checked(&self.client, url).await?;
        response.json().await.map_err(|e| Error::FetchFailed {
            url: url.to_string(),
            message: format!("failed to decode response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Fetches raw file-style content; 404 maps to `Ok(None)`.
    async fn get_raw(&self, url: &str) -> Result<Option<String>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, RAW_ACCEPT)
            .send()
            .await
            .map_err(|e| Error::FetchFailed {
                url: url.to_string(),
                message: format!("request failed: {e}"),
                source: Some(Box::new(e)),
            })?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::FetchFailed {
                url: url.to_string(),
                message: format!("unexpected status {}", response.status()),
                source: None,
            });
        }
        response
            .text()
            .await
            .map(Some)
            .map_err(|e| Error::FetchFailed {
                url: url.to_string(),
                message: format!("failed to read body: {e}"),
                source: Some(Box::new(e)),
            })
    }
}

/// Status-checked GET, shared by the JSON paths.
async fn get_checked(client: &reqwest::Client, url: &str) -> Result<reqwest::Response> {
    let response = client.get(url).send().await.map_err(|e| Error::FetchFailed {
        url: url.to_string(),
        message: format!("request failed: {e}"),
        source: Some(Box::new(e)),
    })?;
    if !response.status().is_success() {
        return Err(Error::FetchFailed {
            url: url.to_string(),
            message: format!("unexpected status {}", response.status()),
            source: None,
        });
    }
    Ok(response)
}

#[async_trait]
impl RepoClient for GithubClient {
    async fn metadata(&self, owner: &str, repo: &str) -> Result<RepoMetadata> {
        let dto: RepoDto = self
            .get_json(&self.endpoint(&format!("/repos/{owner}/{repo}")))
            .await?;
        Ok(RepoMetadata {
            name: dto.name,
            description: dto.description,
            stars: dto.stargazers_count,
            forks: dto.forks_count,
            language: dto.language,
            has_issues: dto.has_issues,
            html_url: dto.html_url,
        })
    }

    async fn languages(&self, owner: &str, repo: &str) -> Result<HashMap<String, u64>> {
        self.get_json(&self.endpoint(&format!("/repos/{owner}/{repo}/languages")))
            .await
    }

    async fn readme(&self, owner: &str, repo: &str) -> Result<Option<String>> {
        self.get_raw(&self.endpoint(&format!("/repos/{owner}/{repo}/readme")))
            .await
    }

    async fn file_tree(&self, owner: &str, repo: &str) -> Result<Vec<RepoTreeEntry>> {
        let dto: TreeDto = self
            .get_json(&self.endpoint(&format!(
                "/repos/{owner}/{repo}/git/trees/HEAD?recursive=1"
            )))
            .await?;
        Ok(tree_entries(dto))
    }

    async fn issues(&self, owner: &str, repo: &str, state: IssueState) -> Result<Vec<RepoIssue>> {
        let state = match state {
            IssueState::Open => "open",
            IssueState::Closed => "closed",
        };
        let dtos: Vec<IssueDto> = self
            .get_json(&self.endpoint(&format!(
                "/repos/{owner}/{repo}/issues?state={state}&per_page={PAGE_LIMIT}"
            )))
            .await?;
        Ok(issue_records(dtos))
    }

    async fn releases(&self, owner: &str, repo: &str) -> Result<Vec<RepoRelease>> {
        let dtos: Vec<ReleaseDto> = self
            .get_json(&self.endpoint(&format!(
                "/repos/{owner}/{repo}/releases?per_page={PAGE_LIMIT}"
            )))
            .await?;
        Ok(dtos
            .into_iter()
            .map(|dto| RepoRelease {
                tag: dto.tag_name,
                name: dto.name,
                body: dto.body,
                published_at: dto.published_at,
            })
            .collect())
    }

    async fn file(&self, owner: &str, repo: &str, path: &str) -> Result<Option<String>> {
        self.get_raw(&self.endpoint(&format!("/repos/{owner}/{repo}/contents/{path}")))
            .await
    }
}

fn tree_entries(dto: TreeDto) -> Vec<RepoTreeEntry> {
    dto.tree
        .into_iter()
        .map(|entry| RepoTreeEntry {
            is_dir: entry.kind == "tree",
            path: entry.path,
        })
        .collect()
}

/// Drops pull requests, which GitHub interleaves into issue listings.
fn issue_records(dtos: Vec<IssueDto>) -> Vec<RepoIssue> {
    dtos.into_iter()
        .filter(|dto| dto.pull_request.is_none())
        .map(|dto| RepoIssue {
            number: dto.number,
            title: dto.title,
            body: dto.body,
        })
        .collect()
}

/// Builds [`GithubClient`] instances, one per job.
#[derive(Debug, Clone, Copy, Default)]
pub struct GithubClientFactory;

impl GithubClientFactory {
    /// Creates the factory.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl RepoClientFactory for GithubClientFactory {
    fn open(&self, token: Option<&SecretString>) -> Result<Arc<dyn RepoClient>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(API_VERSION),
        );
        if let Some(token) = token {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|e| Error::ConfigError {
                    message: format!("invalid repository token: {e}"),
                })?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::ConfigError {
                message: format!("failed to build http client: {e}"),
            })?;
        Ok(Arc::new(GithubClient {
            client,
            base: API_BASE.to_string(),
        }))
    }
}
