//! HTTP byte fetcher for remote PDF documents.

use super::{FETCH_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use skillforge_core::{Error, RemoteFetcher, Result};

/// [`RemoteFetcher`] backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a shared HTTP client.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| Error::ConfigError {
                message: format!("failed to build http client: {e}"),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Error::FetchFailed {
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
        response
            .bytes()
            .await
            .map(|bytes| bytes.to_vec())
            .map_err(|e| Error::FetchFailed {
                url: url.to_string(),
                message: format!("failed to read body: {e}"),
                source: Some(Box::new(e)),
            })
    }
}
