//! Bounded-concurrency HTTP crawler.
//!
//! Implements the page-source collaborator: breadth-first crawl from the
//! configured start locators, restricted to the start hosts, with
//! include/exclude substring filters and a hard page cap. Discovered
//! links are normalized by dropping query strings and fragments so the
//! visited set deduplicates plain page locators.

use super::{FETCH_TIMEOUT, USER_AGENT};
use async_trait::async_trait;
use scraper::{Html, Selector};
use skillforge_core::{
    CrawledPage, Error, PageSource, PageSourceFactory, Result, WebSourceConfig,
};
use std::collections::{HashSet, VecDeque};
use tokio::task::JoinSet;
use tracing::{debug, warn};
use url::Url;

/// Crawling implementation of [`PageSourceFactory`] over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpCrawler {
    client: reqwest::Client,
}

impl HttpCrawler {
    /// Creates a crawler with a shared HTTP client.
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
impl PageSourceFactory for HttpCrawler {
    async fn open(&self, config: &WebSourceConfig) -> Result<Box<dyn PageSource>> {
        let mut frontier = VecDeque::new();
        let mut visited = HashSet::new();
        let mut hosts = HashSet::new();

        for raw in &config.start_urls {
            match Url::parse(raw) {
                Ok(mut url) => {
                    url.set_fragment(None);
                    if let Some(host) = url.host_str() {
                        hosts.insert(host.to_string());
                    }
                    if visited.insert(url.to_string()) {
                        frontier.push_back(url);
                    }
                }
                Err(error) => {
                    warn!(url = raw, %error, "skipping unparseable start locator");
                }
            }
        }
        if frontier.is_empty() {
            return Err(Error::ConfigError {
                message: "no parseable start locators".to_string(),
            });
        }

        Ok(Box::new(CrawlSource {
            client: self.client.clone(),
            include: lowercased(&config.include_patterns),
            exclude: lowercased(&config.exclude_patterns),
            max_pages: config.max_pages.max(1),
            batch_size: config.max_concurrency.max(1),
            hosts,
            frontier,
            visited,
            ready: VecDeque::new(),
            fetched: 0,
        }))
    }
}

/// One crawl in progress.
#[derive(Debug)]
struct CrawlSource {
    client: reqwest::Client,
    include: Vec<String>,
    exclude: Vec<String>,
    max_pages: usize,
    batch_size: usize,
    hosts: HashSet<String>,
    frontier: VecDeque<Url>,
    visited: HashSet<String>,
    ready: VecDeque<CrawledPage>,
    fetched: usize,
}

#[async_trait]
impl PageSource for CrawlSource {
    async fn next_page(&mut self) -> Result<Option<CrawledPage>> {
        loop {
            if let Some(page) = self.ready.pop_front() {
                return Ok(Some(page));
            }
            if self.fetched >= self.max_pages || self.frontier.is_empty() {
                return Ok(None);
            }
            for (url, html) in self.fetch_batch().await {
                self.enqueue_links(&url, &html);
                self.ready.push_back(CrawledPage {
                    url: url.to_string(),
                    html,
                });
                self.fetched += 1;
            }
        }
    }
}

impl CrawlSource {
    /// Fetches up to one batch of frontier locators concurrently.
    ///
    /// Results come back in frontier order so unit ids stay deterministic
    /// across runs. Individual fetch failures are logged and dropped.
    async fn fetch_batch(&mut self) -> Vec<(Url, String)> {
        let remaining = self.max_pages.saturating_sub(self.fetched);
        let take = self.batch_size.min(remaining);
        let mut batch: Vec<Url> = Vec::with_capacity(take);
        while batch.len() < take {
            let Some(url) = self.frontier.pop_front() else {
                break;
            };
            batch.push(url);
        }

        let mut tasks: JoinSet<(usize, Result<String>)> = JoinSet::new();
        for (index, url) in batch.iter().enumerate() {
            let client = self.client.clone();
            let url = url.clone();
            tasks.spawn(async move {
                let outcome = fetch_html(&client, url.as_str()).await;
                (index, outcome)
            });
        }

        let mut bodies: Vec<Option<String>> = vec![None; batch.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, Ok(html))) => {
                    debug!(url = %batch[index], "fetched page");
                    bodies[index] = Some(html);
                }
                Ok((index, Err(error))) => {
                    warn!(url = %batch[index], %error, "page fetch failed, skipping");
                }
                Err(error) => warn!(%error, "fetch task aborted"),
            }
        }

        batch
            .into_iter()
            .zip(bodies)
            .filter_map(|(url, html)| html.map(|html| (url, html)))
            .collect()
    }

    fn enqueue_links(&mut self, base: &Url, html: &str) {
        for link in extract_links(html, base) {
            let key = link.to_string();
            if self.visited.contains(&key) {
                continue;
            }
            let Some(host) = link.host_str() else {
                continue;
            };
            if !self.hosts.contains(host) {
                continue;
            }
            if !admits(&key, &self.include, &self.exclude) {
                continue;
            }
            self.visited.insert(key);
            self.frontier.push_back(link);
        }
    }
}

async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String> {
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
    response.text().await.map_err(|e| Error::FetchFailed {
        url: url.to_string(),
        message: format!("failed to read body: {e}"),
        source: Some(Box::new(e)),
    })
}

/// Collects normalized outbound links from one page.
fn extract_links(html: &str, base: &Url) -> Vec<Url> {
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    let document = Html::parse_document(html);
    document
        .select(&anchor)
        .filter_map(|el| el.value().attr("href"))
        .filter_map(|href| normalize_link(base, href))
        .collect()
}

/// Resolves a href against its page and strips query and fragment.
///
/// Non-http(s) schemes yield `None`.
fn normalize_link(base: &Url, href: &str) -> Option<Url> {
    let mut url = base.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }
    url.set_fragment(None);
    url.set_query(None);
    Some(url)
}

/// Applies the include/exclude substring filters to one locator.
///
/// Patterns must already be lowercased. Exclusion wins over inclusion;
/// an empty include list admits everything.
fn admits(url: &str, include: &[String], exclude: &[String]) -> bool {
    let lower = url.to_lowercase();
    if exclude.iter().any(|p| lower.contains(p.as_str())) {
        return false;
    }
    include.is_empty() || include.iter().any(|p| lower.contains(p.as_str()))
}

fn lowercased(patterns: &[String]) -> Vec<String> {
    patterns.iter().map(|p| p.to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://docs.example.com/guide/intro").unwrap()
    }

    #[test]
    fn test_normalize_link_strips_query_and_fragment() {
        let link = normalize_link(&base(), "/api/users?tab=all#section").unwrap();
        assert_eq!(link.as_str(), "https://docs.example.com/api/users");
    }

    #[test]
    fn test_normalize_link_resolves_relative() {
        let link = normalize_link(&base(), "setup").unwrap();
        assert_eq!(link.as_str(), "https://docs.example.com/guide/setup");
    }

    #[test]
    fn test_normalize_link_rejects_other_schemes() {
        assert!(normalize_link(&base(), "mailto:team@example.com").is_none());
        assert!(normalize_link(&base(), "javascript:void(0)").is_none());
    }

    #[test]
    fn test_extract_links_from_anchors() {
        let html = r#"<html><body>
            <a href="/one">One</a>
            <a href="https://docs.example.com/two#frag">Two</a>
            <a>No href</a>
        </body></html>"#;
        let links = extract_links(html, &base());
        let strings: Vec<&str> = links.iter().map(Url::as_str).collect();
        assert_eq!(
            strings,
            vec![
                "https://docs.example.com/one",
                "https://docs.example.com/two",
            ]
        );
    }

    #[test]
    fn test_admits_empty_include_admits_all() {
        assert!(admits("https://docs.example.com/any", &[], &[]));
    }

    #[test]
    fn test_admits_include_filter() {
        let include = vec!["/docs/".to_string()];
        assert!(admits("https://example.com/docs/intro", &include, &[]));
        assert!(!admits("https://example.com/blog/post", &include, &[]));
    }

    #[test]
    fn test_admits_exclude_wins() {
        let include = vec!["/docs/".to_string()];
        let exclude = vec!["/docs/archive".to_string()];
        assert!(!admits(
            "https://example.com/docs/archive/old",
            &include,
            &exclude
        ));
    }

    #[tokio::test]
    async fn test_open_rejects_unparseable_start_locators() {
        let crawler = HttpCrawler::new().unwrap();
        let config = WebSourceConfig {
            start_urls: vec!["not a url".to_string()],
            ..WebSourceConfig::default()
        };
        let Err(err) = crawler.open(&config).await else {
            panic!("expected open to reject unparseable start locators");
        };
        assert!(err.is_config_error());
    }

    #[tokio::test]
    async fn test_open_accepts_valid_start_locator() {
        let crawler = HttpCrawler::new().unwrap();
        let config = WebSourceConfig {
            start_urls: vec!["https://docs.example.com".to_string()],
            ..WebSourceConfig::default()
        };
        assert!(crawler.open(&config).await.is_ok());
    }
}
