//! Crawled page iteration traits.
//!
//! The crawling mechanics (fetching, link discovery, bounded fan-out) live
//! behind [`PageSource`]; the web adapter only consumes the resulting
//! sequence of pages.

use crate::{Result, WebSourceConfig};
use async_trait::async_trait;

/// One fetched and parsed page from a crawl.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawledPage {
    /// Final locator of the fetched page.
    pub url: String,
    /// Raw HTML document text.
    pub html: String,
}

/// A crawl in progress, yielding pages in discovery order.
///
/// The source owns its frontier: discovered links matching the configured
/// include/exclude patterns are enqueued internally, bounded by the
/// configured page and concurrency limits.
#[async_trait]
pub trait PageSource: Send {
    /// Yields the next crawled page, or `None` when the crawl is exhausted.
    ///
    /// # Errors
    ///
    /// Returns an error only for failures that abort the whole crawl;
    /// individual page fetch failures are skipped internally.
    async fn next_page(&mut self) -> Result<Option<CrawledPage>>;
}

/// Opens a [`PageSource`] for a given crawl configuration.
#[async_trait]
pub trait PageSourceFactory: Send + Sync {
    /// Starts a crawl over the configured start locators.
    ///
    /// # Errors
    ///
    /// Returns an error if the crawl cannot be started.
    async fn open(&self, config: &WebSourceConfig) -> Result<Box<dyn PageSource>>;
}
