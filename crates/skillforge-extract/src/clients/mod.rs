//! Network and decoding collaborators backing the source adapters.
//!
//! These are thin wrappers over `reqwest`, `scraper`, `pdf-extract`, and
//! `lopdf`; the extraction semantics live in the extractor modules, not
//! here.

mod crawler;
mod fetch;
mod github;
mod pdf;

pub use crawler::HttpCrawler;
pub use fetch::HttpFetcher;
pub use github::{GithubClient, GithubClientFactory};
pub use pdf::PdfTextDecoder;

pub(crate) const USER_AGENT: &str = concat!("skillforge/", env!("CARGO_PKG_VERSION"));

pub(crate) const FETCH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);
