//! Content extraction from documentation sources.
//!
//! One source adapter per supported kind turns raw source material into
//! documentation units and hands them to the package pipeline:
//!
//! - [`WebAdapter`] crawls a documentation website through a
//!   [`skillforge_core::PageSourceFactory`] and extracts the main
//!   content of each page.
//! - [`RepoAdapter`] scrapes a hosted repository through a
//!   [`skillforge_core::traits::RepoClientFactory`] and renders its
//!   readme, overview, file tree, issues, releases, and changelog into
//!   sections.
//! - [`PdfAdapter`] decodes a PDF byte buffer through a
//!   [`skillforge_core::PdfDecoder`] and segments the text into
//!   heading-delimited sections.
//!
//! The production collaborators live in [`clients`]: an HTTP crawler,
//! a GitHub REST client, a remote byte fetcher, and a PDF decoder.
//! Adapters accept the collaborator traits so tests can script sources
//! without network access.

mod adapters;
mod clients;
pub mod code_blocks;
pub mod pdf;
pub mod repo;
pub mod web;

pub use adapters::{PdfAdapter, RepoAdapter, WebAdapter};
pub use clients::{GithubClient, GithubClientFactory, HttpCrawler, HttpFetcher, PdfTextDecoder};
