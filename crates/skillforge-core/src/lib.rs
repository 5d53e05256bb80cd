//! Core types, traits, and error handling for skill package generation.
//!
//! This crate provides the foundational building blocks shared by the whole
//! workspace:
//!
//! - **Error handling**: [`Error`] and [`Result`] types used across all crates
//! - **Domain types**: [`SkillName`], [`JobId`], [`UnitType`], [`SourceKind`]
//! - **Documentation units**: [`DocUnit`], [`CodeBlock`], [`ApiReference`]
//! - **Packages**: [`SkillPackage`], [`PackageMeta`] and friends
//! - **Configuration**: the [`JobConfig`] family describing job inputs
//! - **Collaborator traits**: storage, crawling, repository, PDF, and
//!   progress interfaces in [`traits`]
//!
//! # Examples
//!
//! ```
//! use skillforge_core::{DocUnit, SkillName, UnitType};
//!
//! # fn example() -> Result<(), skillforge_core::Error> {
//! let name = SkillName::new("react-docs")?;
//! let unit = DocUnit::new(
//!     1,
//!     name.as_str(),
//!     "Getting Started",
//!     "Install the package and render your first component.",
//!     UnitType::Guide,
//!     "https://react.dev/learn",
//! );
//! assert_eq!(unit.unit_type, UnitType::Guide);
//! # Ok(())
//! # }
//! ```

mod config;
mod error;
mod package;
pub mod traits;
mod types;
mod unit;

pub use config::{
    CategoryPattern, JobConfig, PdfSourceConfig, RepoSourceConfig, SelectorConfig, SourceConfig,
    WebSourceConfig,
};
pub use error::{Error, Result};
pub use package::{FileMeta, PackageFile, PackageMeta, PackageSource, PackageStats, SkillPackage};
pub use traits::{
    Archiver, BlobStore, CrawledPage, IssueState, NullProgress, PageSource, PageSourceFactory,
    PdfDecoder, PdfDocument, ProgressSink, RemoteFetcher, RepoClient, RepoClientFactory, RepoIssue,
    RepoMetadata, RepoRelease, RepoTreeEntry, SourceAdapter, get_json, put_json,
};
pub use types::{JobId, JobOutcome, SkillName, SourceKind, UnitType};
pub use unit::{ApiReference, CodeBlock, DocUnit};
