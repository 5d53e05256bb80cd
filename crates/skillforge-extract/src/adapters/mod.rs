//! Source adapters orchestrating one extraction pipeline per source kind.
//!
//! Each adapter validates its configuration before reporting any
//! progress, collects documentation units through its collaborators,
//! hands them to the package builder, and persists the result. Partial
//! sub-fetch failures degrade with a warning; an empty unit list is the
//! only extraction outcome treated as fatal.

mod pdf;
mod repo;
mod web;

pub use pdf::PdfAdapter;
pub use repo::RepoAdapter;
pub use web::WebAdapter;

use skillforge_build::{BuildRequest, PackageBuilder};
use skillforge_core::{JobOutcome, Result};
use skillforge_store::PackageStore;

/// Builds, persists, and summarizes one package.
pub(crate) async fn persist_package(
    builder: &PackageBuilder,
    packages: &PackageStore,
    request: &BuildRequest,
) -> Result<JobOutcome> {
    let package = builder.build(request)?;
    packages.save(&package).await?;
    Ok(JobOutcome {
        skill_id: package.id.clone(),
        skill_name: request.name.clone(),
        pages_scraped: request.units.len(),
        files_generated: package.files.len(),
        download_url: Some(format!("skill://{}", package.id)),
    })
}
