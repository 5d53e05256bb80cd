//! PDF document adapter.
//!
//! Inline bytes take precedence over a remote locator; the fetcher is
//! only consulted when no inline data was supplied.

use super::persist_package;
use crate::pdf::extract_units;
use async_trait::async_trait;
use skillforge_build::{BuildRequest, PackageBuilder};
use skillforge_core::{
    Error, JobConfig, JobOutcome, PdfDecoder, ProgressSink, RemoteFetcher, Result, SourceAdapter,
    SourceConfig, SourceKind,
};
use skillforge_store::PackageStore;
use std::sync::Arc;

/// Decodes a PDF document and packages its extracted sections.
pub struct PdfAdapter {
    fetcher: Arc<dyn RemoteFetcher>,
    decoder: Arc<dyn PdfDecoder>,
    builder: Arc<PackageBuilder>,
    packages: PackageStore,
}

impl std::fmt::Debug for PdfAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfAdapter").finish_non_exhaustive()
    }
}

impl PdfAdapter {
    /// Creates the adapter over a fetcher, decoder, and package pipeline.
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn RemoteFetcher>,
        decoder: Arc<dyn PdfDecoder>,
        builder: Arc<PackageBuilder>,
        packages: PackageStore,
    ) -> Self {
        Self {
            fetcher,
            decoder,
            builder,
            packages,
        }
    }
}

#[async_trait]
impl SourceAdapter for PdfAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Pdf
    }

    async fn run(&self, config: &JobConfig, progress: &dyn ProgressSink) -> Result<JobOutcome> {
        config.validate()?;
        let SourceConfig::Pdf(pdf_config) = &config.source else {
            return Err(Error::ConfigError {
                message: "pdf adapter received a non-pdf source".to_string(),
            });
        };

        progress.report(5, "fetching document").await;
        let data = match (&pdf_config.data, &pdf_config.url) {
            (Some(data), _) => data.clone(),
            (None, Some(url)) => self.fetcher.fetch(url).await?,
            (None, None) => {
                return Err(Error::ConfigError {
                    message: "no usable source specified".to_string(),
                });
            }
        };

        progress.report(30, "decoding document").await;
        let document = self.decoder.decode(&data)?;

        progress.report(60, "extracting sections").await;
        let (title, units) = extract_units(
            config.name.as_str(),
            &document.text,
            document.page_count,
            &document.metadata,
        );
        if units.is_empty() {
            return Err(Error::ExtractionFailed {
                subject: title,
                message: "document yielded no documentation units".to_string(),
                source: None,
            });
        }

        progress.report(95, "building skill package").await;
        let description = if config.description.is_empty() {
            title
        } else {
            config.description.clone()
        };
        let request = BuildRequest {
            name: config.name.clone(),
            description,
            units,
            kind: SourceKind::Pdf,
            source_url: pdf_config.url.clone(),
        };
        let outcome = persist_package(&self.builder, &self.packages, &request).await?;
        progress.report(100, "completed").await;
        Ok(outcome)
    }
}
