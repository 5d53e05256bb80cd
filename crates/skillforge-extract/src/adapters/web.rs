//! Website crawl adapter.

use super::persist_package;
use crate::web::extract_page;
use async_trait::async_trait;
use skillforge_build::{BuildRequest, PackageBuilder};
use skillforge_core::{
    Error, JobConfig, JobOutcome, PageSourceFactory, ProgressSink, Result, SourceAdapter,
    SourceConfig, SourceKind,
};
use skillforge_store::PackageStore;
use std::sync::Arc;
use tracing::debug;

/// Crawls a documentation website and packages the extracted pages.
pub struct WebAdapter {
    pages: Arc<dyn PageSourceFactory>,
    builder: Arc<PackageBuilder>,
    packages: PackageStore,
}

impl std::fmt::Debug for WebAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebAdapter").finish_non_exhaustive()
    }
}

impl WebAdapter {
    /// Creates the adapter over a page source and package pipeline.
    #[must_use]
    pub fn new(
        pages: Arc<dyn PageSourceFactory>,
        builder: Arc<PackageBuilder>,
        packages: PackageStore,
    ) -> Self {
        Self {
            pages,
            builder,
            packages,
        }
    }
}

#[async_trait]
impl SourceAdapter for WebAdapter {
    fn kind(&self) -> SourceKind {
        SourceKind::Web
    }

    async fn run(&self, config: &JobConfig, progress: &dyn ProgressSink) -> Result<JobOutcome> {
        config.validate()?;
        let SourceConfig::Web(web) = &config.source else {
            return Err(Error::ConfigError {
                message: "web adapter received a non-web source".to_string(),
            });
        };

        progress.report(5, "starting crawl").await;
        let mut source = self.pages.open(web).await?;

        let mut units = Vec::new();
        let mut fetched: usize = 0;
        let mut next_id: u64 = 1;
        while let Some(page) = source.next_page().await? {
            fetched += 1;
            if let Some(unit) = extract_page(
                next_id,
                config.name.as_str(),
                &page.url,
                &page.html,
                &web.selectors,
                &web.category_patterns,
            ) {
                next_id += 1;
                units.push(unit);
            } else {
                debug!(url = %page.url, "page rejected by quality gate");
            }
            let scaled = 10 + fetched * 80 / web.max_pages.max(1);
            let percent = u8::try_from(scaled.min(90)).unwrap_or(90);
            progress
                .report(percent, &format!("crawled {fetched} pages"))
                .await;
        }

        if units.is_empty() {
            return Err(Error::ExtractionFailed {
                subject: config.name.as_str().to_string(),
                message: "no documentation units were extracted".to_string(),
                source: None,
            });
        }

        progress.report(95, "building skill package").await;
        let request = BuildRequest {
            name: config.name.clone(),
            description: config.description.clone(),
            units,
            kind: SourceKind::Web,
            source_url: web.start_urls.first().cloned(),
        };
        let outcome = persist_package(&self.builder, &self.packages, &request).await?;
        progress.report(100, "completed").await;
        Ok(outcome)
    }
}
