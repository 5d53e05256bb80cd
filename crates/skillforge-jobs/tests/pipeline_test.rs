//! Full pipeline: submit a crawl job, wait for it, inspect the package.

use async_trait::async_trait;
use skillforge_build::PackageBuilder;
use skillforge_core::{
    CrawledPage, JobConfig, JobId, PageSource, PageSourceFactory, Result, SkillName, SourceConfig,
    WebSourceConfig, get_json,
};
use skillforge_extract::WebAdapter;
use skillforge_jobs::{Job, JobManager, JobStatus};
use skillforge_store::{MemoryStore, PackageStore, ZipArchiver};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

struct ScriptedPages {
    pages: VecDeque<CrawledPage>,
}

#[async_trait]
impl PageSource for ScriptedPages {
    async fn next_page(&mut self) -> Result<Option<CrawledPage>> {
        Ok(self.pages.pop_front())
    }
}

struct ScriptedFactory {
    pages: Vec<CrawledPage>,
}

#[async_trait]
impl PageSourceFactory for ScriptedFactory {
    async fn open(&self, _config: &WebSourceConfig) -> Result<Box<dyn PageSource>> {
        Ok(Box::new(ScriptedPages {
            pages: self.pages.clone().into(),
        }))
    }
}

fn page(url: &str, title: &str, body: &str) -> CrawledPage {
    CrawledPage {
        url: url.to_string(),
        html: format!(
            "<html><head><title>{title}</title></head><body>\
             <article><h1>{title}</h1><p>{body}</p>\
             <pre><code class=\"language-python\">import antigravity\n\
             def main():\n    antigravity.fly()\n</code></pre>\
             </article></body></html>"
        ),
    }
}

async fn wait_terminal(manager: &JobManager, id: &JobId) -> Job {
    for _ in 0..500 {
        if let Some(job) = manager.job(id).await
            && job.status.is_terminal()
        {
            return job;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("job {id} did not reach a terminal state");
}

#[tokio::test]
async fn test_crawl_job_produces_a_retrievable_package() {
    let blobs = Arc::new(MemoryStore::new());
    let packages = PackageStore::new(blobs.clone(), Arc::new(ZipArchiver));

    let factory = ScriptedFactory {
        pages: vec![
            page(
                "https://docs.example.com/getting-started",
                "Getting Started",
                "Install the toolkit and run the sample project before anything else.",
            ),
            page(
                "https://docs.example.com/api/client",
                "Client API",
                "The client object exposes every operation. Parameters: a config map.",
            ),
        ],
    };
    let adapter = WebAdapter::new(
        Arc::new(factory),
        Arc::new(PackageBuilder::new().unwrap()),
        packages.clone(),
    );

    let manager = JobManager::builder(blobs.clone())
        .adapter(Arc::new(adapter))
        .poll_interval(Duration::from_millis(10))
        .build();

    let id = manager
        .submit(JobConfig {
            name: SkillName::new("example-docs").unwrap(),
            description: "Example documentation".to_string(),
            source: SourceConfig::Web(WebSourceConfig {
                start_urls: vec!["https://docs.example.com".to_string()],
                ..WebSourceConfig::default()
            }),
        })
        .await
        .unwrap();

    let job = wait_terminal(&manager, &id).await;
    assert_eq!(job.status, JobStatus::Completed);

    let outcome = job.result.expect("completed job carries an outcome");
    assert_eq!(outcome.pages_scraped, 2);
    assert_eq!(
        outcome.download_url.as_deref(),
        Some(format!("skill://{}", outcome.skill_id).as_str())
    );

    // The package is listed and its archive loads with a valid checksum.
    let listed = packages.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, outcome.skill_id);
    assert!(listed[0].files.iter().any(|f| f.path == "SKILL.md"));
    assert!(listed[0].files.iter().any(|f| f.path == "reference.md"));

    let archive = packages.load_archive(&outcome.skill_id).await.unwrap();
    assert_eq!(&archive[..2], b"PK");

    // The job record shares the same store and reflects the final state.
    let persisted: Job = get_json(blobs.as_ref(), &id.store_key())
        .await
        .unwrap()
        .expect("persisted job record");
    assert_eq!(persisted.status, JobStatus::Completed);
    assert_eq!(persisted.progress, 100);
}
