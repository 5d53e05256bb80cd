//! Job configuration types.
//!
//! A [`JobConfig`] is the immutable input describing the source a job
//! scrapes. Configurations are validated at submission, before any job
//! work begins or any progress is reported.

use crate::{Error, Result, SkillName, SourceKind};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// CSS selector overrides for the web page extractor.
///
/// Empty/absent fields fall back to the extractor's built-in candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Selector for the main content region.
    pub main_content: Option<String>,
    /// Selector for the page title.
    pub title: Option<String>,
    /// Selector chain for code blocks.
    pub code_blocks: Option<String>,
    /// Selector for navigation regions to strip.
    pub navigation: Option<String>,
    /// Additional selectors removed before content resolution.
    pub exclude: Vec<String>,
}

/// One category bucket and the locator substrings that select it.
///
/// Buckets are tried in declaration order; the first whose any pattern is a
/// case-insensitive substring of the locator wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPattern {
    /// Category name assigned to matching units.
    pub name: String,
    /// Locator substrings, matched case-insensitively.
    pub patterns: Vec<String>,
}

fn default_max_pages() -> usize {
    50
}

fn default_max_concurrency() -> usize {
    4
}

/// Configuration for a website crawl job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebSourceConfig {
    /// Crawl entry points. At least one is required.
    pub start_urls: Vec<String>,
    /// Locator patterns a discovered link must match to be enqueued.
    ///
    /// Patterns are case-insensitive substrings; an empty list admits
    /// every discovered link.
    #[serde(default)]
    pub include_patterns: Vec<String>,
    /// Locator patterns that exclude a discovered link.
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Upper bound on crawled pages.
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
    /// Upper bound on concurrent page fetches inside the crawler.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// Selector overrides for the page extractor.
    #[serde(default)]
    pub selectors: SelectorConfig,
    /// Ordered category buckets for unit grouping.
    #[serde(default)]
    pub category_patterns: Vec<CategoryPattern>,
}

impl Default for WebSourceConfig {
    fn default() -> Self {
        Self {
            start_urls: Vec::new(),
            include_patterns: Vec::new(),
            exclude_patterns: Vec::new(),
            max_pages: default_max_pages(),
            max_concurrency: default_max_concurrency(),
            selectors: SelectorConfig::default(),
            category_patterns: Vec::new(),
        }
    }
}

/// Configuration for a repository scrape job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoSourceConfig {
    /// Repository identifier in `owner/repo` form.
    pub repository: String,
    /// Optional API token, passed through to the repository collaborator.
    ///
    /// Never serialized; a job recovered from a persisted record runs
    /// unauthenticated.
    #[serde(skip)]
    pub token: Option<SecretString>,
}

impl RepoSourceConfig {
    /// Splits the identifier into `(owner, repo)`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the identifier is not in
    /// `owner/repo` form.
    pub fn split(&self) -> Result<(&str, &str)> {
        match self.repository.split_once('/') {
            Some((owner, repo))
                if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') =>
            {
                Ok((owner, repo))
            }
            _ => Err(Error::ConfigError {
                message: format!(
                    "malformed repository identifier '{}', expected owner/repo",
                    self.repository
                ),
            }),
        }
    }
}

/// Configuration for a PDF extraction job.
///
/// Either a download locator or inline bytes must be supplied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PdfSourceConfig {
    /// Locator from which the PDF bytes are fetched.
    #[serde(default)]
    pub url: Option<String>,
    /// Inline PDF bytes, taking precedence over `url` when present.
    #[serde(default)]
    pub data: Option<Vec<u8>>,
}

/// Source-specific configuration for one job.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SourceConfig {
    /// Crawl a documentation website.
    Web(WebSourceConfig),
    /// Scrape a GitHub repository.
    Repository(RepoSourceConfig),
    /// Extract a PDF document.
    Pdf(PdfSourceConfig),
}

/// The immutable input describing one job's source and output naming.
///
/// # Examples
///
/// ```
/// use skillforge_core::{JobConfig, SkillName, SourceConfig, WebSourceConfig};
///
/// # fn example() -> Result<(), skillforge_core::Error> {
/// let config = JobConfig {
///     name: SkillName::new("react-docs")?,
///     description: "React documentation".to_string(),
///     source: SourceConfig::Web(WebSourceConfig {
///         start_urls: vec!["https://react.dev".to_string()],
///         ..WebSourceConfig::default()
///     }),
/// };
/// config.validate()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    /// Name of the skill package to generate.
    pub name: SkillName,
    /// Description carried into the package descriptor.
    pub description: String,
    /// Source-specific settings.
    pub source: SourceConfig,
}

impl JobConfig {
    /// Returns the source kind this configuration targets.
    #[must_use]
    pub const fn kind(&self) -> SourceKind {
        match self.source {
            SourceConfig::Web(_) => SourceKind::Web,
            SourceConfig::Repository(_) => SourceKind::Repository,
            SourceConfig::Pdf(_) => SourceKind::Pdf,
        }
    }

    /// Checks that the configuration describes a usable source.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an empty start-locator list, a
    /// malformed repository identifier, or a PDF job with neither a
    /// locator nor inline bytes.
    pub fn validate(&self) -> Result<()> {
        match &self.source {
            SourceConfig::Web(web) => {
                if web.start_urls.is_empty() {
                    return Err(Error::ConfigError {
                        message: "zero start locators".to_string(),
                    });
                }
                Ok(())
            }
            SourceConfig::Repository(repo) => repo.split().map(|_| ()),
            SourceConfig::Pdf(pdf) => {
                if pdf.url.is_none() && pdf.data.is_none() {
                    return Err(Error::ConfigError {
                        message: "no usable source specified".to_string(),
                    });
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn web_config(start_urls: Vec<String>) -> JobConfig {
        JobConfig {
            name: SkillName::new("docs").unwrap(),
            description: "Docs".to_string(),
            source: SourceConfig::Web(WebSourceConfig {
                start_urls,
                ..WebSourceConfig::default()
            }),
        }
    }

    #[test]
    fn test_web_config_requires_start_urls() {
        let err = web_config(Vec::new()).validate().unwrap_err();
        assert!(err.is_config_error());

        let ok = web_config(vec!["https://example.com".to_string()]);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_repo_split_valid() {
        let config = RepoSourceConfig {
            repository: "owner/repo".to_string(),
            token: None,
        };
        assert_eq!(config.split().unwrap(), ("owner", "repo"));
    }

    #[test]
    fn test_repo_split_malformed() {
        for bad in ["norepo", "/repo", "owner/", "a/b/c"] {
            let config = RepoSourceConfig {
                repository: bad.to_string(),
                token: None,
            };
            assert!(config.split().is_err(), "expected rejection for {bad}");
        }
    }

    #[test]
    fn test_pdf_config_requires_source() {
        let config = JobConfig {
            name: SkillName::new("manual").unwrap(),
            description: String::new(),
            source: SourceConfig::Pdf(PdfSourceConfig::default()),
        };
        assert!(config.validate().is_err());

        let with_url = JobConfig {
            name: SkillName::new("manual").unwrap(),
            description: String::new(),
            source: SourceConfig::Pdf(PdfSourceConfig {
                url: Some("https://example.com/manual.pdf".to_string()),
                data: None,
            }),
        };
        assert!(with_url.validate().is_ok());
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(web_config(vec![String::new()]).kind(), SourceKind::Web);
    }

    #[test]
    fn test_token_not_serialized() {
        let config = RepoSourceConfig {
            repository: "owner/repo".to_string(),
            token: Some(SecretString::from("super-secret")),
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret"));

        let back: RepoSourceConfig = serde_json::from_str(&json).unwrap();
        assert!(back.token.is_none());
    }

    #[test]
    fn test_source_config_tagged_serde() {
        let config = web_config(vec!["https://example.com".to_string()]);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"kind\":\"web\""));
        let back: JobConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.kind(), SourceKind::Web);
    }

    #[test]
    fn test_web_defaults_applied() {
        let json = r#"{"start_urls":["https://example.com"]}"#;
        let web: WebSourceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(web.max_pages, 50);
        assert_eq!(web.max_concurrency, 4);
        assert!(web.category_patterns.is_empty());
    }
}
