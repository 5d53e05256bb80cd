//! Skill package types.
//!
//! A [`SkillPackage`] is the final bundle of generated files for one
//! completed scrape. Packages are persisted as a compressed archive blob
//! plus a content-stripped [`PackageMeta`] record for cheap listing.

use crate::{SkillName, SourceKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One generated file inside a skill package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageFile {
    /// Package-relative path, e.g. `scripts/helper.py`.
    pub path: String,
    /// Full file content.
    pub content: String,
    /// Content length in bytes.
    pub size: usize,
}

impl PackageFile {
    /// Creates a file record, deriving `size` from the content.
    #[must_use]
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let size = content.len();
        Self {
            path: path.into(),
            content,
            size,
        }
    }
}

/// Where a package's content came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageSource {
    /// The source kind the generating job scraped.
    pub kind: SourceKind,
    /// Source locator, when one exists (crawl root, repository URL).
    pub url: Option<String>,
}

/// Summary statistics for one package.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageStats {
    /// Total documentation unit count.
    pub total_pages: usize,
    /// Number of distinct categories.
    pub categories: usize,
    /// Total code example count summed across units.
    pub code_examples: usize,
}

/// The final bundle of generated files representing one completed scrape.
///
/// Created once per successful job, immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPackage {
    /// Identifier derived from the name plus a random suffix.
    pub id: String,
    /// Validated skill name.
    pub name: SkillName,
    /// Human-readable description.
    pub description: String,
    /// Generated files in deterministic output order.
    pub files: Vec<PackageFile>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Source provenance.
    pub source: PackageSource,
    /// Summary statistics.
    pub stats: PackageStats,
}

impl SkillPackage {
    /// Derives a package id from a skill name plus an 8-hex random suffix.
    ///
    /// The suffix avoids collisions between repeated builds of the same
    /// skill name.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillforge_core::{SkillName, SkillPackage};
    ///
    /// # fn example() -> Result<(), skillforge_core::Error> {
    /// let name = SkillName::new("react-docs")?;
    /// let id = SkillPackage::generate_id(&name);
    /// assert!(id.starts_with("react-docs-"));
    /// assert_eq!(id.len(), "react-docs-".len() + 8);
    /// # Ok(())
    /// # }
    /// ```
    #[must_use]
    pub fn generate_id(name: &SkillName) -> String {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(8).collect();
        format!("{name}-{suffix}")
    }

    /// Returns the content-stripped metadata record for this package.
    #[must_use]
    pub fn meta(&self, checksum: impl Into<String>) -> PackageMeta {
        PackageMeta {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            files: self
                .files
                .iter()
                .map(|f| FileMeta {
                    path: f.path.clone(),
                    size: f.size,
                })
                .collect(),
            created_at: self.created_at,
            source: self.source.clone(),
            stats: self.stats,
            checksum: checksum.into(),
        }
    }
}

/// Path and size of one packaged file, without its content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    /// Package-relative path.
    pub path: String,
    /// Content length in bytes.
    pub size: usize,
}

/// Content-stripped package descriptor persisted alongside the archive.
///
/// Listing operations read these records instead of decoding archives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageMeta {
    /// Package identifier.
    pub id: String,
    /// Validated skill name.
    pub name: SkillName,
    /// Human-readable description.
    pub description: String,
    /// File index with contents stripped.
    pub files: Vec<FileMeta>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Source provenance.
    pub source: PackageSource,
    /// Summary statistics.
    pub stats: PackageStats,
    /// Hex checksum of the archived blob.
    pub checksum: String,
}

impl PackageMeta {
    /// Returns the blob store key for the archive blob.
    #[must_use]
    pub fn archive_key(&self) -> String {
        self.id.clone()
    }

    /// Returns the blob store key for this metadata record.
    #[must_use]
    pub fn meta_key(&self) -> String {
        format!("{}-meta", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_package() -> SkillPackage {
        SkillPackage {
            id: "react-docs-deadbeef".to_string(),
            name: SkillName::new("react-docs").unwrap(),
            description: "React documentation".to_string(),
            files: vec![
                PackageFile::new("SKILL.md", "# React Docs"),
                PackageFile::new("reference.md", "## Reference"),
            ],
            created_at: Utc::now(),
            source: PackageSource {
                kind: SourceKind::Web,
                url: Some("https://react.dev".to_string()),
            },
            stats: PackageStats {
                total_pages: 2,
                categories: 1,
                code_examples: 0,
            },
        }
    }

    #[test]
    fn test_package_file_size() {
        let file = PackageFile::new("SKILL.md", "abcde");
        assert_eq!(file.size, 5);
    }

    #[test]
    fn test_generate_id_shape() {
        let name = SkillName::new("my-skill").unwrap();
        let id = SkillPackage::generate_id(&name);
        assert!(id.starts_with("my-skill-"));
        let suffix = &id["my-skill-".len()..];
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_generate_id_unique() {
        let name = SkillName::new("my-skill").unwrap();
        assert_ne!(
            SkillPackage::generate_id(&name),
            SkillPackage::generate_id(&name)
        );
    }

    #[test]
    fn test_meta_strips_content() {
        let package = sample_package();
        let meta = package.meta("00ff");
        assert_eq!(meta.files.len(), 2);
        assert_eq!(meta.files[0].path, "SKILL.md");
        assert_eq!(meta.files[0].size, "# React Docs".len());
        assert_eq!(meta.checksum, "00ff");
    }

    #[test]
    fn test_meta_store_keys() {
        let meta = sample_package().meta("00");
        assert_eq!(meta.archive_key(), "react-docs-deadbeef");
        assert_eq!(meta.meta_key(), "react-docs-deadbeef-meta");
    }

    #[test]
    fn test_meta_serde_round_trip() {
        let meta = sample_package().meta("aa");
        let json = serde_json::to_string(&meta).unwrap();
        let back: PackageMeta = serde_json::from_str(&json).unwrap();
        assert_eq!(meta, back);
    }
}
