//! Strong domain types for skill package generation.
//!
//! This module implements the newtype pattern to provide type safety for
//! domain primitives, preferring strong types over bare strings.
//!
//! # Examples
//!
//! ```
//! use skillforge_core::{JobId, SkillName};
//!
//! # fn example() -> Result<(), skillforge_core::Error> {
//! let name = SkillName::new("stripe-api")?;
//! let job = JobId::generate();
//! assert_eq!(name.as_str(), "stripe-api");
//! assert!(!job.as_str().is_empty());
//! # Ok(())
//! # }
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Strong type for skill names.
///
/// Skill names become package identifiers and file-system friendly slugs,
/// so they must:
/// - Use lowercase letters, numbers, hyphens, and underscores
/// - Start with a letter
/// - Be 1-64 characters
///
/// # Examples
///
/// ```
/// use skillforge_core::SkillName;
///
/// # fn example() -> Result<(), skillforge_core::Error> {
/// let name = SkillName::new("react-docs")?;
/// assert_eq!(name.as_str(), "react-docs");
///
/// // Invalid names
/// assert!(SkillName::new("UPPERCASE").is_err());
/// assert!(SkillName::new("123numeric").is_err());
/// assert!(SkillName::new("").is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillName(String);

impl SkillName {
    /// Creates a new skill name with validation.
    ///
    /// # Arguments
    ///
    /// * `name` - Skill name (lowercase alphanumeric with hyphens/underscores)
    ///
    /// # Errors
    ///
    /// Returns error if name is:
    /// - Empty or longer than 64 characters
    /// - Contains uppercase letters or invalid characters
    /// - Starts with anything other than a lowercase letter
    pub fn new(name: impl AsRef<str>) -> Result<Self> {
        let name = name.as_ref();

        if name.is_empty() || name.len() > 64 {
            return Err(Error::ValidationError {
                field: "skill name".to_string(),
                reason: format!("must be 1-64 characters, got {}", name.len()),
            });
        }

        if !name.chars().next().is_some_and(|c| c.is_ascii_lowercase()) {
            return Err(Error::ValidationError {
                field: "skill name".to_string(),
                reason: "must start with a lowercase letter".to_string(),
            });
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_')
        {
            return Err(Error::ValidationError {
                field: "skill name".to_string(),
                reason: "must contain only lowercase letters, numbers, hyphens, and underscores"
                    .to_string(),
            });
        }

        Ok(Self(name.to_string()))
    }

    /// Returns the skill name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `SkillName` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for SkillName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for SkillName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Job identifier (newtype over String).
///
/// Represents a unique identifier for one submitted job. Using a strong type
/// prevents accidentally mixing job ids with other string values, such as
/// skill ids or store keys.
///
/// # Examples
///
/// ```
/// use skillforge_core::JobId;
///
/// let id = JobId::generate();
/// let same = JobId::new(id.as_str());
/// assert_eq!(id, same);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    /// Creates a job identifier from an existing string.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh random job identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the job id as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `JobId` and returns the inner `String`.
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Returns the blob store key under which this job's record is persisted.
    #[must_use]
    pub fn store_key(&self) -> String {
        format!("job-{}", self.0)
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for JobId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for JobId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Classification of one documentation unit.
///
/// Mutually exclusive, decided once when the unit is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitType {
    /// API reference material (signatures, parameters, return values).
    Api,
    /// Explanatory guide or conceptual documentation.
    Guide,
    /// Tutorial or sample-driven material.
    Example,
}

impl UnitType {
    /// Returns the lowercase wire representation of this unit type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Api => "api",
            Self::Guide => "guide",
            Self::Example => "example",
        }
    }
}

impl fmt::Display for UnitType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of source a job scrapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Crawled website documentation.
    Web,
    /// GitHub repository metadata and files.
    Repository,
    /// PDF document text.
    Pdf,
}

impl SourceKind {
    /// Returns the lowercase wire representation of this source kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Repository => "repository",
            Self::Pdf => "pdf",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary returned by a completed source adapter run.
///
/// Attached to the job record once the job reaches the completed state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobOutcome {
    /// Identifier of the generated skill package.
    pub skill_id: String,
    /// Validated name of the generated skill.
    pub skill_name: SkillName,
    /// Number of pages/sections that produced documentation units.
    pub pages_scraped: usize,
    /// Number of files in the generated package.
    pub files_generated: usize,
    /// Retrieval locator for the archived package, when persisted.
    pub download_url: Option<String>,
}
