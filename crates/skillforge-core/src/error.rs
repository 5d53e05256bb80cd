//! Error types for skill package generation.
//!
//! This module provides a comprehensive error hierarchy with contextual information
//! shared by every crate in the workspace.
//!
//! # Examples
//!
//! ```
//! use skillforge_core::{Error, Result};
//!
//! fn check_source(url: &str) -> Result<()> {
//!     if url.is_empty() {
//!         return Err(Error::ConfigError {
//!             message: "No usable source specified".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_source("").unwrap_err();
//! assert!(err.is_config_error());
//! ```

use thiserror::Error;

/// Main error type for skill package generation.
///
/// All errors in the system use this type, providing consistent error handling
/// across all crates in the workspace.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error.
    ///
    /// Raised when a job configuration is unusable before any work begins,
    /// such as a missing source or an empty start-locator list.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration problem
        message: String,
    },

    /// Validation error for domain types.
    ///
    /// Raised when creating or validating domain types like `SkillName`
    /// that have specific format requirements.
    #[error("Validation error in {field}: {reason}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Detailed reason for the validation failure
        reason: String,
    },

    /// Resource not found error.
    ///
    /// Occurs when attempting to access a resource (job, package, blob)
    /// that does not exist.
    #[error("Resource not found: {resource}")]
    ResourceNotFound {
        /// Identifier of the missing resource
        resource: String,
    },

    /// Remote fetch failed.
    ///
    /// Occurs when a network collaborator (crawler, repository API, PDF
    /// download) cannot retrieve a resource.
    #[error("Fetch failed for {url}: {message}")]
    FetchFailed {
        /// Locator that could not be retrieved
        url: String,
        /// Description of the failure
        message: String,
        /// Underlying error cause
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Content extraction failed.
    ///
    /// Raised when a source document cannot be turned into documentation
    /// units, such as an undecodable PDF buffer.
    #[error("Extraction failed for '{subject}': {message}")]
    ExtractionFailed {
        /// The source document or section that failed
        subject: String,
        /// Description of the extraction failure
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Package document rendering failed.
    ///
    /// Raised when a package document template cannot be rendered.
    #[error("Render failed for template '{template}': {message}")]
    RenderFailed {
        /// The template name that failed to render
        template: String,
        /// Description of the rendering failure
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Persistence operation failed.
    ///
    /// Raised when the blob store or package store cannot complete a
    /// read or write.
    #[error("Storage operation failed for key '{key}': {message}")]
    StorageFailed {
        /// The store key involved in the failed operation
        key: String,
        /// Description of the storage failure
        message: String,
        /// Optional underlying error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization error.
    ///
    /// Raised when JSON conversion of a persisted record fails.
    #[error("Serialization error: {message}")]
    SerializationError {
        /// Description of the serialization failure
        message: String,
        /// Underlying serde error
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Job execution failed.
    ///
    /// Captures the terminal failure of one job; the message is surfaced
    /// verbatim on the job record.
    #[error("Job execution failed: {message}")]
    JobFailed {
        /// Human-readable failure description
        message: String,
    },
}

impl Error {
    /// Returns `true` if this is a configuration error.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillforge_core::Error;
    ///
    /// let err = Error::ConfigError {
    ///     message: "zero start locators".to_string(),
    /// };
    /// assert!(err.is_config_error());
    /// ```
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(self, Self::ConfigError { .. })
    }

    /// Returns `true` if this is a validation error.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillforge_core::Error;
    ///
    /// let err = Error::ValidationError {
    ///     field: "skill_name".to_string(),
    ///     reason: "invalid characters".to_string(),
    /// };
    /// assert!(err.is_validation_error());
    /// ```
    #[must_use]
    pub const fn is_validation_error(&self) -> bool {
        matches!(self, Self::ValidationError { .. })
    }

    /// Returns `true` if this is a resource not found error.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillforge_core::Error;
    ///
    /// let err = Error::ResourceNotFound {
    ///     resource: "job-42".to_string(),
    /// };
    /// assert!(err.is_not_found());
    /// ```
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::ResourceNotFound { .. })
    }

    /// Returns `true` if this is a fetch error.
    #[must_use]
    pub const fn is_fetch_error(&self) -> bool {
        matches!(self, Self::FetchFailed { .. })
    }

    /// Returns `true` if this is an extraction error.
    #[must_use]
    pub const fn is_extraction_error(&self) -> bool {
        matches!(self, Self::ExtractionFailed { .. })
    }

    /// Returns `true` if this is a render error.
    #[must_use]
    pub const fn is_render_error(&self) -> bool {
        matches!(self, Self::RenderFailed { .. })
    }

    /// Returns `true` if this is a storage error.
    ///
    /// # Examples
    ///
    /// ```
    /// use skillforge_core::Error;
    ///
    /// let err = Error::StorageFailed {
    ///     key: "pkg-meta".to_string(),
    ///     message: "write failed".to_string(),
    ///     source: None,
    /// };
    /// assert!(err.is_storage_error());
    /// ```
    #[must_use]
    pub const fn is_storage_error(&self) -> bool {
        matches!(self, Self::StorageFailed { .. })
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError {
            message: err.to_string(),
            source: Some(err),
        }
    }
}

/// Result type alias for skill generation operations.
///
/// This is a convenience alias for `Result<T, Error>` used throughout
/// the codebase.
///
/// # Examples
///
/// ```
/// use skillforge_core::{Result, Error};
///
/// fn validate_percent(value: i32) -> Result<i32> {
///     if value < 0 {
///         return Err(Error::ConfigError {
///             message: "Percent must be non-negative".to_string(),
///         });
///     }
///     Ok(value)
/// }
///
/// assert!(validate_percent(5).is_ok());
/// assert!(validate_percent(-1).is_err());
/// ```
pub type Result<T> = std::result::Result<T, Error>;
