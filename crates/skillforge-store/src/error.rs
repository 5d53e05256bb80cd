//! Error types for persistence operations.

use skillforge_core::Error;

/// Result type for store-local operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur inside the persistence layer.
///
/// These stay internal to the crate; public operations convert them into
/// the shared [`skillforge_core::Error`] at the boundary.
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// No package with the given identifier exists in the store.
    #[error("package not found: {id}")]
    PackageNotFound {
        /// Package identifier that could not be resolved.
        id: String,
    },

    /// An archived blob no longer matches its recorded checksum.
    ///
    /// Indicates blob corruption between save and load.
    #[error("checksum mismatch for {key}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        /// Store key of the corrupted blob.
        key: String,
        /// Checksum recorded in the metadata record.
        expected: String,
        /// Checksum calculated from the loaded bytes.
        actual: String,
    },

    /// Archive encoding failed.
    #[error("archive encoding failed: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Writing archive content into the encoder failed.
    #[error("archive write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl From<StoreError> for Error {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::PackageNotFound { id } => Self::ResourceNotFound {
                resource: format!("package {id}"),
            },
            StoreError::ChecksumMismatch { ref key, .. } => Self::StorageFailed {
                key: key.clone(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
            StoreError::Archive(_) | StoreError::Io(_) => Self::StorageFailed {
                key: String::new(),
                message: err.to_string(),
                source: Some(Box::new(err)),
            },
        }
    }
}
