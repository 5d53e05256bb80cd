//! Persistence layer: blob storage, archive encoding, and package records.
//!
//! Provides the in-memory [`MemoryStore`] reference implementation of the
//! core `BlobStore` trait, the [`ZipArchiver`] archive encoder, Blake3
//! checksum helpers, and the [`PackageStore`] that ties them together into
//! the two-record package layout (archive blob plus stripped metadata).
//!
//! # Examples
//!
//! ```
//! use skillforge_store::{MemoryStore, PackageStore, ZipArchiver};
//! use std::sync::Arc;
//!
//! let store = PackageStore::new(Arc::new(MemoryStore::new()), Arc::new(ZipArchiver));
//! ```

mod archive;
mod checksum;
mod error;
mod memory;
mod package_store;

pub use archive::ZipArchiver;
pub use checksum::{calculate_checksum, verify_checksum};
pub use error::{Result as StoreResult, StoreError};
pub use memory::MemoryStore;
pub use package_store::PackageStore;
