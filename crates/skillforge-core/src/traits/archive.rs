//! Archive encoding trait.

use crate::{PackageFile, Result};

/// Encodes an ordered list of package files into a compressed byte buffer.
///
/// Encoding is synchronous and CPU-bound; implementations must preserve the
/// given file order so repeated archives of the same package are comparable.
pub trait Archiver: Send + Sync {
    /// Encodes the files into one compressed archive.
    ///
    /// # Errors
    ///
    /// Returns an error if archive encoding fails.
    fn archive(&self, files: &[PackageFile]) -> Result<Vec<u8>>;
}
