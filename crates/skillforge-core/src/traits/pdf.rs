//! PDF decoding and byte-fetching traits.

use crate::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Decoded text form of one PDF document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdfDocument {
    /// Full extracted text.
    pub text: String,
    /// Number of pages in the document.
    pub page_count: usize,
    /// Document metadata entries, e.g. `Title`.
    pub metadata: HashMap<String, String>,
}

/// Decodes a PDF byte buffer into text, page count, and metadata.
///
/// Decoding is synchronous and CPU-bound.
pub trait PdfDecoder: Send + Sync {
    /// Decodes the given bytes.
    ///
    /// # Errors
    ///
    /// Returns an extraction error if the buffer is not a decodable PDF.
    fn decode(&self, data: &[u8]) -> Result<PdfDocument>;
}

/// Fetches raw bytes from a remote locator.
///
/// Used by the PDF adapter when the job supplies a download locator
/// instead of inline bytes.
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Downloads the resource at `url`.
    ///
    /// # Errors
    ///
    /// Returns a fetch error if the resource cannot be retrieved.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}
