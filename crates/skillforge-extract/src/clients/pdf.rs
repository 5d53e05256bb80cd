//! PDF byte-stream decoding via `pdf-extract` and `lopdf`.
//!
//! Text extraction failing is fatal for the document; the structural
//! parse for page count and metadata is allowed to fail independently,
//! in which case the decoder degrades to a single-page document with no
//! metadata.

use lopdf::{Dictionary, Document, Object};
use skillforge_core::{Error, PdfDecoder, PdfDocument, Result};
use std::collections::HashMap;
use tracing::warn;

/// Info-dictionary keys copied into the decoded metadata map.
const METADATA_KEYS: [&str; 5] = ["Title", "Author", "Subject", "Creator", "Producer"];

/// [`PdfDecoder`] over `pdf-extract` for text and `lopdf` for structure.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfTextDecoder;

impl PdfTextDecoder {
    /// Creates the decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl PdfDecoder for PdfTextDecoder {
    fn decode(&self, data: &[u8]) -> Result<PdfDocument> {
        let text =
            pdf_extract::extract_text_from_mem(data).map_err(|e| Error::ExtractionFailed {
                subject: "pdf buffer".to_string(),
                message: format!("text extraction failed: {e}"),
                source: None,
            })?;

        let (page_count, metadata) = match Document::load_mem(data) {
            Ok(document) => (
                document.get_pages().len().max(1),
                document_metadata(&document),
            ),
            Err(error) => {
                warn!(%error, "structural parse failed, assuming single page");
                (1, HashMap::new())
            }
        };

        Ok(PdfDocument {
            text,
            page_count,
            metadata,
        })
    }
}

fn document_metadata(document: &Document) -> HashMap<String, String> {
    let mut metadata = HashMap::new();
    let Some(info) = info_dictionary(document) else {
        return metadata;
    };
    for key in METADATA_KEYS {
        if let Ok(Object::String(bytes, _)) = info.get(key.as_bytes()) {
            let value = decode_pdf_string(bytes);
            if !value.is_empty() {
                metadata.insert(key.to_string(), value);
            }
        }
    }
    metadata
}

fn info_dictionary(document: &Document) -> Option<&Dictionary> {
    match document.trailer.get(b"Info").ok()? {
        Object::Reference(id) => document.get_object(*id).and_then(Object::as_dict).ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Decodes a PDF string value.
///
/// Values carrying a UTF-16BE byte-order mark are decoded as UTF-16;
/// everything else is treated as byte text.
fn decode_pdf_string(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let units: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        String::from_utf16_lossy(&units).trim().to_string()
    } else {
        String::from_utf8_lossy(bytes).trim().to_string()
    }
}
