//! Blake3 checksums for archived package blobs.
//!
//! Checksums are stored in the format `"blake3:<hex>"` so the algorithm can
//! be upgraded later without ambiguity.

use crate::error::{Result, StoreError};

/// Calculates the Blake3 checksum of the given bytes.
///
/// # Examples
///
/// ```
/// use skillforge_store::calculate_checksum;
///
/// let checksum = calculate_checksum(b"archive bytes");
/// assert!(checksum.starts_with("blake3:"));
/// assert_eq!(checksum.len(), "blake3:".len() + 64);
/// ```
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> String {
    let hash = blake3::hash(data);
    format!("blake3:{}", hash.to_hex())
}

/// Verifies that bytes match the expected checksum.
///
/// Comparison is constant-time; all bytes are examined even after a
/// mismatch is found.
///
/// # Errors
///
/// Returns [`StoreError::ChecksumMismatch`] when the calculated checksum
/// differs from the expected value.
pub fn verify_checksum(data: &[u8], expected: &str, key: &str) -> Result<()> {
    let actual = calculate_checksum(data);
    if constant_time_compare(&actual, expected) {
        Ok(())
    } else {
        Err(StoreError::ChecksumMismatch {
            key: key.to_string(),
            expected: expected.to_string(),
            actual,
        })
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    let bytes_a = a.as_bytes();
    let bytes_b = b.as_bytes();
    let max_len = bytes_a.len().max(bytes_b.len());

    let mut diff = 0_u8;
    for i in 0..max_len {
        let byte_a = bytes_a.get(i).copied().unwrap_or(0);
        let byte_b = bytes_b.get(i).copied().unwrap_or(0);
        diff |= byte_a ^ byte_b;
    }

    bytes_a.len() == bytes_b.len() && diff == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable() {
        assert_eq!(calculate_checksum(b"data"), calculate_checksum(b"data"));
        assert_ne!(calculate_checksum(b"data"), calculate_checksum(b"Data"));
    }

    #[test]
    fn test_verify_accepts_matching_data() {
        let checksum = calculate_checksum(b"archive");
        verify_checksum(b"archive", &checksum, "pkg-1").unwrap();
    }

    #[test]
    fn test_verify_rejects_tampered_data() {
        let checksum = calculate_checksum(b"archive");
        let err = verify_checksum(b"tampered", &checksum, "pkg-1").unwrap_err();
        assert!(matches!(err, StoreError::ChecksumMismatch { .. }));
    }

    #[test]
    fn test_constant_time_compare_lengths() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "abcdef"));
        assert!(constant_time_compare("", ""));
    }
}
