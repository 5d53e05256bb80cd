//! Zip encoding of skill package files.

use crate::error::Result as StoreResult;
use skillforge_core::{Archiver, PackageFile, Result};
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Encodes package files into a deflate-compressed zip buffer.
///
/// File order in the archive follows the input order, so archives of the
/// same package content are byte-comparable.
///
/// # Examples
///
/// ```
/// use skillforge_core::{Archiver, PackageFile};
/// use skillforge_store::ZipArchiver;
///
/// # fn example() -> Result<(), skillforge_core::Error> {
/// let files = vec![PackageFile::new("SKILL.md", "# my-skill")];
/// let bytes = ZipArchiver.archive(&files)?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiver;

impl ZipArchiver {
    fn encode(files: &[PackageFile]) -> StoreResult<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for file in files {
            writer.start_file(file.path.as_str(), options)?;
            writer.write_all(file.content.as_bytes())?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Archiver for ZipArchiver {
    fn archive(&self, files: &[PackageFile]) -> Result<Vec<u8>> {
        Ok(Self::encode(files)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    fn unpack(bytes: &[u8]) -> Vec<(String, String)> {
        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut entries = Vec::new();
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).unwrap();
            let mut content = String::new();
            entry.read_to_string(&mut content).unwrap();
            entries.push((entry.name().to_string(), content));
        }
        entries
    }

    #[test]
    fn test_archive_round_trip() {
        let files = vec![
            PackageFile::new("SKILL.md", "# react-docs"),
            PackageFile::new("scripts/helper.py", "print('hi')"),
        ];
        let bytes = ZipArchiver.archive(&files).unwrap();
        let entries = unpack(&bytes);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ("SKILL.md".to_string(), "# react-docs".to_string()));
        assert_eq!(
            entries[1],
            ("scripts/helper.py".to_string(), "print('hi')".to_string())
        );
    }

    #[test]
    fn test_archive_preserves_order() {
        let files = vec![
            PackageFile::new("b.md", "b"),
            PackageFile::new("a.md", "a"),
        ];
        let bytes = ZipArchiver.archive(&files).unwrap();
        let names: Vec<String> = unpack(&bytes).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["b.md", "a.md"]);
    }

    #[test]
    fn test_empty_file_list_yields_valid_archive() {
        let bytes = ZipArchiver.archive(&[]).unwrap();
        assert!(unpack(&bytes).is_empty());
    }
}
