//! Package persistence over the blob store.
//!
//! Each package is stored as two records: the compressed archive under the
//! package id, and a content-stripped metadata record under `<id>-meta`.
//! Listing reads only metadata records, never archives.

use crate::checksum::{calculate_checksum, verify_checksum};
use crate::error::StoreError;
use skillforge_core::{
    Archiver, BlobStore, PackageMeta, Result, SkillPackage, get_json, put_json,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Suffix distinguishing metadata records from archive blobs.
const META_SUFFIX: &str = "-meta";

/// Persists and retrieves skill packages.
#[derive(Clone)]
pub struct PackageStore {
    blobs: Arc<dyn BlobStore>,
    archiver: Arc<dyn Archiver>,
}

impl std::fmt::Debug for PackageStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackageStore").finish_non_exhaustive()
    }
}

impl PackageStore {
    /// Creates a store over the given blob backend and archive encoder.
    #[must_use]
    pub fn new(blobs: Arc<dyn BlobStore>, archiver: Arc<dyn Archiver>) -> Self {
        Self { blobs, archiver }
    }

    /// Archives and persists a package, returning its metadata record.
    ///
    /// The archive blob is written first; the metadata record, carrying the
    /// blob's checksum, is written second.
    ///
    /// # Errors
    ///
    /// Returns an error if archive encoding or either write fails.
    pub async fn save(&self, package: &SkillPackage) -> Result<PackageMeta> {
        let bytes = self.archiver.archive(&package.files)?;
        let checksum = calculate_checksum(&bytes);
        let meta = package.meta(checksum);

        self.blobs.put(&meta.archive_key(), bytes).await?;
        put_json(self.blobs.as_ref(), &meta.meta_key(), &meta).await?;

        debug!(id = %meta.id, files = meta.files.len(), "persisted skill package");
        Ok(meta)
    }

    /// Loads the metadata record for a package id.
    ///
    /// Returns `Ok(None)` if no such package exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails or the record cannot be decoded.
    pub async fn load_meta(&self, id: &str) -> Result<Option<PackageMeta>> {
        get_json(self.blobs.as_ref(), &format!("{id}{META_SUFFIX}")).await
    }

    /// Loads and verifies the archive blob for a package id.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the package or its blob is absent, and
    /// a storage error if the blob fails checksum verification.
    pub async fn load_archive(&self, id: &str) -> Result<Vec<u8>> {
        let meta = self
            .load_meta(id)
            .await?
            .ok_or_else(|| StoreError::PackageNotFound { id: id.to_string() })?;
        let bytes = self
            .blobs
            .get(&meta.archive_key())
            .await?
            .ok_or_else(|| StoreError::PackageNotFound { id: id.to_string() })?;
        verify_checksum(&bytes, &meta.checksum, id)?;
        Ok(bytes)
    }

    /// Lists every stored package's metadata, newest first.
    ///
    /// Undecodable metadata records are skipped with a warning rather than
    /// failing the whole listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the key scan or a read fails.
    pub async fn list(&self) -> Result<Vec<PackageMeta>> {
        let mut metas = Vec::new();
        for key in self.blobs.keys("").await? {
            if !key.ends_with(META_SUFFIX) {
                continue;
            }
            match get_json::<PackageMeta>(self.blobs.as_ref(), &key).await {
                Ok(Some(meta)) => metas.push(meta),
                Ok(None) => {}
                Err(e) => warn!(%key, error = %e, "skipping undecodable package record"),
            }
        }
        metas.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(metas)
    }

    /// Removes a package's archive and metadata records.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if no such package exists, or a storage
    /// error if a delete fails.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let meta = self
            .load_meta(id)
            .await?
            .ok_or_else(|| StoreError::PackageNotFound { id: id.to_string() })?;
        self.blobs.delete(&meta.archive_key()).await?;
        self.blobs.delete(&meta.meta_key()).await?;
        debug!(%id, "deleted skill package");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ZipArchiver;
    use crate::memory::MemoryStore;
    use chrono::{Duration, Utc};
    use skillforge_core::{PackageFile, PackageSource, PackageStats, SkillName, SourceKind};

    fn package(id: &str, age_minutes: i64) -> SkillPackage {
        SkillPackage {
            id: id.to_string(),
            name: SkillName::new("react-docs").unwrap(),
            description: "React documentation".to_string(),
            files: vec![
                PackageFile::new("SKILL.md", "# react-docs"),
                PackageFile::new("reference.md", "## general"),
            ],
            created_at: Utc::now() - Duration::minutes(age_minutes),
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

    fn store() -> PackageStore {
        PackageStore::new(Arc::new(MemoryStore::new()), Arc::new(ZipArchiver))
    }

    #[tokio::test]
    async fn test_save_and_load_meta() {
        let store = store();
        let saved = store.save(&package("react-docs-aaaa0001", 0)).await.unwrap();
        assert!(saved.checksum.starts_with("blake3:"));

        let loaded = store.load_meta("react-docs-aaaa0001").await.unwrap().unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.files.len(), 2);
    }

    #[tokio::test]
    async fn test_load_archive_verifies_checksum() {
        let store = store();
        store.save(&package("react-docs-aaaa0001", 0)).await.unwrap();
        let bytes = store.load_archive("react-docs-aaaa0001").await.unwrap();
        assert_eq!(&bytes[..2], b"PK");
    }

    #[tokio::test]
    async fn test_load_archive_rejects_corrupted_blob() {
        let blobs = Arc::new(MemoryStore::new());
        let store = PackageStore::new(blobs.clone(), Arc::new(ZipArchiver));
        store.save(&package("react-docs-aaaa0001", 0)).await.unwrap();

        blobs
            .put("react-docs-aaaa0001", b"corrupted".to_vec())
            .await
            .unwrap();

        let err = store.load_archive("react-docs-aaaa0001").await.unwrap_err();
        assert!(err.is_storage_error());
    }

    #[tokio::test]
    async fn test_load_absent_package() {
        let store = store();
        assert!(store.load_meta("missing").await.unwrap().is_none());
        let err = store.load_archive("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = store();
        store.save(&package("react-docs-aaaa0001", 10)).await.unwrap();
        store.save(&package("react-docs-aaaa0002", 0)).await.unwrap();

        let listed = store.list().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["react-docs-aaaa0002", "react-docs-aaaa0001"]);
    }

    #[tokio::test]
    async fn test_list_skips_undecodable_records() {
        let blobs = Arc::new(MemoryStore::new());
        let store = PackageStore::new(blobs.clone(), Arc::new(ZipArchiver));
        store.save(&package("react-docs-aaaa0001", 0)).await.unwrap();
        blobs.put("broken-meta", b"not json".to_vec()).await.unwrap();

        let listed = store.list().await.unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_both_records() {
        let blobs = Arc::new(MemoryStore::new());
        let store = PackageStore::new(blobs.clone(), Arc::new(ZipArchiver));
        store.save(&package("react-docs-aaaa0001", 0)).await.unwrap();

        store.delete("react-docs-aaaa0001").await.unwrap();
        assert!(blobs.is_empty().await);

        let err = store.delete("react-docs-aaaa0001").await.unwrap_err();
        assert!(err.is_not_found());
    }
}
