//! In-memory blob store, the reference `BlobStore` implementation.

use async_trait::async_trait;
use skillforge_core::{BlobStore, Result};
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Process-local key-value store backed by a `HashMap`.
///
/// Suitable for tests and single-process deployments. Contents are lost on
/// process exit.
///
/// # Examples
///
/// ```
/// use skillforge_core::BlobStore;
/// use skillforge_store::MemoryStore;
///
/// # async fn example() -> Result<(), skillforge_core::Error> {
/// let store = MemoryStore::new();
/// store.put("job-1", b"record".to_vec()).await?;
/// assert_eq!(store.get("job-1").await?, Some(b"record".to_vec()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default)]
pub struct MemoryStore {
    blobs: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored blobs.
    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    /// Returns `true` if the store holds no blobs.
    pub async fn is_empty(&self) -> bool {
        self.blobs.read().await.is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
        self.blobs.write().await.insert(key.to_string(), bytes);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(key).cloned())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.blobs.write().await.remove(key);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
        let mut keys: Vec<String> = self
            .blobs
            .read()
            .await
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        Ok(keys)
    }
}
