//! Key-value blob storage trait.
//!
//! Jobs and packages persist through this interface. The reference
//! implementation is an in-memory map; any key-value store satisfies it.

use crate::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Generic key-value storage over raw bytes.
///
/// All implementations must be `Send + Sync`; mutation goes through `&self`
/// so stores can be shared behind an `Arc`.
///
/// # Examples
///
/// ```
/// use skillforge_core::traits::BlobStore;
/// use skillforge_core::Result;
/// use async_trait::async_trait;
/// use std::collections::HashMap;
/// use std::sync::Mutex;
///
/// struct MapStore {
///     data: Mutex<HashMap<String, Vec<u8>>>,
/// }
///
/// #[async_trait]
/// impl BlobStore for MapStore {
///     async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
///         self.data.lock().unwrap().insert(key.to_string(), bytes);
///         Ok(())
///     }
///
///     async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
///         Ok(self.data.lock().unwrap().get(key).cloned())
///     }
///
///     async fn delete(&self, key: &str) -> Result<()> {
///         self.data.lock().unwrap().remove(key);
///         Ok(())
///     }
///
///     async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
///         Ok(self
///             .data
///             .lock()
///             .unwrap()
///             .keys()
///             .filter(|k| k.starts_with(prefix))
///             .cloned()
///             .collect())
///     }
/// }
/// ```
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores bytes under a key, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()>;

    /// Retrieves the bytes stored under a key.
    ///
    /// Returns `Ok(None)` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Removes a key. Absent keys are a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists every key starting with the given prefix.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Stores a value under a key as JSON.
///
/// # Errors
///
/// Returns a serialization error if encoding fails, or a storage error if
/// the write fails.
pub async fn put_json<T>(store: &dyn BlobStore, key: &str, value: &T) -> Result<()>
where
    T: Serialize + Sync,
{
    let bytes = serde_json::to_vec(value)?;
    store.put(key, bytes).await
}

/// Retrieves and decodes a JSON value stored under a key.
///
/// Returns `Ok(None)` if the key is absent.
///
/// # Errors
///
/// Returns a serialization error if decoding fails, or a storage error if
/// the read fails.
pub async fn get_json<T>(store: &dyn BlobStore, key: &str) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    match store.get(key).await? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct TestStore {
        data: Mutex<HashMap<String, Vec<u8>>>,
    }

    impl TestStore {
        fn new() -> Self {
            Self {
                data: Mutex::new(HashMap::new()),
            }
        }
    }

    #[async_trait]
    impl BlobStore for TestStore {
        async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<()> {
            self.data.lock().unwrap().insert(key.to_string(), bytes);
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
            Ok(self.data.lock().unwrap().get(key).cloned())
        }

        async fn delete(&self, key: &str) -> Result<()> {
            self.data.lock().unwrap().remove(key);
            Ok(())
        }

        async fn keys(&self, prefix: &str) -> Result<Vec<String>> {
            Ok(self
                .data
                .lock()
                .unwrap()
                .keys()
                .filter(|k| k.starts_with(prefix))
                .cloned()
                .collect())
        }
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        value: u32,
    }

    #[tokio::test]
    async fn test_json_round_trip() {
        let store = TestStore::new();
        put_json(&store, "rec-1", &Record { value: 7 })
            .await
            .unwrap();

        let back: Option<Record> = get_json(&store, "rec-1").await.unwrap();
        assert_eq!(back, Some(Record { value: 7 }));
    }

    #[tokio::test]
    async fn test_json_absent_key() {
        let store = TestStore::new();
        let back: Option<Record> = get_json(&store, "missing").await.unwrap();
        assert_eq!(back, None);
    }

    #[tokio::test]
    async fn test_json_corrupt_record() {
        let store = TestStore::new();
        store.put("rec-1", b"not json".to_vec()).await.unwrap();

        let result: Result<Option<Record>> = get_json(&store, "rec-1").await;
        assert!(result.is_err());
    }
}
