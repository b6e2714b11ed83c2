//! Key-value storage backends for the JSON cache.
//!
//! Keys are `/`-separated paths whose segments are restricted to
//! `[A-Za-z0-9_-]`, so a key can always be mapped onto a file below the cache
//! directory without escaping it.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::Error;

/// Minimal key-value interface the caches are written against.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Get the stored JSON text for `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, Error>;

    /// Store JSON text under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: &str) -> Result<(), Error>;
}

/// Check that every segment of a key is non-empty and uses only `[A-Za-z0-9_-]`.
pub fn validate_key(key: &str) -> Result<(), Error> {
    let valid = !key.is_empty()
        && key.split('/').all(|segment| {
            !segment.is_empty() && segment.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        });
    if valid { Ok(()) } else { Err(Error::InvalidKey(key.to_string())) }
}

/// Filesystem store: one `<key>.json` file per key under a root directory.
///
/// Directories are created on demand when a value is first written.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, Error> {
        validate_key(key)?;
        let mut path = self.root.clone();
        for segment in key.split('/') {
            path.push(segment);
        }
        path.set_extension("json");
        Ok(path)
    }
}

#[async_trait]
impl KvStore for FsStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Error::io(path, e)),
        }
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), Error> {
        let path = self.path_for(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| Error::io(parent, e))?;
        }

        // Atomic replace: readers see the old entry or the new one.
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, value).await.map_err(|e| Error::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path).await.map_err(|e| Error::io(&path, e))?;

        tracing::debug!(key, path = %path.display(), bytes = value.len(), "cache entry written");
        Ok(())
    }
}

/// In-memory store, used as the backing store in tests.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, Error> {
        validate_key(key)?;
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), Error> {
        validate_key(key)?;
        self.entries.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("search/austin_bakery-1a2b3c4d").is_ok());
        assert!(validate_key("details/ChIJ-abc_123").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("details/").is_err());
        assert!(validate_key("../escape").is_err());
        assert!(validate_key("details/a b").is_err());
        assert!(validate_key("/abs").is_err());
    }

    #[tokio::test]
    async fn test_fs_put_and_get() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path().join("cache"));

        store.put("details/abc", r#"{"id":"abc"}"#).await.unwrap();

        let path = dir.path().join("cache").join("details").join("abc.json");
        assert!(path.exists());
        assert_eq!(store.get("details/abc").await.unwrap().as_deref(), Some(r#"{"id":"abc"}"#));
    }

    #[tokio::test]
    async fn test_fs_get_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        assert!(store.get("search/nothing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_fs_put_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());

        store.put("leads/x", "1").await.unwrap();
        store.put("leads/x", "2").await.unwrap();

        assert_eq!(store.get("leads/x").await.unwrap().as_deref(), Some("2"));
        assert!(!dir.path().join("leads").join("x.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_fs_rejects_invalid_key() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsStore::new(dir.path());
        let result = store.put("../outside", "{}").await;
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }

    #[tokio::test]
    async fn test_memory_put_and_get() {
        let store = MemoryStore::new();
        assert!(store.is_empty().await);

        store.put("search/k", "{}").await.unwrap();

        assert_eq!(store.len().await, 1);
        assert_eq!(store.get("search/k").await.unwrap().as_deref(), Some("{}"));
        assert!(store.get("search/other").await.unwrap().is_none());
    }
}
