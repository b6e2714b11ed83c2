//! Place detail cache, one entry per place id.

use std::sync::Arc;

use super::store::KvStore;
use crate::Error;
use crate::place::PlaceDetail;

/// Detail lookups keyed by place id.
#[derive(Clone)]
pub struct DetailCache {
    store: Arc<dyn KvStore>,
}

impl DetailCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn key(place_id: &str) -> String {
        format!("details/{place_id}")
    }

    /// Get a cached detail record.
    ///
    /// Returns None if the place has never been looked up.
    pub async fn get(&self, place_id: &str) -> Result<Option<PlaceDetail>, Error> {
        let key = Self::key(place_id);
        match self.store.get(&key).await? {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| Error::corrupt(key, e)),
            None => Ok(None),
        }
    }

    /// Cache `detail` under the id it was requested by, which may differ
    /// from the id the API returned.
    pub async fn put(&self, place_id: &str, detail: &PlaceDetail) -> Result<(), Error> {
        let key = Self::key(place_id);
        let json = serde_json::to_string_pretty(detail).map_err(|e| Error::corrupt(key.as_str(), e))?;
        self.store.put(&key, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::{FsStore, MemoryStore};

    fn detail(id: &str) -> PlaceDetail {
        PlaceDetail {
            id: id.into(),
            display_name: None,
            formatted_address: Some("9 Elm St".into()),
            international_phone_number: Some("+1 555-0100".into()),
            national_phone_number: None,
            website_uri: Some("https://example.com".into()),
            rating: Some(4.1),
            user_rating_count: Some(77),
        }
    }

    #[tokio::test]
    async fn test_put_and_get() {
        let cache = DetailCache::new(Arc::new(MemoryStore::new()));
        cache.put("abc", &detail("abc")).await.unwrap();

        assert_eq!(cache.get("abc").await.unwrap(), Some(detail("abc")));
        assert!(cache.get("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_file_layout() {
        let dir = tempfile::tempdir().unwrap();
        let cache = DetailCache::new(Arc::new(FsStore::new(dir.path())));
        cache.put("ChIJ_x-1", &detail("ChIJ_x-1")).await.unwrap();

        let text = std::fs::read_to_string(dir.path().join("details").join("ChIJ_x-1.json")).unwrap();
        assert!(text.contains("\"websiteUri\""));
    }

    #[tokio::test]
    async fn test_put_keys_by_requested_id() {
        let cache = DetailCache::new(Arc::new(MemoryStore::new()));
        cache.put("old_id", &detail("canonical_id")).await.unwrap();

        let hit = cache.get("old_id").await.unwrap().unwrap();
        assert_eq!(hit.id, "canonical_id");
        assert!(cache.get("canonical_id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_invalid_place_id_is_rejected_by_store() {
        let cache = DetailCache::new(Arc::new(MemoryStore::new()));
        let result = cache.get("../../etc/passwd").await;
        assert!(matches!(result, Err(Error::InvalidKey(_))));
    }
}
