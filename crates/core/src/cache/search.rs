//! Search page cache.
//!
//! Accumulates paginated text-search results per (city, category) across
//! pages and across runs. Entries are merged, never expired.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::hash::query_slug;
use super::store::KvStore;
use crate::Error;
use crate::place::{RawPlace, SearchPage};

/// Cached search results for one (city, category) query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageCacheEntry {
    #[serde(default)]
    pub places: Vec<RawPlace>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

impl From<SearchPage> for PageCacheEntry {
    fn from(page: SearchPage) -> Self {
        Self { places: page.places, next_page_token: page.next_page_token }
    }
}

/// Merge an incoming page into a cached entry.
///
/// Places are keyed by id: cached places first, then incoming ones, with
/// incoming fields replacing a cached place in its original position.
/// New ids are appended in incoming order. The page token always comes from
/// `incoming`.
pub fn merge(cached: &PageCacheEntry, incoming: &PageCacheEntry) -> PageCacheEntry {
    let mut places: Vec<RawPlace> = Vec::with_capacity(cached.places.len() + incoming.places.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for place in cached.places.iter().chain(incoming.places.iter()) {
        match index.get(&place.id) {
            Some(&pos) => places[pos] = place.clone(),
            None => {
                index.insert(place.id.clone(), places.len());
                places.push(place.clone());
            }
        }
    }

    PageCacheEntry { places, next_page_token: incoming.next_page_token.clone() }
}

/// Search page cache over a key-value store.
#[derive(Clone)]
pub struct PageCache {
    store: Arc<dyn KvStore>,
}

impl PageCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Store key for a query.
    pub fn key(city: &str, category: &str) -> String {
        format!("search/{}", query_slug(city, category))
    }

    /// Load the cached entry for a query, or an empty entry if none exists.
    pub async fn load(&self, city: &str, category: &str) -> Result<PageCacheEntry, Error> {
        let key = Self::key(city, category);
        match self.store.get(&key).await? {
            Some(json) => serde_json::from_str(&json).map_err(|e| Error::corrupt(key, e)),
            None => Ok(PageCacheEntry::default()),
        }
    }

    /// Persist an entry for a query.
    pub async fn store(&self, city: &str, category: &str, entry: &PageCacheEntry) -> Result<(), Error> {
        let key = Self::key(city, category);
        let json = serde_json::to_string_pretty(entry).map_err(|e| Error::corrupt(key.as_str(), e))?;
        self.store.put(&key, &json).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::MemoryStore;
    use crate::place::LocalizedText;

    fn place(id: &str, name: &str) -> RawPlace {
        RawPlace {
            id: id.into(),
            display_name: Some(LocalizedText::new(name)),
            formatted_address: None,
            rating: None,
            user_rating_count: None,
        }
    }

    fn entry(places: Vec<RawPlace>, token: Option<&str>) -> PageCacheEntry {
        PageCacheEntry { places, next_page_token: token.map(str::to_string) }
    }

    fn ids(entry: &PageCacheEntry) -> Vec<&str> {
        entry.places.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_merge_into_empty() {
        let incoming = entry(vec![place("a", "A"), place("b", "B")], Some("t1"));
        let merged = merge(&PageCacheEntry::default(), &incoming);
        assert_eq!(merged, incoming);
    }

    #[test]
    fn test_merge_is_idempotent() {
        let cached = entry(vec![place("a", "A"), place("b", "B")], Some("old"));
        let merged = merge(&cached, &cached);
        assert_eq!(merged, cached);

        let again = merge(&merged, &entry(merged.places.clone(), None));
        assert_eq!(again.places, cached.places);
        assert_eq!(again.next_page_token, None);
    }

    #[test]
    fn test_merge_union_with_incoming_winning() {
        let cached = entry(vec![place("a", "Old A"), place("b", "B"), place("c", "C")], Some("stale"));
        let incoming = entry(vec![place("d", "D"), place("b", "New B")], Some("fresh"));

        let merged = merge(&cached, &incoming);

        assert_eq!(ids(&merged), vec!["a", "b", "c", "d"]);
        assert_eq!(merged.places[1].name(), Some("New B"));
        assert_eq!(merged.places[0].name(), Some("Old A"));
        assert_eq!(merged.next_page_token.as_deref(), Some("fresh"));
    }

    #[test]
    fn test_merge_discards_cached_token() {
        let cached = entry(vec![place("a", "A")], Some("stale"));
        let merged = merge(&cached, &entry(vec![], None));
        assert_eq!(ids(&merged), vec!["a"]);
        assert!(merged.next_page_token.is_none());
    }

    #[test]
    fn test_merge_dedups_within_incoming() {
        let incoming = entry(vec![place("a", "first"), place("a", "second")], None);
        let merged = merge(&PageCacheEntry::default(), &incoming);
        assert_eq!(ids(&merged), vec!["a"]);
        assert_eq!(merged.places[0].name(), Some("second"));
    }

    #[tokio::test]
    async fn test_load_missing_is_empty() {
        let cache = PageCache::new(Arc::new(MemoryStore::new()));
        let loaded = cache.load("Austin", "bakery").await.unwrap();
        assert_eq!(loaded, PageCacheEntry::default());
    }

    #[tokio::test]
    async fn test_store_and_load() {
        let cache = PageCache::new(Arc::new(MemoryStore::new()));
        let e = entry(vec![place("a", "A")], Some("t"));

        cache.store("Austin", "bakery", &e).await.unwrap();

        assert_eq!(cache.load("Austin", "bakery").await.unwrap(), e);
        assert!(cache.load("Austin", "florist").await.unwrap().places.is_empty());
    }

    #[tokio::test]
    async fn test_load_corrupt_entry() {
        let store = Arc::new(MemoryStore::new());
        store.put(&PageCache::key("Austin", "bakery"), "{oops").await.unwrap();
        let cache = PageCache::new(store);

        let result = cache.load("Austin", "bakery").await;
        assert!(matches!(result, Err(Error::CacheCorrupt { .. })));
    }
}
