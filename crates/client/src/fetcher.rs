//! Paginated search and detail enrichment backed by the JSON cache.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::stream::{self, StreamExt};
use leadscout_core::cache::merge;
use leadscout_core::config::MAX_PLACES_CEILING;
use leadscout_core::{DetailCache, PageCache, PageCacheEntry, PlaceDetail, RawPlace};

use crate::places::{PlacesApi, PlacesError, SearchTextRequest, validate_place_id};

const DEFAULT_DETAIL_CONCURRENCY: usize = 5;

/// Drives the places API through the page and detail caches.
#[derive(Clone)]
pub struct Fetcher {
    api: Arc<dyn PlacesApi>,
    pages: PageCache,
    details: DetailCache,
    max_places: usize,
    detail_concurrency: usize,
}

impl Fetcher {
    pub fn new(api: Arc<dyn PlacesApi>, pages: PageCache, details: DetailCache) -> Self {
        Self { api, pages, details, max_places: MAX_PLACES_CEILING, detail_concurrency: DEFAULT_DETAIL_CONCURRENCY }
    }

    /// Lower the per-run place ceiling. Values above 60 are clamped.
    pub fn with_max_places(mut self, max_places: usize) -> Self {
        self.max_places = max_places.clamp(1, MAX_PLACES_CEILING);
        self
    }

    pub fn with_detail_concurrency(mut self, concurrency: usize) -> Self {
        self.detail_concurrency = concurrency.max(1);
        self
    }

    /// Fetch one search page and fold it into the cached entry for the query.
    ///
    /// Returns the merged entry, i.e. everything known for the query so far.
    pub async fn fetch_page(
        &self, city: &str, category: &str, page_token: Option<&str>,
    ) -> Result<PageCacheEntry, PlacesError> {
        let cached = self.pages.load(city, category).await?;

        let req = SearchTextRequest::for_query(city, category).with_page_token(page_token);
        let page = self.api.search_text(&req).await?;
        let fetched = page.places.len();

        let merged = merge(&cached, &page.into());
        self.pages.store(city, category, &merged).await?;

        tracing::debug!(
            city,
            category,
            fetched,
            cached = cached.places.len(),
            merged = merged.places.len(),
            "search page merged into cache"
        );
        Ok(merged)
    }

    /// Page through search results until the ceiling is reached or the API
    /// stops returning a page token.
    pub async fn fetch_all(&self, city: &str, category: &str) -> Result<Vec<RawPlace>, PlacesError> {
        let mut places: Vec<RawPlace> = Vec::new();
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut token: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let entry = self.fetch_page(city, category, token.as_deref()).await?;
            pages += 1;

            for place in entry.places {
                match index.get(&place.id) {
                    Some(&pos) => places[pos] = place,
                    None if places.len() < self.max_places => {
                        index.insert(place.id.clone(), places.len());
                        places.push(place);
                    }
                    None => {}
                }
            }

            let next = entry.next_page_token;
            if places.len() >= self.max_places || next.is_none() {
                break;
            }
            if next == token {
                tracing::warn!(city, category, "search returned the same page token twice; stopping");
                break;
            }
            token = next;
        }

        tracing::info!(city, category, pages, places = places.len(), "search complete");
        Ok(places)
    }

    /// Look up one place's details, from cache when possible.
    ///
    /// Never fails: a malformed id, a cache read problem or an API error is
    /// logged and the place is treated as having no details.
    pub async fn fetch_detail(&self, place_id: &str) -> Option<PlaceDetail> {
        if let Err(e) = validate_place_id(place_id) {
            tracing::warn!(error = %e, "skipping detail lookup");
            return None;
        }

        match self.details.get(place_id).await {
            Ok(Some(detail)) => {
                tracing::debug!(place_id, "detail cache hit");
                return Some(detail);
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(place_id, error = %e, "ignoring unreadable detail cache entry"),
        }

        let detail = match self.api.place_details(place_id).await {
            Ok(detail) => detail,
            Err(e) => {
                tracing::warn!(place_id, error = %e, "detail lookup failed");
                return None;
            }
        };

        if detail.id != place_id {
            tracing::warn!(place_id, returned = %detail.id, "detail lookup returned a different place id");
        }
        if let Err(e) = self.details.put(place_id, &detail).await {
            tracing::warn!(place_id, error = %e, "failed to cache place detail");
        }
        Some(detail)
    }

    /// Look up details for a batch of places with bounded concurrency.
    ///
    /// The result is index-aligned with `places`.
    pub async fn fetch_details(&self, places: &[RawPlace]) -> Vec<Option<PlaceDetail>> {
        let details: Vec<Option<PlaceDetail>> = stream::iter(places)
            .map(|place| self.fetch_detail(&place.id))
            .buffered(self.detail_concurrency)
            .collect()
            .await;

        tracing::info!(
            requested = places.len(),
            found = details.iter().filter(|d| d.is_some()).count(),
            "detail lookups complete"
        );
        details
    }
}
