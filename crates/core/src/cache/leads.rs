//! Snapshot of the last ranked lead list per query.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::hash::query_slug;
use super::store::KvStore;
use crate::Error;
use crate::lead::ScoredRecord;

/// Ranked leads produced by one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSnapshot {
    pub city: String,
    pub category: String,
    pub generated_at: DateTime<Utc>,
    pub leads: Vec<ScoredRecord>,
}

impl LeadSnapshot {
    pub fn new(city: &str, category: &str, leads: Vec<ScoredRecord>) -> Self {
        Self { city: city.to_string(), category: category.to_string(), generated_at: Utc::now(), leads }
    }
}

#[derive(Clone)]
pub struct LeadCache {
    store: Arc<dyn KvStore>,
}

impl LeadCache {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    pub fn key(city: &str, category: &str) -> String {
        format!("leads/{}", query_slug(city, category))
    }

    pub async fn get(&self, city: &str, category: &str) -> Result<Option<LeadSnapshot>, Error> {
        let key = Self::key(city, category);
        match self.store.get(&key).await? {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| Error::corrupt(key, e)),
            None => Ok(None),
        }
    }

    pub async fn put(&self, snapshot: &LeadSnapshot) -> Result<(), Error> {
        let key = Self::key(&snapshot.city, &snapshot.category);
        let json = serde_json::to_string_pretty(snapshot).map_err(|e| Error::corrupt(key.as_str(), e))?;
        self.store.put(&key, &json).await
    }
}
