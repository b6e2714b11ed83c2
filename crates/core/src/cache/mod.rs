//! JSON cache for search pages, place details and ranked leads.
//!
//! Every cache is a typed view over a [`KvStore`]:
//!
//! - `search/<slug>`: merged search pages per (city, category)
//! - `details/<place id>`: one detail lookup per place
//! - `leads/<slug>`: the last ranked lead list per (city, category)

pub mod details;
pub mod hash;
pub mod leads;
pub mod search;
pub mod store;

pub use crate::Error;

pub use details::DetailCache;
pub use leads::{LeadCache, LeadSnapshot};
pub use search::{PageCache, PageCacheEntry, merge};
pub use store::{FsStore, KvStore, MemoryStore};
