//! Core types and shared functionality for leadscout.
//!
//! This crate provides:
//! - Place and lead types, normalization and scoring
//! - JSON cache over a pluggable key-value store
//! - Unified error types
//! - Configuration structures

pub mod cache;
pub mod config;
pub mod error;
pub mod lead;
pub mod place;

pub use cache::{DetailCache, FsStore, KvStore, LeadCache, LeadSnapshot, MemoryStore, PageCache, PageCacheEntry};
pub use config::{AppConfig, ConfigError};
pub use error::Error;
pub use lead::{NormalizedRecord, ScoredRecord, normalize, rank, score, scored};
pub use place::{LocalizedText, PlaceDetail, RawPlace, SearchPage};
