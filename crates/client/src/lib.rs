//! Client code for leadscout.
//!
//! This crate provides the places API client, the cached fetcher that pages
//! through search results and enriches them with details, and the spreadsheet
//! export shared by the CLI.

pub mod export;
pub mod fetcher;
pub mod google_error;
pub mod places;
pub mod sheets;

pub use export::{ExportOutcome, Exporter};
pub use fetcher::Fetcher;
pub use places::{PlacesApi, PlacesClient, PlacesConfig, PlacesError, SearchTextRequest};
pub use sheets::{SheetSink, SheetsClient, SheetsError};
