//! Places API client error types.

use std::sync::Arc;

/// Errors from the places API client and the fetcher built on it.
#[derive(Debug, thiserror::Error)]
pub enum PlacesError {
    /// No API key configured.
    #[error("missing API key: GOOGLE_PLACES_API_KEY not set")]
    MissingApiKey,

    /// Invalid search query.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Place id that cannot be used as a URL path segment.
    #[error("invalid place id: {0:?}")]
    InvalidPlaceId(String),

    /// Authentication failed (invalid or restricted API key).
    #[error("authentication failed: {body}")]
    AuthError { body: String },

    /// Rate limited by the places API.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}: {body}")]
    HttpError { status: u16, body: String },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// Reading or writing the local cache failed.
    #[error(transparent)]
    Cache(#[from] leadscout_core::Error),
}

impl From<reqwest::Error> for PlacesError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { PlacesError::Timeout } else { PlacesError::Network(Arc::new(err)) }
    }
}
