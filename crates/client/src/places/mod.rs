//! Places API client.
//!
//! Provides a client for the Places API (New) text-search and place-detail
//! endpoints with request spacing, place id validation, and error bodies
//! surfaced for logging.
//!
//! ### Endpoints
//!
//! - **Search**: `POST {base}/v1/places:searchText`
//! - **Details**: `GET {base}/v1/places/{id}`
//! - **Authentication**: `X-Goog-Api-Key` header.
//! - **Field masks**: `X-Goog-FieldMask` restricts each response to the
//!   fields the lead pipeline reads.

pub mod error;
pub mod request;

pub use error::PlacesError;
pub use request::{DETAIL_FIELD_MASK, SEARCH_FIELD_MASK, SearchTextRequest, validate_place_id};

use async_trait::async_trait;
use leadscout_core::{AppConfig, PlaceDetail, SearchPage};
use reqwest::{StatusCode, header};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::google_error::error_summary;

/// The two places API operations the pipeline needs.
#[async_trait]
pub trait PlacesApi: Send + Sync {
    /// Run one text-search page request.
    async fn search_text(&self, req: &SearchTextRequest) -> Result<SearchPage, PlacesError>;

    /// Look up details for one place.
    async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, PlacesError>;
}

/// Places API client configuration.
#[derive(Debug)]
pub struct PlacesConfig {
    pub api_key: SecretString,
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    pub user_agent: String,
    /// Minimum spacing between requests.
    pub min_interval: Duration,
}

/// Application defaults, without an API key.
impl Default for PlacesConfig {
    fn default() -> Self {
        let app = AppConfig::default();
        let (timeout, min_interval) = (app.timeout(), app.min_request_interval());
        Self {
            api_key: SecretString::from(String::new()),
            base_url: app.places_base_url,
            timeout,
            user_agent: app.user_agent,
            min_interval,
        }
    }
}

impl PlacesConfig {
    /// Build client configuration from the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PlacesError> {
        let api_key = config.require_places_api_key().map_err(|_| PlacesError::MissingApiKey)?;
        Ok(Self {
            api_key: SecretString::from(api_key.to_string()),
            base_url: config.places_base_url.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            min_interval: config.min_request_interval(),
        })
    }
}

/// Rate limiter to enforce request intervals.
#[derive(Debug)]
struct RateLimiter {
    last_request: Mutex<Option<Instant>>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self { last_request: Mutex::new(None), min_interval }
    }

    /// Acquire permission to make a request, waiting if necessary.
    async fn acquire(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Places API client.
#[derive(Debug)]
pub struct PlacesClient {
    http: reqwest::Client,
    config: PlacesConfig,
    rate_limiter: RateLimiter,
}

impl PlacesClient {
    /// Create a new places client with the given configuration.
    pub fn new(config: PlacesConfig) -> Result<Self, PlacesError> {
        if config.api_key.expose_secret().is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| PlacesError::Network(Arc::new(e)))?;

        let rate_limiter = RateLimiter::new(config.min_interval);
        Ok(Self { http, config, rate_limiter })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/v1/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn send(&self, request: reqwest::RequestBuilder, field_mask: &str) -> Result<Vec<u8>, PlacesError> {
        self.rate_limiter.acquire().await;

        let start = Instant::now();
        let response = request
            .header("X-Goog-Api-Key", self.config.api_key.expose_secret())
            .header("X-Goog-FieldMask", field_mask)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%status, elapsed = ?start.elapsed(), "places API response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body = error_summary(&body);
            tracing::warn!(status = status.as_u16(), body = %body, "places API request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PlacesError::AuthError { body },
                StatusCode::TOO_MANY_REQUESTS => PlacesError::RateLimited,
                _ => PlacesError::HttpError { status: status.as_u16(), body },
            });
        }

        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl PlacesApi for PlacesClient {
    async fn search_text(&self, req: &SearchTextRequest) -> Result<SearchPage, PlacesError> {
        req.validate()?;

        tracing::debug!(query = %req.text_query, paged = req.page_token.is_some(), "searching places");

        let request = self.http.post(self.endpoint("places:searchText")).json(req);
        let bytes = self.send(request, SEARCH_FIELD_MASK).await?;
        let page: SearchPage = serde_json::from_slice(&bytes).map_err(|e| PlacesError::Parse(e.to_string()))?;

        tracing::debug!(results = page.places.len(), has_next = page.next_page_token.is_some(), "search page received");
        Ok(page)
    }

    async fn place_details(&self, place_id: &str) -> Result<PlaceDetail, PlacesError> {
        validate_place_id(place_id)?;

        let request = self.http.get(self.endpoint(&format!("places/{place_id}")));
        let bytes = self.send(request, DETAIL_FIELD_MASK).await?;
        serde_json::from_slice(&bytes).map_err(|e| PlacesError::Parse(e.to_string()))
    }
}
