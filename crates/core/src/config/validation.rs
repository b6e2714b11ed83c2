//! Range checks applied to a loaded `AppConfig`.

use crate::config::{AppConfig, MAX_PLACES_CEILING};
use thiserror::Error;

/// Errors from loading or checking configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_places` is 0 or exceeds 60
    /// - `detail_concurrency` is 0 or exceeds 32
    /// - `min_request_interval_ms` exceeds 10 seconds
    /// - `timeout_ms` is less than 100ms or exceeds 5 minutes
    /// - `user_agent` or a base URL is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_places == 0 || self.max_places > MAX_PLACES_CEILING {
            return Err(ConfigError::Invalid {
                field: "max_places".into(),
                reason: format!("must be between 1 and {MAX_PLACES_CEILING}"),
            });
        }

        if self.detail_concurrency == 0 || self.detail_concurrency > 32 {
            return Err(ConfigError::Invalid {
                field: "detail_concurrency".into(),
                reason: "must be between 1 and 32".into(),
            });
        }

        if self.min_request_interval_ms > 10_000 {
            return Err(ConfigError::Invalid {
                field: "min_request_interval_ms".into(),
                reason: "must not exceed 10 seconds (10000ms)".into(),
            });
        }

        if self.timeout_ms < 100 {
            return Err(ConfigError::Invalid { field: "timeout_ms".into(), reason: "must be at least 100ms".into() });
        }
        if self.timeout_ms > 300_000 {
            return Err(ConfigError::Invalid {
                field: "timeout_ms".into(),
                reason: "must not exceed 5 minutes (300000ms)".into(),
            });
        }

        if self.user_agent.is_empty() {
            return Err(ConfigError::Invalid { field: "user_agent".into(), reason: "must not be empty".into() });
        }

        if self.places_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "places_base_url".into(), reason: "must not be empty".into() });
        }
        if self.sheets_base_url.is_empty() {
            return Err(ConfigError::Invalid { field: "sheets_base_url".into(), reason: "must not be empty".into() });
        }

        if self.sheets_access_token.is_some() && self.sheets_refresh_token.is_some() {
            tracing::warn!(
                "Both sheets_access_token and sheets_refresh_token are set; \
                 the static access token takes precedence"
            );
        }

        Ok(())
    }
}
