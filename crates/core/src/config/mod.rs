//! Application configuration with layered loading.
//!
//! Configuration is assembled with figment from, in order of increasing
//! precedence:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if LEADSCOUT_CONFIG_FILE set)
//! 3. Environment variables (LEADSCOUT_*)
//! 4. GOOGLE_PLACES_API_KEY, as an alias for `places_api_key`

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Hard ceiling on unique places collected per run.
pub const MAX_PLACES_CEILING: usize = 60;

/// Application configuration with layered loading.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Places API key.
    ///
    /// Set via GOOGLE_PLACES_API_KEY or LEADSCOUT_PLACES_API_KEY.
    #[serde(default)]
    pub places_api_key: Option<String>,

    /// Base URL of the places API.
    #[serde(default = "default_places_base_url")]
    pub places_base_url: String,

    /// Directory holding the JSON cache files.
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Maximum unique places collected per run (at most 60).
    #[serde(default = "default_max_places")]
    pub max_places: usize,

    /// Maximum in-flight detail lookups.
    #[serde(default = "default_detail_concurrency")]
    pub detail_concurrency: usize,

    /// Minimum spacing between places API requests in milliseconds.
    #[serde(default = "default_min_request_interval_ms")]
    pub min_request_interval_ms: u64,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// User-Agent string for HTTP requests.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Target spreadsheet. Export is skipped when unset.
    #[serde(default)]
    pub spreadsheet_id: Option<String>,

    /// Base URL of the spreadsheet API.
    #[serde(default = "default_sheets_base_url")]
    pub sheets_base_url: String,

    /// Pre-issued OAuth bearer token for the spreadsheet API.
    #[serde(default)]
    pub sheets_access_token: Option<String>,

    /// OAuth client id for the refresh-token flow.
    #[serde(default)]
    pub sheets_client_id: Option<String>,

    /// OAuth client secret for the refresh-token flow.
    #[serde(default)]
    pub sheets_client_secret: Option<String>,

    /// OAuth refresh token for the refresh-token flow.
    #[serde(default)]
    pub sheets_refresh_token: Option<String>,

    /// OAuth token endpoint.
    #[serde(default = "default_sheets_token_url")]
    pub sheets_token_url: String,

    /// Emit log lines as JSON.
    #[serde(default)]
    pub log_json: bool,
}

fn default_places_base_url() -> String {
    "https://places.googleapis.com".into()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("./cache")
}

fn default_max_places() -> usize {
    MAX_PLACES_CEILING
}

fn default_detail_concurrency() -> usize {
    5
}

fn default_min_request_interval_ms() -> u64 {
    50
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_user_agent() -> String {
    "leadscout/0.1".into()
}

fn default_sheets_base_url() -> String {
    "https://sheets.googleapis.com".into()
}

fn default_sheets_token_url() -> String {
    "https://oauth2.googleapis.com/token".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            places_api_key: None,
            places_base_url: default_places_base_url(),
            cache_dir: default_cache_dir(),
            max_places: default_max_places(),
            detail_concurrency: default_detail_concurrency(),
            min_request_interval_ms: default_min_request_interval_ms(),
            timeout_ms: default_timeout_ms(),
            user_agent: default_user_agent(),
            spreadsheet_id: None,
            sheets_base_url: default_sheets_base_url(),
            sheets_access_token: None,
            sheets_client_id: None,
            sheets_client_secret: None,
            sheets_refresh_token: None,
            sheets_token_url: default_sheets_token_url(),
            log_json: false,
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Request spacing as Duration.
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file or environment cannot be
    /// parsed, or if validation fails after loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered provider stack used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("LEADSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment
            .merge(Env::prefixed("LEADSCOUT_").ignore(&["CONFIG_FILE"]))
            .merge(Env::raw().only(&["GOOGLE_PLACES_API_KEY"]).map(|_| "places_api_key".into()))
    }

    /// Extract and validate a config from an arbitrary figment.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Return the places API key or a `Missing` error naming the variable to set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is unset or blank.
    pub fn require_places_api_key(&self) -> Result<&str, ConfigError> {
        self.places_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "places_api_key".into(),
                hint: "Set GOOGLE_PLACES_API_KEY environment variable".into(),
            })
    }
}
