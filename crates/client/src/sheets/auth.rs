//! OAuth bearer tokens for the spreadsheet API.
//!
//! Two credential shapes are accepted: a pre-issued access token, or an OAuth
//! client plus refresh token that is exchanged at the token endpoint and
//! cached until shortly before it expires.

use chrono::{DateTime, Duration, Utc};
use leadscout_core::AppConfig;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::Mutex;

use super::SheetsError;
use crate::google_error::error_summary;

/// Spreadsheet API credentials.
#[derive(Debug)]
pub enum SheetsCredentials {
    AccessToken(SecretString),
    RefreshToken { client_id: String, client_secret: SecretString, refresh_token: SecretString, token_url: String },
}

impl SheetsCredentials {
    /// Pick credentials from the application config.
    ///
    /// A static access token wins over the refresh-token flow.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SheetsError> {
        if let Some(token) = config.sheets_access_token.as_deref().filter(|t| !t.is_empty()) {
            return Ok(Self::AccessToken(SecretString::from(token.to_string())));
        }

        match (&config.sheets_client_id, &config.sheets_client_secret, &config.sheets_refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => Ok(Self::RefreshToken {
                client_id: client_id.clone(),
                client_secret: SecretString::from(client_secret.clone()),
                refresh_token: SecretString::from(refresh_token.clone()),
                token_url: config.sheets_token_url.clone(),
            }),
            _ => Err(SheetsError::MissingCredentials(
                "set LEADSCOUT_SHEETS_ACCESS_TOKEN, or LEADSCOUT_SHEETS_CLIENT_ID, \
                 LEADSCOUT_SHEETS_CLIENT_SECRET and LEADSCOUT_SHEETS_REFRESH_TOKEN"
                    .into(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default = "default_expires_in")]
    expires_in: i64,
}

fn default_expires_in() -> i64 {
    3600
}

#[derive(Debug)]
struct CachedToken {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn new(access_token: String, expires_in: i64) -> Self {
        let buffer = Duration::seconds(expires_in.clamp(0, 60));
        Self { access_token: SecretString::from(access_token), expires_at: Utc::now() + Duration::seconds(expires_in) - buffer }
    }

    fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Hands out bearer tokens, refreshing when needed.
#[derive(Debug)]
pub struct TokenSource {
    http: reqwest::Client,
    credentials: SheetsCredentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenSource {
    pub fn new(http: reqwest::Client, credentials: SheetsCredentials) -> Self {
        Self { http, credentials, cached: Mutex::new(None) }
    }

    /// Return a usable bearer token.
    pub async fn bearer(&self) -> Result<String, SheetsError> {
        let (client_id, client_secret, refresh_token, token_url) = match &self.credentials {
            SheetsCredentials::AccessToken(token) => return Ok(token.expose_secret().to_string()),
            SheetsCredentials::RefreshToken { client_id, client_secret, refresh_token, token_url } => {
                (client_id, client_secret, refresh_token, token_url)
            }
        };

        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref()
            && !token.is_expired()
        {
            return Ok(token.access_token.expose_secret().to_string());
        }

        tracing::debug!(token_url = %token_url, "refreshing spreadsheet access token");
        let response = self
            .http
            .post(token_url)
            .form(&[
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.expose_secret()),
                ("refresh_token", refresh_token.expose_secret()),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SheetsError::Auth(format!("token endpoint returned {}: {}", status.as_u16(), error_summary(&body))));
        }

        let token: TokenResponse = response.json().await.map_err(|e| SheetsError::Parse(e.to_string()))?;
        let bearer = token.access_token.clone();
        *cached = Some(CachedToken::new(token.access_token, token.expires_in));
        Ok(bearer)
    }
}
