//! Spreadsheet sink backed by the Sheets API v4.
//!
//! A tab is located by title (created with `addSheet` when missing), cleared,
//! and rewritten from `A1` with `valueInputOption=RAW` so every cell is kept
//! as literal text.

pub mod auth;
pub mod error;

pub use auth::{SheetsCredentials, TokenSource};
pub use error::SheetsError;

use async_trait::async_trait;
use leadscout_core::AppConfig;
use reqwest::{StatusCode, header};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

use crate::google_error::error_summary;

/// Destination for exported rows.
#[async_trait]
pub trait SheetSink: Send + Sync {
    /// Replace the whole content of the tab `title` with `rows`, creating the
    /// tab if needed.
    async fn replace_tab(&self, title: &str, rows: &[Vec<String>]) -> Result<(), SheetsError>;
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

/// Quote a tab title for use in A1 notation.
pub fn quoted_title(title: &str) -> String {
    format!("'{}'", title.replace('\'', "''"))
}

/// Sheets API v4 client bound to one spreadsheet.
#[derive(Debug)]
pub struct SheetsClient {
    http: reqwest::Client,
    base_url: Url,
    spreadsheet_id: String,
    tokens: TokenSource,
}

impl SheetsClient {
    pub fn new(
        base_url: &str, spreadsheet_id: &str, credentials: SheetsCredentials, timeout: Duration, user_agent: &str,
    ) -> Result<Self, SheetsError> {
        if spreadsheet_id.trim().is_empty() {
            return Err(SheetsError::MissingSpreadsheetId);
        }
        let base_url = Url::parse(base_url).map_err(|e| SheetsError::Parse(format!("invalid base url {base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(SheetsError::Parse(format!("base url cannot hold a path: {base_url}")));
        }

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| SheetsError::Network(Arc::new(e)))?;

        let tokens = TokenSource::new(http.clone(), credentials);
        Ok(Self { http, base_url, spreadsheet_id: spreadsheet_id.trim().to_string(), tokens })
    }

    /// Build a client from the application config.
    ///
    /// Fails with [`SheetsError::MissingSpreadsheetId`] or
    /// [`SheetsError::MissingCredentials`] when export is not configured.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SheetsError> {
        let spreadsheet_id = config.spreadsheet_id.as_deref().ok_or(SheetsError::MissingSpreadsheetId)?;
        let credentials = SheetsCredentials::from_app_config(config)?;
        Self::new(&config.sheets_base_url, spreadsheet_id, credentials, config.timeout(), &config.user_agent)
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(["v4", "spreadsheets"]).extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder, action: &str) -> Result<reqwest::Response, SheetsError> {
        let bearer = self.tokens.bearer().await?;
        let start = Instant::now();
        let response = request.bearer_auth(bearer).header(header::ACCEPT, "application/json").send().await?;

        let status = response.status();
        tracing::debug!(action, %status, elapsed = ?start.elapsed(), "sheets API response");

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let body = error_summary(&body);
        tracing::warn!(action, status = status.as_u16(), body = %body, "sheets API request failed");
        Err(match status {
            StatusCode::UNAUTHORIZED => SheetsError::Auth(body),
            _ => SheetsError::HttpError { status: status.as_u16(), body },
        })
    }

    /// Titles of every tab in the spreadsheet.
    pub async fn tab_titles(&self) -> Result<Vec<String>, SheetsError> {
        let mut url = self.url(&[&self.spreadsheet_id]);
        url.query_pairs_mut().append_pair("fields", "sheets.properties.title");

        let response = self.send(self.http.get(url), "list tabs").await?;
        let meta: SpreadsheetMeta = response.json().await.map_err(|e| SheetsError::Parse(e.to_string()))?;
        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    pub async fn add_tab(&self, title: &str) -> Result<(), SheetsError> {
        let url = self.url(&[&format!("{}:batchUpdate", self.spreadsheet_id)]);
        let body = json!({ "requests": [{ "addSheet": { "properties": { "title": title } } }] });
        self.send(self.http.post(url).json(&body), "add tab").await?;
        Ok(())
    }

    pub async fn clear_tab(&self, title: &str) -> Result<(), SheetsError> {
        let range = quoted_title(title);
        let url = self.url(&[&self.spreadsheet_id, "values", &format!("{range}:clear")]);
        self.send(self.http.post(url).json(&json!({})), "clear tab").await?;
        Ok(())
    }

    /// Write `rows` starting at `A1`, every value as raw text.
    pub async fn write_rows(&self, title: &str, rows: &[Vec<String>]) -> Result<(), SheetsError> {
        let range = format!("{}!A1", quoted_title(title));
        let mut url = self.url(&[&self.spreadsheet_id, "values", &range]);
        url.query_pairs_mut().append_pair("valueInputOption", "RAW");

        let body = json!({ "range": range, "majorDimension": "ROWS", "values": rows });
        self.send(self.http.put(url).json(&body), "write rows").await?;
        Ok(())
    }
}

#[async_trait]
impl SheetSink for SheetsClient {
    async fn replace_tab(&self, title: &str, rows: &[Vec<String>]) -> Result<(), SheetsError> {
        let titles = self.tab_titles().await?;
        if titles.iter().any(|t| t == title) {
            tracing::debug!(tab = title, "tab exists");
        } else {
            tracing::info!(tab = title, "creating tab");
            self.add_tab(title).await?;
        }

        self.clear_tab(title).await?;
        self.write_rows(title, rows).await
    }
}
