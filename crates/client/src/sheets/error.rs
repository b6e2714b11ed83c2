//! Spreadsheet client error types.

use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum SheetsError {
    /// No spreadsheet configured.
    #[error("missing spreadsheet id: LEADSCOUT_SPREADSHEET_ID not set")]
    MissingSpreadsheetId,

    /// Neither an access token nor a complete refresh-token triple is configured.
    #[error("missing spreadsheet credentials: {0}")]
    MissingCredentials(String),

    /// Token exchange or bearer authentication failed.
    #[error("authentication failed: {0}")]
    Auth(String),

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
}

impl From<reqwest::Error> for SheetsError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { SheetsError::Timeout } else { SheetsError::Network(Arc::new(err)) }
    }
}
