//! Error envelopes returned by Google APIs.
//!
//! Both the places and the sheets APIs report failures as
//! `{"error": {"code": .., "message": .., "status": ..}}`.

use serde::Deserialize;

/// Maximum characters of a raw error body kept for logging.
const MAX_BODY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    pub error: ApiError,
}

#[derive(Debug, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub code: Option<u16>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Summarize an error response body for logs and error values.
///
/// Structured envelopes become `"STATUS: message"`; anything else is kept
/// verbatim, truncated.
pub fn error_summary(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        let err = envelope.error;
        return match err.status {
            Some(status) => format!("{status}: {}", err.message),
            None => err.message,
        };
    }

    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_BODY_CHARS) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}
