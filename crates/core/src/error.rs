//! Unified error types for leadscout.
//!
//! Display strings start with a stable code so log lines stay greppable.

use std::path::PathBuf;

/// Errors raised by the core cache layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Cache key contains characters that cannot be mapped to a file name.
    #[error("INVALID_KEY: {0}")]
    InvalidKey(String),

    /// Reading or writing a cache file failed.
    #[error("CACHE_IO: {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A cache entry exists but does not decode.
    #[error("CACHE_CORRUPT: {key}: {source}")]
    CacheCorrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::CacheIo { path: path.into(), source }
    }

    pub(crate) fn corrupt(key: impl Into<String>, source: serde_json::Error) -> Self {
        Error::CacheCorrupt { key: key.into(), source }
    }
}
