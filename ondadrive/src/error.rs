//! Error types for the drive catalog client
//!
//! Every listing-path failure here is "catalog unavailable" to the
//! playback layer: the session start aborts, an operator intervenes or
//! the next scheduled trigger retries.

/// Result type alias for catalog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when querying the drive catalog
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (transport level)
    #[error("catalog request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status (auth/quota/etc.)
    #[error("catalog returned HTTP {0}")]
    BadStatus(reqwest::StatusCode),

    /// JSON parsing failed
    #[error("catalog response parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("invalid catalog URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Client construction rejected the configuration
    #[error("invalid catalog configuration: {0}")]
    InvalidConfig(String),

    /// Configuration error (from ondaconfig/anyhow)
    #[error("configuration error: {0}")]
    Config(#[from] anyhow::Error),
}

impl Error {
    /// Create a configuration-rejection error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
