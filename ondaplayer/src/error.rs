//! Error taxonomy of the playback layer
//!
//! Recovery boundaries: `CatalogUnavailable` and `ConnectionTimeout`
//! abort a session start; `RedirectNotFollowed`, `BadStatus`, `Http` and
//! `Sink` are per-track failures the engine recovers from by skipping to
//! the next track. Nothing here propagates to process level.

use std::time::Duration;

/// Result type alias for playback operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while orchestrating playback
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The catalog listing could not be obtained; the session start aborts
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(#[from] ondadrive::Error),

    /// A track fetch answered with a redirect, which is not followed
    #[error("fetch failed: HTTP {status} redirect not followed (location: {location:?})")]
    RedirectNotFollowed {
        status: reqwest::StatusCode,
        location: Option<String>,
    },

    /// A track fetch answered with a non-200 status
    #[error("fetch failed: HTTP {0}")]
    BadStatus(reqwest::StatusCode),

    /// A track fetch failed at the transport level
    #[error("fetch failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The output sink reported an error for the in-flight resource
    #[error("output sink error: {0}")]
    Sink(String),

    /// The output connection did not reach Ready within the bounded wait
    #[error("output connection not ready within {0:?}")]
    ConnectionTimeout(Duration),
}

impl Error {
    /// True for the per-track failures the engine skips past
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::RedirectNotFollowed { .. } | Self::BadStatus(_) | Self::Http(_) | Self::Sink(_)
        )
    }
}
