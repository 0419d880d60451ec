//! Opening track byte streams
//!
//! A track may be large; the response body is handed to the sink while
//! still in flight so playback starts as soon as bytes arrive. Redirect
//! responses are surfaced as errors instead of being followed: the
//! engine records the failure and skips the track (see the error module).

use crate::error::{Error, Result};
use bytes::Bytes;
use futures::stream::{Stream, StreamExt};
use reqwest::header::LOCATION;
use reqwest::{redirect, Client, StatusCode};
use std::pin::Pin;
use std::task::{Context, Poll};
use tracing::debug;
use url::Url;

/// A live stream of audio bytes for one track
///
/// Wraps the HTTP response body as a `Stream<Item = Result<Bytes>>` that
/// a sink consumes chunk by chunk. Dropping it discards the rest of the
/// body.
pub struct TrackStream {
    inner: Pin<Box<dyn Stream<Item = Result<Bytes>> + Send>>,
}

impl TrackStream {
    pub(crate) fn new(stream: impl Stream<Item = Result<Bytes>> + Send + 'static) -> Self {
        Self {
            inner: Box::pin(stream),
        }
    }

    /// Wrap an in-memory body (test/e2e helper)
    pub fn from_bytes(bytes: Bytes) -> Self {
        Self::new(futures::stream::once(async move { Ok(bytes) }))
    }

    /// Wrap an arbitrary chunk stream (for transports and tests)
    pub fn from_stream(stream: impl Stream<Item = Result<Bytes>> + Send + 'static) -> Self {
        Self::new(stream)
    }
}

impl Stream for TrackStream {
    type Item = Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for TrackStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("TrackStream")
    }
}

/// Opens track byte streams over HTTP
///
/// Success is strictly HTTP 200. The underlying client pins
/// `redirect::Policy::none()` so a 301/302 can never be silently
/// followed; it surfaces as [`Error::RedirectNotFollowed`]. No timeout
/// is imposed here; the engine's retry policy bounds the total wait.
#[derive(Debug, Clone)]
pub struct StreamFetcher {
    client: Client,
}

impl StreamFetcher {
    pub fn new() -> Self {
        let client = Client::builder()
            .redirect(redirect::Policy::none())
            .build()
            .expect("reqwest client construction cannot fail with these options");
        Self { client }
    }

    /// Open the byte stream behind a fetch URL
    pub async fn open(&self, url: Url) -> Result<TrackStream> {
        debug!(%url, "Opening track stream");
        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == StatusCode::OK {
            let stream = response.bytes_stream().map(|result| result.map_err(Error::from));
            return Ok(TrackStream::new(stream));
        }

        if status.is_redirection() {
            let location = response
                .headers()
                .get(LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            return Err(Error::RedirectNotFollowed { status, location });
        }

        Err(Error::BadStatus(status))
    }
}

impl Default for StreamFetcher {
    fn default() -> Self {
        Self::new()
    }
}
