//! Playback engine: the playlist-walking state machine
//!
//! One engine task exists per session. It owns the Playlist and the
//! Cursor (single writer, no locking) and consumes two event sources:
//! the sink's status broadcasts and its own deferred-retry queue. Every
//! deferred event carries the generation it was issued for; a bumped
//! generation makes stale events a mechanical no-op instead of something
//! that must be forcibly cancelled.

use crate::fetch::StreamFetcher;
use crate::sink::{AudioResource, OutputSink, SinkStatus};
use ondadrive::DriveCatalogClient;
use ondaplaylist::{Cursor, Playlist};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Retry pacing after per-track failures
///
/// `retry_delay` spaces single-track skips; `outage_backoff` kicks in
/// once a whole pass has failed consecutively (catalog-wide outage), so
/// the engine cycles at timer pace instead of hammering the catalog.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub retry_delay: Duration,
    pub outage_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_delay: Duration::from_secs(1),
            outage_backoff: Duration::from_secs(10),
        }
    }
}

/// Deferred events the engine posts to itself
#[derive(Debug)]
enum EngineEvent {
    /// A retry scheduled after a failure, tagged with its generation
    RetryDue(u64),
}

/// The playlist-walking playback engine
///
/// Drives one session's continuous advancement: fetch the track under
/// the cursor, hand its live stream to the sink, and on the sink's
/// `Idle` report move to the next track, reshuffling the same tracks
/// (no new catalog fetch) whenever a pass completes. Per-track failures
/// advance past the failing track and defer a retry; they never stall
/// the playlist and never recurse synchronously.
pub struct PlaybackEngine {
    catalog: Arc<DriveCatalogClient>,
    fetcher: StreamFetcher,
    sink: Arc<dyn OutputSink>,
    playlist: Playlist,
    cursor: Cursor,
    volume: f32,
    retry_policy: RetryPolicy,
    generation: u64,
    events_tx: mpsc::UnboundedSender<EngineEvent>,
    events_rx: mpsc::UnboundedReceiver<EngineEvent>,
    cancel: CancellationToken,
}

impl PlaybackEngine {
    pub fn new(
        catalog: Arc<DriveCatalogClient>,
        fetcher: StreamFetcher,
        sink: Arc<dyn OutputSink>,
        playlist: Playlist,
        volume: f32,
        cancel: CancellationToken,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            catalog,
            fetcher,
            sink,
            playlist,
            cursor: Cursor::new(),
            volume,
            retry_policy: RetryPolicy::default(),
            generation: 0,
            events_tx,
            events_rx,
            cancel,
        }
    }

    /// Override the retry pacing (test hook)
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry_policy = policy;
        self
    }

    /// Spawn the engine's control task
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(mut self) {
        let mut sink_events = self.sink.status_events();
        self.play_next().await;

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => break,
                status = sink_events.recv() => match status {
                    Ok(status) => self.on_sink_status(status).await,
                    Err(broadcast::error::RecvError::Lagged(missed)) => {
                        warn!(missed, "Sink status events lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        warn!("Sink status channel closed, stopping engine");
                        break;
                    }
                },
                Some(event) = self.events_rx.recv() => match event {
                    EngineEvent::RetryDue(generation) if generation == self.generation => {
                        self.play_next().await;
                    }
                    EngineEvent::RetryDue(stale) => {
                        debug!(stale, current = self.generation, "Discarding stale retry");
                    }
                },
            }
        }
        debug!("Playback engine stopped");
    }

    async fn on_sink_status(&mut self, status: SinkStatus) {
        match status {
            SinkStatus::Idle => {
                debug!("Sink status: idle, moving to next track");
                self.play_next().await;
            }
            SinkStatus::Playing => {
                debug!("Sink status: playing");
                self.cursor.clear_failures();
            }
            SinkStatus::Buffering | SinkStatus::Paused | SinkStatus::AutoPaused => {
                debug!(?status, "Sink status");
            }
            SinkStatus::Errored(reason) => {
                warn!(%reason, "Sink reported an error, skipping to next track");
                self.skip_after_failure();
            }
        }
    }

    /// Fetch and play the track under the cursor
    ///
    /// Reaching the end of the playlist reshuffles the existing tracks
    /// and restarts at index 0. A fetch failure advances the cursor and
    /// defers the retry instead of recursing, so a sustained outage
    /// cycles at timer pace without growing the call stack.
    async fn play_next(&mut self) {
        if self.cancel.is_cancelled() {
            return;
        }
        if self.cursor.at_end(&self.playlist) {
            if self.playlist.is_empty() {
                return;
            }
            info!("Playlist ended, reshuffling...");
            self.playlist.reshuffle(&mut rand::thread_rng());
            self.cursor.reset();
        }

        let Some(track) = self.playlist.get(self.cursor.index()).cloned() else {
            return;
        };
        info!(
            "Playing ({}/{}): {}",
            self.cursor.index() + 1,
            self.playlist.len(),
            track.name
        );

        let url = self.catalog.fetch_url(&track);
        let opened = tokio::select! {
            // A stop pre-empts the in-flight fetch; its result is stale
            _ = self.cancel.cancelled() => return,
            result = self.fetcher.open(url) => result,
        };

        match opened {
            Ok(stream) => {
                let resource = AudioResource::new(stream, self.volume);
                match self.sink.play(resource).await {
                    Ok(()) => {
                        self.generation += 1;
                        self.cursor.advance();
                    }
                    Err(e) => {
                        warn!(track = %track.name, error = %e, "Sink refused the resource");
                        self.skip_after_failure();
                    }
                }
            }
            Err(e) => {
                warn!(track = %track.name, error = %e, "Could not open track stream");
                self.skip_after_failure();
            }
        }
    }

    /// Advance past the failing track and defer a retry
    fn skip_after_failure(&mut self) {
        self.cursor.advance();
        let failures = self.cursor.record_failure();
        let delay = if !self.playlist.is_empty() && failures as usize >= self.playlist.len() {
            warn!(
                failures,
                "Every track of this pass failed, backing off before the next pass"
            );
            self.retry_policy.outage_backoff
        } else {
            self.retry_policy.retry_delay
        };

        let tx = self.events_tx.clone();
        let generation = self.generation;
        let cancel = self.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                _ = tokio::time::sleep(delay) => {
                    let _ = tx.send(EngineEvent::RetryDue(generation));
                }
            }
        });
    }
}
