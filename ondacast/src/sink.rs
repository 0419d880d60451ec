//! Paced broadcast sink
//!
//! Relays track bytes to every connected listener through a broadcast
//! channel. The pump task paces its reads at the configured byte rate so
//! a track occupies wall time instead of draining as fast as the source
//! serves it. Listeners that fall behind skip ahead (broadcast lag), the
//! pump never waits for them.

use bytes::Bytes;
use futures::StreamExt;
use ondaplayer::{AudioResource, OutputSink, Result, SinkStatus};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

const STATUS_CHANNEL_CAPACITY: usize = 32;
const AUDIO_CHANNEL_CAPACITY: usize = 64;

/// Default pacing rate, bytes per second (roughly 320 kbit/s MP3)
pub const DEFAULT_BYTE_RATE: u64 = 40_000;

/// HTTP broadcast implementation of [`OutputSink`]
///
/// One in-flight pump task at a time; `play` replaces it, `stop` aborts
/// it. Volume arrives as resource metadata and is not applied here, a
/// byte relay has no decoded samples to scale.
pub struct CastSink {
    byte_rate: u64,
    status_tx: broadcast::Sender<SinkStatus>,
    audio_tx: broadcast::Sender<Bytes>,
    pump: Mutex<Option<JoinHandle<()>>>,
}

impl CastSink {
    pub fn new(byte_rate: u64) -> Arc<Self> {
        let (status_tx, _) = broadcast::channel(STATUS_CHANNEL_CAPACITY);
        let (audio_tx, _) = broadcast::channel(AUDIO_CHANNEL_CAPACITY);
        Arc::new(Self {
            byte_rate: byte_rate.max(1),
            status_tx,
            audio_tx,
            pump: Mutex::new(None),
        })
    }

    /// Subscribe to the relayed audio bytes (one receiver per listener)
    pub fn subscribe_audio(&self) -> broadcast::Receiver<Bytes> {
        self.audio_tx.subscribe()
    }

    /// Number of currently connected listeners
    pub fn listener_count(&self) -> usize {
        self.audio_tx.receiver_count()
    }

    fn emit(&self, status: SinkStatus) {
        // No subscriber is fine, the engine may not be running yet
        let _ = self.status_tx.send(status);
    }

    async fn pump(
        resource: AudioResource,
        byte_rate: u64,
        audio_tx: broadcast::Sender<Bytes>,
        status_tx: broadcast::Sender<SinkStatus>,
    ) {
        let mut stream = resource.stream;
        let mut started = false;
        while let Some(chunk) = stream.next().await {
            let chunk = match chunk {
                Ok(chunk) => chunk,
                Err(e) => {
                    warn!("Track stream failed mid-flight: {e}");
                    let _ = status_tx.send(SinkStatus::Errored(e.to_string()));
                    return;
                }
            };
            if !started {
                started = true;
                let _ = status_tx.send(SinkStatus::Playing);
            }
            let pace = Duration::from_secs_f64(chunk.len() as f64 / byte_rate as f64);
            // send fails only when no listener is subscribed; keep pacing
            // so the track still occupies its wall time
            let _ = audio_tx.send(chunk);
            tokio::time::sleep(pace).await;
        }
        debug!("Track stream drained");
        let _ = status_tx.send(SinkStatus::Idle);
    }
}

#[async_trait]
impl OutputSink for CastSink {
    async fn play(&self, resource: AudioResource) -> Result<()> {
        debug!(volume = resource.volume, "Starting pump for new resource");
        let mut slot = self.pump.lock().await;
        if let Some(previous) = slot.take() {
            previous.abort();
        }
        self.emit(SinkStatus::Buffering);
        let handle = tokio::spawn(Self::pump(
            resource,
            self.byte_rate,
            self.audio_tx.clone(),
            self.status_tx.clone(),
        ));
        *slot = Some(handle);
        Ok(())
    }

    async fn stop(&self) {
        let mut slot = self.pump.lock().await;
        if let Some(handle) = slot.take() {
            handle.abort();
            debug!("Pump aborted");
        }
    }

    fn status_events(&self) -> broadcast::Receiver<SinkStatus> {
        self.status_tx.subscribe()
    }
}
