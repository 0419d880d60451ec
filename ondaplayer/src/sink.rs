//! Output transport contracts
//!
//! The engine never touches a concrete transport; it commands a sink and
//! reacts to the statuses the sink reports back. One connection and one
//! sink exist process-wide, owned by the session controller.

use crate::fetch::TrackStream;
use crate::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Status reported by the output sink for its in-flight resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkStatus {
    /// No resource playing (track finished or was interrupted)
    Idle,
    Playing,
    Buffering,
    Paused,
    AutoPaused,
    /// The in-flight resource failed; treated like a fetch failure
    Errored(String),
}

/// Connection-level state of the output transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Ready,
    Disconnected,
    Destroyed,
}

/// A playable resource: a live byte stream plus the commanded volume
///
/// The volume is a fraction of nominal; byte-relay transports carry it
/// as metadata, decoding transports apply it.
#[derive(Debug)]
pub struct AudioResource {
    pub stream: TrackStream,
    pub volume: f32,
}

impl AudioResource {
    pub fn new(stream: TrackStream, volume: f32) -> Self {
        Self { stream, volume }
    }
}

/// The only actuator for audible output
///
/// `play` replaces any in-flight resource; `stop` discards it. Status
/// transitions arrive on the broadcast channel returned by
/// `status_events`, in the order the sink went through them.
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Start rendering a resource, replacing the current one
    async fn play(&self, resource: AudioResource) -> Result<()>;

    /// Stop rendering and discard the in-flight resource
    async fn stop(&self);

    /// Subscribe to sink status transitions
    fn status_events(&self) -> broadcast::Receiver<SinkStatus>;
}

/// One bound output connection
#[async_trait]
pub trait OutputConnection: Send + Sync {
    /// Attach a sink so its output reaches this connection's listeners
    async fn subscribe(&self, sink: Arc<dyn OutputSink>) -> Result<()>;

    /// Release the connection; Destroyed is terminal
    async fn destroy(&self);

    /// Current connection state
    fn state(&self) -> ConnectionState;

    /// Subscribe to connection state changes
    fn state_events(&self) -> broadcast::Receiver<ConnectionState>;
}
