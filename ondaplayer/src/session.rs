//! Session controller: one bounded-duration relay session at a time
//!
//! The controller owns the process-wide shared resources: the single
//! output sink and, while a session runs, the single bound connection.
//! Starting a new session while one is running is rejected; the caller
//! must await `stop_stream` first. Stop is idempotent and safe to call
//! with no session active.

use crate::engine::PlaybackEngine;
use crate::error::{Error, Result};
use crate::fetch::StreamFetcher;
use crate::sink::{ConnectionState, OutputConnection, OutputSink};
use crate::PLAYBACK_VOLUME;
use ondadrive::DriveCatalogClient;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Bounded wait for the output connection to report Ready
pub const DEFAULT_READY_TIMEOUT: Duration = Duration::from_secs(60);

/// Lifecycle state of the (at most one) relay session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Starting,
    Active,
    Stopping,
}

struct ActiveSession {
    connection: Arc<dyn OutputConnection>,
    cancel: CancellationToken,
    engine_task: JoinHandle<()>,
}

struct Slot {
    state: SessionState,
    session: Option<ActiveSession>,
}

/// Start/stop lifecycle around the playback engine
///
/// Holds the catalog client and the sink for the whole process life;
/// each `start_stream` binds a fresh connection, builds a fresh shuffled
/// playlist, and spawns a fresh engine task. All session teardown goes
/// through [`SessionController::stop_stream`].
pub struct SessionController {
    catalog: Arc<DriveCatalogClient>,
    fetcher: StreamFetcher,
    sink: Arc<dyn OutputSink>,
    volume: f32,
    ready_timeout: Duration,
    slot: Mutex<Slot>,
}

impl SessionController {
    pub fn new(catalog: Arc<DriveCatalogClient>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            catalog,
            fetcher: StreamFetcher::new(),
            sink,
            volume: PLAYBACK_VOLUME,
            ready_timeout: DEFAULT_READY_TIMEOUT,
            slot: Mutex::new(Slot {
                state: SessionState::Idle,
                session: None,
            }),
        }
    }

    /// Override the Ready wait bound (test hook)
    pub fn with_ready_timeout(mut self, timeout: Duration) -> Self {
        self.ready_timeout = timeout;
        self
    }

    /// Override the commanded output volume
    pub fn with_volume(mut self, volume: f32) -> Self {
        self.volume = volume.clamp(0.0, 1.0);
        self
    }

    /// Current session state
    pub async fn state(&self) -> SessionState {
        self.slot.lock().await.state
    }

    /// Start a relay session bound to `connection` for `duration_minutes`
    ///
    /// No-op (logged) when a session is already running. Aborts cleanly,
    /// destroying the connection, when the connection never reaches
    /// Ready or the catalog is unavailable. An empty catalog is a clean
    /// no-op session: the sink is never subscribed and no deadline is
    /// armed.
    pub async fn start_stream(
        self: &Arc<Self>,
        connection: Arc<dyn OutputConnection>,
        duration_minutes: u64,
    ) -> Result<()> {
        self.start_stream_for(connection, Duration::from_secs(duration_minutes * 60))
            .await
    }

    /// Like [`SessionController::start_stream`] with an explicit duration
    pub async fn start_stream_for(
        self: &Arc<Self>,
        connection: Arc<dyn OutputConnection>,
        duration: Duration,
    ) -> Result<()> {
        {
            let mut slot = self.slot.lock().await;
            if slot.state != SessionState::Idle {
                warn!(state = ?slot.state, "A relay session is already running, ignoring start request");
                return Ok(());
            }
            slot.state = SessionState::Starting;
        }

        match self.bring_up(connection, duration).await {
            Ok(Some(session)) => {
                let mut slot = self.slot.lock().await;
                slot.session = Some(session);
                slot.state = SessionState::Active;
                Ok(())
            }
            Ok(None) => {
                self.slot.lock().await.state = SessionState::Idle;
                Ok(())
            }
            Err(e) => {
                self.slot.lock().await.state = SessionState::Idle;
                Err(e)
            }
        }
    }

    async fn bring_up(
        self: &Arc<Self>,
        connection: Arc<dyn OutputConnection>,
        duration: Duration,
    ) -> Result<Option<ActiveSession>> {
        info!("Waiting for the output connection to be ready...");
        if let Err(e) = wait_until_ready(connection.as_ref(), self.ready_timeout).await {
            warn!(error = %e, "Output connection never became ready, aborting session start");
            connection.destroy().await;
            return Err(e);
        }
        info!("Output connection established");

        let playlist = match self.catalog.shuffled_playlist().await {
            Ok(playlist) => playlist,
            Err(e) => {
                connection.destroy().await;
                return Err(Error::CatalogUnavailable(e));
            }
        };
        if playlist.is_empty() {
            info!("No songs available to play, stopping");
            connection.destroy().await;
            return Ok(None);
        }

        info!("Starting stream with {} songs (shuffled)", playlist.len());
        info!("Stream will run for {:?}", duration);

        if let Err(e) = connection.subscribe(self.sink.clone()).await {
            warn!(error = %e, "Could not subscribe the sink, aborting session start");
            connection.destroy().await;
            return Err(e);
        }

        let cancel = CancellationToken::new();
        let engine = PlaybackEngine::new(
            self.catalog.clone(),
            self.fetcher.clone(),
            self.sink.clone(),
            playlist,
            self.volume,
            cancel.clone(),
        );
        let engine_task = engine.spawn();

        // Deadline timer: cancelled with the session, so a manual stop
        // can never be followed by a stale double-stop.
        let controller = self.clone();
        let deadline_cancel = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = deadline_cancel.cancelled() => {}
                _ = tokio::time::sleep(duration) => {
                    info!("Stream duration of {:?} reached. Stopping...", duration);
                    controller.stop_stream().await;
                }
            }
        });

        Ok(Some(ActiveSession {
            connection,
            cancel,
            engine_task,
        }))
    }

    /// Stop the running session, if any
    ///
    /// Idempotent: cancels the deadline timer, stops the sink (dropping
    /// any in-flight resource), destroys the bound connection, and
    /// returns the state to Idle. Calling it with no session active is a
    /// no-op.
    pub async fn stop_stream(&self) {
        let mut slot = self.slot.lock().await;
        let Some(session) = slot.session.take() else {
            if slot.state == SessionState::Starting {
                // A start is in flight; it will observe its own outcome.
                debug!("Stop requested while a session is starting, ignoring");
            } else {
                debug!("Stop requested with no active session");
                slot.state = SessionState::Idle;
            }
            return;
        };
        slot.state = SessionState::Stopping;

        session.cancel.cancel();
        self.sink.stop().await;
        session.connection.destroy().await;
        let _ = session.engine_task.await;

        slot.state = SessionState::Idle;
        info!("Stream stopped.");
    }
}

/// Wait until the connection reports Ready, bounded by `timeout`
async fn wait_until_ready(connection: &dyn OutputConnection, timeout: Duration) -> Result<()> {
    let mut events = connection.state_events();
    if connection.state() == ConnectionState::Ready {
        return Ok(());
    }

    let deadline = tokio::time::sleep(timeout);
    tokio::pin!(deadline);
    loop {
        tokio::select! {
            _ = &mut deadline => return Err(Error::ConnectionTimeout(timeout)),
            event = events.recv() => match event {
                Ok(ConnectionState::Ready) => return Ok(()),
                Ok(state) => debug!(?state, "Connection state change while waiting for Ready"),
                Err(_) => return Err(Error::ConnectionTimeout(timeout)),
            },
        }
    }
}
