//! Shared test doubles for the playback engine and session controller
#![allow(dead_code)]

use async_trait::async_trait;
use futures::StreamExt;
use ondaplayer::{
    AudioResource, ConnectionState, OutputConnection, OutputSink, Result, SinkStatus,
};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::broadcast;

/// One recorded `play` call: the collected body and the commanded volume
#[derive(Debug, Clone)]
pub struct PlayedResource {
    pub body: String,
    pub volume: f32,
}

/// An [`OutputSink`] that records every play and lets tests emit statuses
pub struct MockSink {
    status_tx: broadcast::Sender<SinkStatus>,
    played: Mutex<Vec<PlayedResource>>,
    stops: Mutex<u32>,
    /// Emit Playing then Idle automatically after each play
    auto_idle: bool,
}

impl MockSink {
    pub fn new() -> Arc<Self> {
        Self::build(false)
    }

    /// A sink that finishes every track immediately
    pub fn auto_idle() -> Arc<Self> {
        Self::build(true)
    }

    fn build(auto_idle: bool) -> Arc<Self> {
        let (status_tx, _) = broadcast::channel(64);
        Arc::new(Self {
            status_tx,
            played: Mutex::new(Vec::new()),
            stops: Mutex::new(0),
            auto_idle,
        })
    }

    pub fn emit(&self, status: SinkStatus) {
        let _ = self.status_tx.send(status);
    }

    pub fn played(&self) -> Vec<PlayedResource> {
        self.played.lock().unwrap().clone()
    }

    pub fn play_count(&self) -> usize {
        self.played.lock().unwrap().len()
    }

    pub fn stop_count(&self) -> u32 {
        *self.stops.lock().unwrap()
    }

    /// Poll until `n` plays were recorded, or panic after 5 seconds
    pub async fn wait_for_plays(&self, n: usize) {
        for _ in 0..500 {
            if self.play_count() >= n {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} plays, saw {}", n, self.play_count());
    }
}

#[async_trait]
impl OutputSink for MockSink {
    async fn play(&self, resource: AudioResource) -> Result<()> {
        let mut bytes = Vec::new();
        let mut stream = resource.stream;
        while let Some(chunk) = stream.next().await {
            bytes.extend_from_slice(&chunk?);
        }
        self.played.lock().unwrap().push(PlayedResource {
            body: String::from_utf8_lossy(&bytes).into_owned(),
            volume: resource.volume,
        });
        if self.auto_idle {
            let _ = self.status_tx.send(SinkStatus::Playing);
            let _ = self.status_tx.send(SinkStatus::Idle);
        }
        Ok(())
    }

    async fn stop(&self) {
        *self.stops.lock().unwrap() += 1;
    }

    fn status_events(&self) -> broadcast::Receiver<SinkStatus> {
        self.status_tx.subscribe()
    }
}

/// An [`OutputConnection`] with scripted readiness
pub struct MockConnection {
    state: Mutex<ConnectionState>,
    state_tx: broadcast::Sender<ConnectionState>,
    subscribed: Mutex<bool>,
    destroyed: Mutex<bool>,
}

impl MockConnection {
    /// A connection that is Ready from the start
    pub fn ready() -> Arc<Self> {
        Self::with_state(ConnectionState::Ready)
    }

    /// A connection that never reaches Ready
    pub fn never_ready() -> Arc<Self> {
        Self::with_state(ConnectionState::Disconnected)
    }

    fn with_state(state: ConnectionState) -> Arc<Self> {
        let (state_tx, _) = broadcast::channel(16);
        Arc::new(Self {
            state: Mutex::new(state),
            state_tx,
            subscribed: Mutex::new(false),
            destroyed: Mutex::new(false),
        })
    }

    pub fn was_subscribed(&self) -> bool {
        *self.subscribed.lock().unwrap()
    }

    pub fn was_destroyed(&self) -> bool {
        *self.destroyed.lock().unwrap()
    }
}

#[async_trait]
impl OutputConnection for MockConnection {
    async fn subscribe(&self, _sink: Arc<dyn OutputSink>) -> Result<()> {
        *self.subscribed.lock().unwrap() = true;
        Ok(())
    }

    async fn destroy(&self) {
        *self.destroyed.lock().unwrap() = true;
        *self.state.lock().unwrap() = ConnectionState::Destroyed;
        let _ = self.state_tx.send(ConnectionState::Destroyed);
    }

    fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap()
    }

    fn state_events(&self) -> broadcast::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }
}
