//! HTTP broadcast connection
//!
//! The HTTP transport has no handshake to wait for, so the connection is
//! Ready from construction. Destroying it is terminal; a new session
//! builds a new connection.

use async_trait::async_trait;
use ondaplayer::{ConnectionState, OutputConnection, OutputSink, Result};
use std::sync::{Arc, Mutex};
use tokio::sync::broadcast;
use tracing::debug;

const STATE_CHANNEL_CAPACITY: usize = 8;

pub struct CastConnection {
    state: Mutex<ConnectionState>,
    state_tx: broadcast::Sender<ConnectionState>,
    sink: Mutex<Option<Arc<dyn OutputSink>>>,
}

impl CastConnection {
    pub fn new() -> Arc<Self> {
        let (state_tx, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Arc::new(Self {
            state: Mutex::new(ConnectionState::Ready),
            state_tx,
            sink: Mutex::new(None),
        })
    }
}

#[async_trait]
impl OutputConnection for CastConnection {
    async fn subscribe(&self, sink: Arc<dyn OutputSink>) -> Result<()> {
        debug!("Sink subscribed to broadcast connection");
        *self.sink.lock().unwrap_or_else(|e| e.into_inner()) = Some(sink);
        Ok(())
    }

    async fn destroy(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        if *state == ConnectionState::Destroyed {
            return;
        }
        *state = ConnectionState::Destroyed;
        drop(state);
        self.sink.lock().unwrap_or_else(|e| e.into_inner()).take();
        let _ = self.state_tx.send(ConnectionState::Destroyed);
        debug!("Broadcast connection destroyed");
    }

    fn state(&self) -> ConnectionState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn state_events(&self) -> broadcast::Receiver<ConnectionState> {
        self.state_tx.subscribe()
    }
}
