//! Control API
//!
//! The manual counterpart of the weekly schedule. Start and stop reply
//! as soon as the request is taken; whether the session actually comes
//! up (catalog reachable, folder non-empty) shows in the logs and in
//! `/radio/status`, not in the acknowledgement.

use axum::{Json, Router, extract::State, routing::get, routing::post};
use ondacast::CastConnection;
use ondaplayer::{SessionController, SessionState};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub struct ApiState {
    pub controller: Arc<SessionController>,
    pub duration_minutes: u64,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/radio/start", post(start))
        .route("/radio/stop", post(stop))
        .route("/radio/status", get(status))
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Ack {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct StatusResponse {
    state: &'static str,
}

fn state_label(state: SessionState) -> &'static str {
    match state {
        SessionState::Idle => "idle",
        SessionState::Starting => "starting",
        SessionState::Active => "active",
        SessionState::Stopping => "stopping",
    }
}

async fn start(State(state): State<ApiState>) -> Json<Ack> {
    info!("Manual start requested");
    let controller = state.controller.clone();
    let minutes = state.duration_minutes;
    tokio::spawn(async move {
        let connection = CastConnection::new();
        if let Err(e) = controller.start_stream(connection, minutes).await {
            warn!(error = %e, "Manual session failed to start");
        }
    });
    Json(Ack { status: "starting" })
}

async fn stop(State(state): State<ApiState>) -> Json<Ack> {
    info!("Manual stop requested");
    state.controller.stop_stream().await;
    Json(Ack { status: "stopped" })
}

async fn status(State(state): State<ApiState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        state: state_label(state.controller.state().await),
    })
}
