//! HTTP routes of the broadcast transport
//!
//! `/stream` serves the live relay as a chunked `audio/mpeg` body fed
//! from the sink's broadcast channel; a listener joining mid-track picks
//! up at the current position. `/listeners` reports how many receivers
//! are attached.

use crate::CastSink;
use axum::{
    Json, Router,
    body::Body,
    extract::State,
    http::{StatusCode, header},
    response::Response,
    routing::get,
};
use bytes::Bytes;
use futures::StreamExt;
use serde::Serialize;
use std::convert::Infallible;
use std::sync::Arc;
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};
use tracing::{debug, warn};

/// Build the transport's router; mount it on the process-wide server
pub fn router(sink: Arc<CastSink>) -> Router {
    Router::new()
        .route("/stream", get(stream_audio))
        .route("/listeners", get(listeners))
        .with_state(sink)
}

async fn stream_audio(State(sink): State<Arc<CastSink>>) -> Result<Response, StatusCode> {
    debug!("Listener attached to /stream");
    let receiver = sink.subscribe_audio();
    let body = BroadcastStream::new(receiver).filter_map(|chunk| async move {
        match chunk {
            Ok(bytes) => Some(Ok::<Bytes, Infallible>(bytes)),
            Err(BroadcastStreamRecvError::Lagged(skipped)) => {
                // Slow listener; skip ahead rather than stall the relay
                warn!(skipped, "Listener lagged behind the broadcast");
                None
            }
        }
    });
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "audio/mpeg")
        .body(Body::from_stream(body))
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)
}

#[derive(Debug, Serialize)]
struct ListenersResponse {
    listeners: usize,
}

async fn listeners(State(sink): State<Arc<CastSink>>) -> Json<ListenersResponse> {
    Json(ListenersResponse {
        listeners: sink.listener_count(),
    })
}
