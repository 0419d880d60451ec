//! # ondaplayer
//!
//! The streaming playlist orchestrator of Onda Radio.
//!
//! Owns the playback state machine: it walks a shuffled [`ondaplaylist::Playlist`],
//! opens each track's byte stream through the [`StreamFetcher`], hands it
//! to the bound [`OutputSink`], and reacts to the sink's status reports
//! to advance, skip failed tracks, and reshuffle at the end of each pass.
//! The [`SessionController`] wraps one bounded-duration session around
//! the engine: connection binding, deadline timer, idempotent stop.
//!
//! The actual transport (where the bytes become audible) stays behind the
//! [`OutputSink`]/[`OutputConnection`] traits; `ondacast` ships the HTTP
//! broadcast implementation used by the binary.

mod engine;
mod error;
mod fetch;
mod session;
mod sink;

pub use engine::{PlaybackEngine, RetryPolicy};
pub use error::{Error, Result};
pub use fetch::{StreamFetcher, TrackStream};
pub use session::{SessionController, SessionState};
pub use sink::{AudioResource, ConnectionState, OutputConnection, OutputSink, SinkStatus};

/// Output volume commanded for every relayed track, as a fraction of nominal
pub const PLAYBACK_VOLUME: f32 = 0.5;
