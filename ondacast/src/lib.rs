//! # ondacast
//!
//! HTTP broadcast transport for Onda Radio.
//!
//! Implements the `ondaplayer` output contracts over a shared broadcast
//! channel: the [`CastSink`] pump paces track bytes at a configured rate
//! and fans them out to every HTTP listener attached to the `/stream`
//! route. The [`CastConnection`] is the trivial always-ready connection
//! of a stateless HTTP transport.

mod connection;
mod routes;
mod sink;

pub use connection::CastConnection;
pub use routes::router;
pub use sink::{CastSink, DEFAULT_BYTE_RATE};
