//! # ondaplaylist
//!
//! Track model, playlist and playback cursor for the Onda Radio relay.
//!
//! A [`Playlist`] is one session's working set: the catalog listing
//! shuffled into a uniformly random order. The [`Cursor`] tracks the
//! engine's position in it, plus the consecutive-failure count used for
//! retry backoff. Both are plain owned values; the playback engine is
//! their single writer.

mod cursor;
mod playlist;
mod shuffle;
mod track;

pub use cursor::Cursor;
pub use playlist::Playlist;
pub use shuffle::shuffle;
pub use track::Track;
