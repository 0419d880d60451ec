//! One session's ordered, shuffled working set of tracks

use crate::{shuffle, Track};
use rand::Rng;

/// An ordered sequence of tracks, built fresh per session
///
/// The order is a uniform random permutation of the catalog listing at
/// acquisition time. When playback reaches the end of the list while the
/// session is still live, [`Playlist::reshuffle`] draws a fresh
/// independent permutation of the same tracks — no new catalog fetch.
#[derive(Debug, Clone, Default)]
pub struct Playlist {
    tracks: Vec<Track>,
}

impl Playlist {
    /// Build a playlist in the given order
    ///
    /// Sessions normally go through [`Playlist::shuffled`]; this is for
    /// callers that already hold a permutation (or need a fixed order in
    /// tests).
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    /// Build a playlist by shuffling a catalog listing
    pub fn shuffled<R: Rng + ?Sized>(tracks: &[Track], rng: &mut R) -> Self {
        Self {
            tracks: shuffle(tracks, rng),
        }
    }

    /// Re-shuffle the existing tracks in place (new independent permutation)
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.tracks = shuffle(&self.tracks, rng);
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }
}
