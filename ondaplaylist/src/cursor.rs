//! Playback cursor: position in the playlist plus failure accounting

use crate::Playlist;

/// Zero-based index into the current [`Playlist`]
///
/// Invariant: `0 <= index <= playlist.len()`. `index == len` is the
/// transient "advance or reshuffle" state consumed by the engine's next
/// `play_next` call; it is never observable by external callers.
///
/// The consecutive-failure counter tracks fetch/sink failures within the
/// current pass; it drives retry backoff and logging, is cleared when a
/// track actually plays or the playlist reshuffles, and is never
/// persisted.
#[derive(Debug, Clone, Default)]
pub struct Cursor {
    index: usize,
    consecutive_failures: u32,
}

impl Cursor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// True once the cursor has moved past the last track
    pub fn at_end(&self, playlist: &Playlist) -> bool {
        self.index >= playlist.len()
    }

    /// Move to the next track
    pub fn advance(&mut self) {
        self.index += 1;
    }

    /// Back to the start of a (re)shuffled playlist
    pub fn reset(&mut self) {
        self.index = 0;
        self.consecutive_failures = 0;
    }

    /// Record a failed fetch/playback attempt, returning the new count
    pub fn record_failure(&mut self) -> u32 {
        self.consecutive_failures += 1;
        self.consecutive_failures
    }

    /// Clear the failure streak (a track started playing)
    pub fn clear_failures(&mut self) {
        self.consecutive_failures = 0;
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Track;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn advances_to_end_then_resets() {
        let tracks: Vec<Track> = (0..3)
            .map(|i| Track::new(format!("{i}"), format!("{i}.mp3")))
            .collect();
        let playlist = Playlist::shuffled(&tracks, &mut StdRng::seed_from_u64(0));
        let mut cursor = Cursor::new();

        for i in 0..3 {
            assert_eq!(cursor.index(), i);
            assert!(!cursor.at_end(&playlist));
            cursor.advance();
        }
        assert!(cursor.at_end(&playlist));

        cursor.reset();
        assert_eq!(cursor.index(), 0);
        assert!(!cursor.at_end(&playlist));
    }

    #[test]
    fn failure_streak_counts_and_clears() {
        let mut cursor = Cursor::new();
        assert_eq!(cursor.record_failure(), 1);
        assert_eq!(cursor.record_failure(), 2);
        cursor.clear_failures();
        assert_eq!(cursor.consecutive_failures(), 0);
        assert_eq!(cursor.record_failure(), 1);
    }

    #[test]
    fn empty_playlist_is_always_at_end() {
        let playlist = Playlist::default();
        let cursor = Cursor::new();
        assert!(cursor.at_end(&playlist));
    }
}
