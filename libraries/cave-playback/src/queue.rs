//! Manual play queue
//!
//! A user-curated FIFO consulted before catalog order or shuffle:
//!
//! ```text
//! Currently Playing: Track A
//! ─────────────────────────────
//! Manual Queue (consumed first, oldest first):
//!   - Track X (user added)
//!   - Track Y (user added)
//! ─────────────────────────────
//! Catalog (sequential or shuffled):
//!   - Track B, Track C, ...
//! ```

use cave_core::Track;
use std::collections::VecDeque;

/// FIFO of explicitly enqueued tracks
///
/// Append-only from the user's side: no dedup and no size bound.
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: VecDeque<Track>,
}

impl Queue {
    /// Create new empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a track to the tail
    pub fn enqueue(&mut self, track: Track) {
        self.tracks.push_back(track);
    }

    /// Take the oldest track
    pub fn pop_front(&mut self) -> Option<Track> {
        self.tracks.pop_front()
    }

    /// Remove track by position
    ///
    /// Returns the removed track if successful
    pub fn remove(&mut self, index: usize) -> Option<Track> {
        self.tracks.remove(index)
    }

    /// Clear entire queue
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Get all tracks in play order
    pub fn get_all(&self) -> Vec<&Track> {
        self.tracks.iter().collect()
    }

    /// Number of queued tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Check if queue is empty
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
