//! Catalog ordering
//!
//! The full track list used for sequential and shuffled navigation.

use cave_core::{Track, TrackId};

/// Ordered track catalog
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    tracks: Vec<Track>,
}

impl Catalog {
    pub fn new(tracks: Vec<Track>) -> Self {
        Self { tracks }
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Track> {
        self.tracks.get(index)
    }

    pub fn tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Position of a track by id (linear search)
    pub fn index_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|t| &t.id == id)
    }

    /// Next index, wrapping to 0 at the end
    ///
    /// With no current index the walk starts at 0.
    pub fn next_index(&self, current: Option<usize>) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(current.map_or(0, |i| (i + 1) % self.len()))
    }

    /// Previous index, wrapping to the last element at the start
    ///
    /// With no current index the walk starts at the last element.
    pub fn previous_index(&self, current: Option<usize>) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        let len = self.len();
        Some(current.map_or(len - 1, |i| (i % len + len - 1) % len))
    }

    /// Tracks whose title or artist contains `query`, case-insensitively
    pub fn filter(&self, query: &str) -> Vec<&Track> {
        self.tracks.iter().filter(|t| t.matches_query(query)).collect()
    }
}
