/// Playlist domain type
use crate::types::{PlaylistId, Track, TrackId};
use serde::{Deserialize, Serialize};

/// Playlist
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    /// Unique playlist identifier
    pub id: PlaylistId,

    /// Playlist name (unique per user, compared case-insensitively)
    pub name: String,

    /// Ordered tracks
    #[serde(default)]
    pub tracks: Vec<Track>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new(id: impl Into<PlaylistId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tracks: Vec::new(),
        }
    }

    /// Replace the track list
    #[must_use]
    pub fn with_tracks(mut self, tracks: Vec<Track>) -> Self {
        self.tracks = tracks;
        self
    }

    /// Case-insensitive name comparison, ignoring surrounding whitespace
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().to_lowercase() == name.trim().to_lowercase()
    }

    /// Whether the playlist already holds a track
    pub fn contains(&self, track_id: &TrackId) -> bool {
        self.tracks.iter().any(|t| &t.id == track_id)
    }

    /// Find a playlist by case-insensitive name
    pub fn find_by_name<'a>(playlists: &'a [Playlist], name: &str) -> Option<&'a Playlist> {
        playlists.iter().find(|p| p.name_matches(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let playlists = vec![Playlist::new("1", "Road Trip"), Playlist::new("2", "Focus")];

        let found = Playlist::find_by_name(&playlists, "  road TRIP ").unwrap();
        assert_eq!(found.id, PlaylistId::new("1"));
        assert!(Playlist::find_by_name(&playlists, "gym").is_none());
    }

    #[test]
    fn deserialize_dto_without_tracks() {
        let playlist: Playlist = serde_json::from_str(r#"{"id": 9, "name": "Empty"}"#).unwrap();
        assert!(playlist.tracks.is_empty());
        assert_eq!(playlist.id.as_str(), "9");
    }
}
