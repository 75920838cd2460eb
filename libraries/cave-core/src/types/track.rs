/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A playable track
///
/// This is the one canonical shape used by the player. The backend and the
/// various frontend payloads disagree on field names (`cover`, `coverImage`,
/// `albumCover`; `audioSrc`, `url`), so the aliases are resolved here at the
/// boundary and nowhere else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Unique track identifier
    pub id: TrackId,

    /// Track title
    #[serde(default)]
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: String,

    /// Cover image URL
    #[serde(default, alias = "coverImage", alias = "albumCover")]
    pub cover: Option<String>,

    /// Audio source URL
    #[serde(default, alias = "url")]
    pub audio_src: String,

    /// Duration in seconds, when the catalog knows it
    #[serde(default)]
    pub duration: Option<f64>,
}

impl Track {
    /// Create a new track
    pub fn new(
        id: impl Into<TrackId>,
        title: impl Into<String>,
        artist: impl Into<String>,
        audio_src: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            artist: artist.into(),
            cover: None,
            audio_src: audio_src.into(),
            duration: None,
        }
    }

    /// Set the cover image URL
    #[must_use]
    pub fn with_cover(mut self, cover: impl Into<String>) -> Self {
        self.cover = Some(cover.into());
        self
    }

    /// Set the known duration in seconds
    #[must_use]
    pub fn with_duration(mut self, seconds: f64) -> Self {
        self.duration = Some(seconds);
        self
    }

    /// Build a track for a file on the local disk
    ///
    /// The file name becomes the title and the artist is "Local File".
    pub fn local_file(path: &Path) -> Self {
        let title = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::new(
            format!("local:{}", path.display()),
            title,
            "Local File",
            format!("file://{}", path.display()),
        )
    }

    /// Whether this track was built from a local file
    pub fn is_local(&self) -> bool {
        self.audio_src.starts_with("file://")
    }

    /// Case-insensitive match of `query` against title or artist
    ///
    /// An empty query matches everything.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        query.is_empty()
            || self.title.to_lowercase().contains(&query)
            || self.artist.to_lowercase().contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn deserialize_backend_dto() {
        let json = r#"{"id": 3, "title": "So What", "artist": "Miles Davis",
                       "cover": "https://img/3.jpg", "url": "https://cdn/3.mp3"}"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.id.as_str(), "3");
        assert_eq!(track.audio_src, "https://cdn/3.mp3");
        assert_eq!(track.cover.as_deref(), Some("https://img/3.jpg"));
        assert_eq!(track.duration, None);
    }

    #[test]
    fn deserialize_frontend_shape() {
        let json = r#"{"id": "a", "title": "T", "artist": "A",
                       "coverImage": "c.png", "audioSrc": "a.mp3", "duration": 212}"#;
        let track: Track = serde_json::from_str(json).unwrap();

        assert_eq!(track.cover.as_deref(), Some("c.png"));
        assert_eq!(track.audio_src, "a.mp3");
        assert_eq!(track.duration, Some(212.0));
    }

    #[test]
    fn album_cover_alias() {
        let json = r#"{"id": 1, "title": "T", "artist": "A", "albumCover": "x.jpg"}"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.cover.as_deref(), Some("x.jpg"));
        assert!(track.audio_src.is_empty());
    }

    #[test]
    fn query_matching() {
        let track = Track::new("1", "Blue in Green", "Miles Davis", "x.mp3");

        assert!(track.matches_query(""));
        assert!(track.matches_query("blue"));
        assert!(track.matches_query("DAVIS"));
        assert!(!track.matches_query("coltrane"));
    }

    #[test]
    fn local_file_track() {
        let track = Track::local_file(&PathBuf::from("/music/demo.flac"));

        assert_eq!(track.title, "demo.flac");
        assert_eq!(track.artist, "Local File");
        assert_eq!(track.audio_src, "file:///music/demo.flac");
        assert!(track.is_local());
    }
}
