//! Player Events
//!
//! Event-based communication for UI synchronization. The controller pushes
//! events as state changes; the presentation layer drains and renders them:
//! - Phase changes (loading/playing/paused/ended)
//! - Track changes (selection, advance, queue pop)
//! - Position updates (seek, engine time updates)
//! - Remote state refreshes (catalog, favorites, playlists)
//! - Authentication prompts and user-facing error messages

use crate::types::PlaybackPhase;
use serde::{Deserialize, Serialize};

/// Events emitted by the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlaybackEvent {
    /// Playback phase changed
    StateChanged {
        /// The new phase
        phase: PlaybackPhase,
    },

    /// Current track changed
    TrackChanged {
        /// ID of the new (current) track
        track_id: String,
        /// ID of the previous track (if any)
        previous_track_id: Option<String>,
    },

    /// Engine reported the end of a track
    TrackFinished {
        /// ID of the finished track
        track_id: String,
    },

    /// Position update (seek or engine time update)
    PositionUpdate {
        /// Current playback position in seconds
        position_secs: f64,
        /// Track duration in seconds (0 when unknown)
        duration_secs: f64,
    },

    /// Volume changed
    VolumeChanged {
        /// New volume level (0.0-1.0)
        level: f64,
        /// Whether audio is muted
        is_muted: bool,
    },

    /// Manual queue changed (enqueue, pop, remove, clear)
    QueueChanged {
        /// New queue length
        length: usize,
    },

    /// Shuffle toggled
    ShuffleChanged { enabled: bool },

    /// Repeat toggled
    RepeatChanged { enabled: bool },

    /// Catalog replaced
    CatalogLoaded { count: usize },

    /// Favorites re-fetched
    FavoritesChanged { count: usize },

    /// Playlists re-fetched
    PlaylistsChanged { count: usize },

    /// No valid credential; the UI should send the user to login
    AuthRequired,

    /// Dismissible user-facing error message
    Error {
        /// Error message
        message: String,
    },
}
