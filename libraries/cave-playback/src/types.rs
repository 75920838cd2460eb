//! Core types for playback control

use cave_core::Track;
use serde::{Deserialize, Serialize};

/// Per-track playback phase
///
/// ```text
/// Idle -> Loading -> Playing <-> Paused -> Ended
///                       ^                    |
///                       +--- (repeat) -------+
/// ```
///
/// `Ended` moves on to `Loading` of the next resolved track unless repeat is
/// on, in which case the same track goes straight back to `Playing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackPhase {
    /// Nothing selected yet
    Idle,

    /// Source handed to the engine, waiting for playback to start
    Loading,

    /// Engine accepted `play()`
    Playing,

    /// Track loaded but not playing (user pause, cue, or refused start)
    Paused,

    /// Engine reported the end of the track
    Ended,
}

/// Configuration for the player controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Initial volume (0.0-1.0, default: 1.0)
    pub volume: f64,

    /// Initial shuffle flag (default: false)
    pub shuffle: bool,

    /// Initial repeat flag (default: false)
    pub repeat: bool,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            volume: 1.0,
            shuffle: false,
            repeat: false,
        }
    }
}

/// Snapshot of everything the presentation layer renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub phase: PlaybackPhase,
    pub current_track: Option<Track>,
    /// Position of `current_track` in the catalog; `None` for tracks outside it
    pub current_index: Option<usize>,
    pub is_playing: bool,
    pub is_shuffle: bool,
    pub is_repeat: bool,
    pub volume: f64,
    pub is_muted: bool,
    pub current_time: f64,
    pub duration: f64,
    pub queue_length: usize,
    pub is_favorite: bool,
}

impl PlayerState {
    /// Progress through the current track in percent (0-100)
    ///
    /// An unknown duration reports 0 instead of dividing by zero.
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.current_time, self.duration)
    }
}

pub(crate) fn progress_percent(current_time: f64, duration: f64) -> f64 {
    if duration > 0.0 && duration.is_finite() {
        (current_time / duration * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}

/// Format seconds as `mm:ss`
///
/// Negative or non-finite input formats as `00:00`.
pub fn format_time(seconds: f64) -> String {
    let seconds = if seconds.is_finite() && seconds > 0.0 {
        seconds as u64
    } else {
        0
    };
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}
