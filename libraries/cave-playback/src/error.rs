//! Error types for playback control

use cave_core::CoreError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The engine refused to load, start, or seek
    #[error("Engine error: {0}")]
    Engine(String),

    /// Invalid user input (empty playlist name, non-finite volume, ...)
    #[error("Invalid input: {0}")]
    Validation(String),

    /// The signed-in account does not exist on the server
    #[error("User not found: {0}")]
    UserNotFound(String),

    /// The controller was torn down
    #[error("Player has been shut down")]
    ShutDown,

    /// Library service failure (auth, network, server)
    #[error(transparent)]
    Service(#[from] CoreError),
}

/// User-facing error categories
///
/// The presentation layer reacts per category: `Auth` redirects to login,
/// `Network` and `Playback` show a dismissible message, `Validation` is
/// blocked at the control and usually not shown at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCategory {
    Auth,
    Network,
    Playback,
    Validation,
}

impl PlaybackError {
    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Service(e) if e.is_auth() => ErrorCategory::Auth,
            Self::Service(CoreError::InvalidInput(_)) => ErrorCategory::Validation,
            Self::Service(_) | Self::UserNotFound(_) => ErrorCategory::Network,
            Self::Engine(_) | Self::ShutDown => ErrorCategory::Playback,
            Self::NoTrackLoaded | Self::Validation(_) => ErrorCategory::Validation,
        }
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
