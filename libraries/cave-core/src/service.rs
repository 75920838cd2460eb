//! Remote library service trait
//!
//! The playback controller talks to the backend only through this trait, so
//! the HTTP client can be swapped for a mock in tests or another transport.

use crate::error::Result;
use crate::types::{Playlist, PlaylistId, SignupRequest, Track, TrackId, UserProfile};
use async_trait::async_trait;

/// Catalog, favorites, playlists, and account operations
///
/// Every method except [`check_user`](Self::check_user) and
/// [`signup`](Self::signup) requires a bearer credential. Implementations must
/// fail with [`CoreError::AuthRequired`](crate::CoreError::AuthRequired)
/// without sending a request when no credential is stored. There is no retry
/// policy: failures surface immediately.
#[async_trait]
pub trait LibraryService: Send + Sync {
    // ========================================================================
    // Catalog
    // ========================================================================

    /// Fetch the full track catalog
    async fn fetch_tracks(&self) -> Result<Vec<Track>>;

    // ========================================================================
    // Favorites
    // ========================================================================

    /// Fetch the favorites of the signed-in account
    async fn fetch_favorites(&self) -> Result<Vec<Track>>;

    /// Mark a track as favorite
    async fn add_favorite(&self, track_id: &TrackId) -> Result<()>;

    /// Remove a track from favorites
    async fn remove_favorite(&self, track_id: &TrackId) -> Result<()>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Fetch all playlists
    async fn fetch_playlists(&self) -> Result<Vec<Playlist>>;

    /// Create a playlist; the server does not return the new id
    async fn create_playlist(&self, name: &str) -> Result<()>;

    /// Append a track to a playlist
    async fn add_track_to_playlist(&self, playlist_id: &PlaylistId, track_id: &TrackId)
        -> Result<()>;

    // ========================================================================
    // Account
    // ========================================================================

    /// Fetch the profile of the signed-in account
    async fn fetch_profile(&self) -> Result<UserProfile>;

    /// Check whether an account exists for `email`
    async fn check_user(&self, email: &str) -> Result<bool>;

    /// Create an account, returning the server's acknowledgement message
    async fn signup(&self, request: &SignupRequest) -> Result<String>;
}
