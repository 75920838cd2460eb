//! `LibraryService` implementation over HTTP.

use crate::client::CaveServerClient;
use async_trait::async_trait;
use cave_core::{
    LibraryService, Playlist, PlaylistId, Result, SignupRequest, Track, TrackId, UserProfile,
};

#[async_trait]
impl LibraryService for CaveServerClient {
    async fn fetch_tracks(&self) -> Result<Vec<Track>> {
        Ok(self.library()?.get_tracks().await?)
    }

    async fn fetch_favorites(&self) -> Result<Vec<Track>> {
        Ok(self.library()?.get_favorites().await?)
    }

    async fn add_favorite(&self, track_id: &TrackId) -> Result<()> {
        Ok(self.library()?.add_favorite(track_id).await?)
    }

    async fn remove_favorite(&self, track_id: &TrackId) -> Result<()> {
        Ok(self.library()?.remove_favorite(track_id).await?)
    }

    async fn fetch_playlists(&self) -> Result<Vec<Playlist>> {
        Ok(self.library()?.get_playlists().await?)
    }

    async fn create_playlist(&self, name: &str) -> Result<()> {
        Ok(self.library()?.create_playlist(name).await?)
    }

    async fn add_track_to_playlist(&self, playlist_id: &PlaylistId, track_id: &TrackId) -> Result<()> {
        Ok(self
            .library()?
            .add_track_to_playlist(playlist_id, track_id)
            .await?)
    }

    async fn fetch_profile(&self) -> Result<UserProfile> {
        let token = self.bearer_token()?;
        Ok(self.auth().get_profile(&token).await?)
    }

    async fn check_user(&self, email: &str) -> Result<bool> {
        let token = self.optional_bearer_token();
        Ok(self.auth().check_user(email, token.as_deref()).await?)
    }

    async fn signup(&self, request: &SignupRequest) -> Result<String> {
        Ok(self.auth().signup(request).await?)
    }
}
