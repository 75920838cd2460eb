//! Catalog, favorites, and playlist operations for the Cave Player server.

use crate::client::{execute, parse_json};
use crate::error::Result;
use crate::types::CreatePlaylistRequest;
use cave_core::{Playlist, PlaylistId, Track, TrackId};
use reqwest::Client;
use tracing::{debug, info};

/// Library client for the Cave Player server.
///
/// Obtained from [`CaveServerClient::library`](crate::CaveServerClient::library),
/// which has already resolved the bearer token.
pub struct LibraryClient<'a> {
    http: &'a Client,
    base_url: &'a str,
    access_token: String,
}

impl<'a> LibraryClient<'a> {
    pub(crate) fn new(http: &'a Client, base_url: &'a str, access_token: String) -> Self {
        Self {
            http,
            base_url,
            access_token,
        }
    }

    /// Get the full catalog.
    pub async fn get_tracks(&self) -> Result<Vec<Track>> {
        let url = format!("{}/tracks", self.base_url);
        debug!(url = %url, "Fetching catalog");

        let response = execute(self.http.get(&url).bearer_auth(&self.access_token)).await?;
        let tracks: Vec<Track> = parse_json(response, "tracks response").await?;

        debug!(tracks = tracks.len(), "Fetched catalog");
        Ok(tracks)
    }

    /// Get the user's favorite tracks.
    pub async fn get_favorites(&self) -> Result<Vec<Track>> {
        let url = format!("{}/favorites", self.base_url);
        debug!(url = %url, "Fetching favorites");

        let response = execute(self.http.get(&url).bearer_auth(&self.access_token)).await?;
        let favorites: Vec<Track> = parse_json(response, "favorites response").await?;

        debug!(favorites = favorites.len(), "Fetched favorites");
        Ok(favorites)
    }

    /// Mark a track as favorite.
    pub async fn add_favorite(&self, track_id: &TrackId) -> Result<()> {
        let url = format!("{}/favorites/{}", self.base_url, track_id);
        debug!(url = %url, track_id = %track_id, "Adding favorite");

        execute(self.http.post(&url).bearer_auth(&self.access_token)).await?;
        Ok(())
    }

    /// Remove a track from favorites.
    pub async fn remove_favorite(&self, track_id: &TrackId) -> Result<()> {
        let url = format!("{}/favorites/{}", self.base_url, track_id);
        debug!(url = %url, track_id = %track_id, "Removing favorite");

        execute(self.http.delete(&url).bearer_auth(&self.access_token)).await?;
        Ok(())
    }

    /// Get the user's playlists.
    pub async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        let url = format!("{}/playlists", self.base_url);
        debug!(url = %url, "Fetching playlists");

        let response = execute(self.http.get(&url).bearer_auth(&self.access_token)).await?;
        let playlists: Vec<Playlist> = parse_json(response, "playlists response").await?;

        debug!(playlists = playlists.len(), "Fetched playlists");
        Ok(playlists)
    }

    /// Create an empty playlist.
    ///
    /// The server does not return the new id; re-fetch playlists to find it.
    pub async fn create_playlist(&self, name: &str) -> Result<()> {
        let url = format!("{}/playlists", self.base_url);
        debug!(url = %url, name = %name, "Creating playlist");

        execute(
            self.http
                .post(&url)
                .bearer_auth(&self.access_token)
                .json(&CreatePlaylistRequest { name }),
        )
        .await?;

        info!(name = %name, "Playlist created");
        Ok(())
    }

    /// Append a track to a playlist.
    pub async fn add_track_to_playlist(
        &self,
        playlist_id: &PlaylistId,
        track_id: &TrackId,
    ) -> Result<()> {
        let url = format!(
            "{}/playlists/{}/add/{}",
            self.base_url, playlist_id, track_id
        );
        debug!(url = %url, playlist_id = %playlist_id, track_id = %track_id, "Adding track to playlist");

        execute(self.http.post(&url).bearer_auth(&self.access_token)).await?;
        Ok(())
    }
}
