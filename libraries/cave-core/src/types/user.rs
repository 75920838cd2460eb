/// User domain types
use crate::types::{Playlist, Track};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Profile of the signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name
    pub name: String,

    /// Account email
    pub email: String,

    /// Date the account was created
    #[serde(default)]
    pub joined_at: Option<NaiveDate>,

    /// Favorite tracks
    #[serde(default)]
    pub favorites: Vec<Track>,

    /// Playlists owned by the account
    #[serde(default)]
    pub playlists: Vec<Playlist>,
}

/// Account creation request
#[derive(Clone, Serialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

impl SignupRequest {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

// Keep the password out of logs
impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_profile() {
        let json = r#"{
            "name": "Ada",
            "email": "ada@example.com",
            "joinedAt": "2024-03-01",
            "favorites": [{"id": 1, "title": "T", "artist": "A", "url": "u"}],
            "playlists": [{"id": 2, "name": "P", "tracks": []}]
        }"#;
        let profile: UserProfile = serde_json::from_str(json).unwrap();

        assert_eq!(profile.joined_at, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(profile.favorites.len(), 1);
        assert_eq!(profile.playlists[0].name, "P");
    }

    #[test]
    fn signup_debug_redacts_password() {
        let request = SignupRequest::new("Ada", "ada@example.com", "hunter2");
        let debug = format!("{:?}", request);
        assert!(!debug.contains("hunter2"));
        assert!(debug.contains("ada@example.com"));
    }
}
