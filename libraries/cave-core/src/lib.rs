//! Cave Player Core
//!
//! Platform-agnostic core types, service traits, and error handling for Cave Player.
//!
//! This crate provides the foundational building blocks shared by the playback
//! controller, the HTTP client, and the command-line front end.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `UserProfile`
//! - **Core Traits**: `LibraryService` (remote catalog, favorites, playlists)
//!   and `CredentialStore` (persisted bearer token)
//! - **Token Claims**: unverified decoding of the bearer token payload
//! - **Error Handling**: Unified `CoreError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use cave_core::types::{Playlist, Track};
//!
//! let track = Track::new("1", "Blue in Green", "Miles Davis", "https://cdn.example.com/1.mp3");
//! let playlist = Playlist::new("7", "Late Night").with_tracks(vec![track.clone()]);
//!
//! assert!(playlist.name_matches("late night"));
//! assert!(playlist.contains(&track.id));
//! ```

#![forbid(unsafe_code)]

pub mod credentials;
pub mod error;
pub mod service;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use credentials::{CredentialStore, MemoryCredentialStore, TOKEN_KEY};
pub use error::{CoreError, Result};
pub use service::LibraryService;
pub use token::TokenClaims;
pub use types::{Playlist, PlaylistId, SignupRequest, Track, TrackId, UserProfile};
