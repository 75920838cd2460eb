//! Cave Player Server Client
//!
//! HTTP client for the Cave Player server API.
//!
//! # Features
//!
//! - **Catalog**: fetch the track list
//! - **Favorites**: list, add, remove
//! - **Playlists**: list, create, add tracks
//! - **Account**: signup, existence check, profile
//! - **Credentials**: file-backed bearer token store
//!
//! [`CaveServerClient`] implements [`cave_core::LibraryService`], so it can be
//! handed directly to the player controller.
//!
//! # Example
//!
//! ```ignore
//! use cave_core::{CredentialStore, LibraryService};
//! use cave_server_client::{CaveServerClient, ClientConfig, FileCredentialStore};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let credentials = Arc::new(FileCredentialStore::new("cave-credentials.json"));
//!     let client = CaveServerClient::new(ClientConfig::new("http://localhost:8080"), credentials)?;
//!
//!     let favorites = client.fetch_favorites().await?;
//!     println!("{} favorites", favorites.len());
//!
//!     Ok(())
//! }
//! ```

mod auth;
mod client;
mod credentials;
mod error;
mod library;
mod service;
mod types;

// Re-export main types
pub use client::CaveServerClient;
pub use credentials::FileCredentialStore;
pub use error::{Result, ServerClientError};
pub use types::{ClientConfig, DEFAULT_TIMEOUT};

// Re-export sub-clients for direct use if needed
pub use auth::AuthClient;
pub use library::LibraryClient;
