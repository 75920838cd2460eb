//! Cave Player - Playback Control
//!
//! Platform-agnostic player controller for Cave Player.
//!
//! This crate provides:
//! - Track selection with play/pause intent
//! - Manual FIFO queue, consulted before catalog order
//! - Shuffle (random catalog index) and repeat (loop current track)
//! - Seek by percentage, volume with mute
//! - Favorites and playlist synchronization through [`LibraryService`]
//!
//! # Architecture
//!
//! `cave-playback` never talks to an audio device or the network:
//! - Audio output is a [`PlaybackEngine`] implementation supplied by the host
//! - Remote state comes from a [`LibraryService`] implementation
//! - The bearer credential comes from a [`CredentialStore`]
//!
//! The UI layer reads [`PlayerState`] snapshots and drains
//! [`PlaybackEvent`]s after each call.
//!
//! [`LibraryService`]: cave_core::LibraryService
//! [`CredentialStore`]: cave_core::CredentialStore
//!
//! # Example
//!
//! ```rust,no_run
//! use cave_core::{LibraryService, MemoryCredentialStore, Track};
//! use cave_playback::{MemoryEngine, PlaybackConfig, PlayerController};
//! use std::sync::Arc;
//!
//! # fn run(service: Arc<dyn LibraryService>) -> cave_playback::Result<()> {
//! let engine = MemoryEngine::new();
//! let mut player = PlayerController::new(
//!     Box::new(engine.clone()),
//!     service,
//!     Arc::new(MemoryCredentialStore::new()),
//!     PlaybackConfig::default(),
//! );
//!
//! player.set_catalog(vec![
//!     Track::new("1", "Intro", "Band", "https://cdn.example.com/1.mp3"),
//!     Track::new("2", "Outro", "Band", "https://cdn.example.com/2.mp3"),
//! ])?;
//!
//! player.toggle_play()?;
//! player.advance_next()?;
//! assert_eq!(player.current_index(), Some(1));
//!
//! for event in player.drain_events() {
//!     println!("{:?}", event);
//! }
//! # Ok(())
//! # }
//! ```

mod catalog;
mod controller;
pub mod engine;
mod error;
pub mod events;
mod queue;
mod shuffle;
pub mod types;
mod volume;

// Public exports
pub use catalog::Catalog;
pub use controller::PlayerController;
pub use engine::{EngineEvent, EngineSubscription, MemoryEngine, PlaybackEngine};
pub use error::{ErrorCategory, PlaybackError, Result};
pub use events::PlaybackEvent;
pub use types::{format_time, PlaybackConfig, PlaybackPhase, PlayerState};
pub use volume::Volume;
