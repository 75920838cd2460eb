//! Property-based tests for navigation
//!
//! Uses proptest to verify ordering invariants across random catalogs and
//! operation sequences.

use async_trait::async_trait;
use cave_core::{
    CoreError, LibraryService, MemoryCredentialStore, Playlist, PlaylistId, SignupRequest, Track,
    TrackId, UserProfile,
};
use cave_playback::{Catalog, MemoryEngine, PlaybackConfig, PlayerController};
use proptest::prelude::*;
use std::collections::VecDeque;
use std::sync::Arc;

// ===== Helpers =====

/// Library that is never reached by navigation
struct OfflineLibrary;

#[async_trait]
impl LibraryService for OfflineLibrary {
    async fn fetch_tracks(&self) -> cave_core::Result<Vec<Track>> {
        Err(CoreError::network("offline"))
    }
    async fn fetch_favorites(&self) -> cave_core::Result<Vec<Track>> {
        Err(CoreError::network("offline"))
    }
    async fn add_favorite(&self, _: &TrackId) -> cave_core::Result<()> {
        Err(CoreError::network("offline"))
    }
    async fn remove_favorite(&self, _: &TrackId) -> cave_core::Result<()> {
        Err(CoreError::network("offline"))
    }
    async fn fetch_playlists(&self) -> cave_core::Result<Vec<Playlist>> {
        Err(CoreError::network("offline"))
    }
    async fn create_playlist(&self, _: &str) -> cave_core::Result<()> {
        Err(CoreError::network("offline"))
    }
    async fn add_track_to_playlist(&self, _: &PlaylistId, _: &TrackId) -> cave_core::Result<()> {
        Err(CoreError::network("offline"))
    }
    async fn fetch_profile(&self) -> cave_core::Result<UserProfile> {
        Err(CoreError::network("offline"))
    }
    async fn check_user(&self, _: &str) -> cave_core::Result<bool> {
        Err(CoreError::network("offline"))
    }
    async fn signup(&self, _: &SignupRequest) -> cave_core::Result<String> {
        Err(CoreError::network("offline"))
    }
}

fn catalog_of(len: usize) -> Vec<Track> {
    (0..len)
        .map(|i| Track::new(format!("t{}", i), format!("Track {}", i), "Artist", format!("/m/{}.mp3", i)))
        .collect()
}

fn player_with(tracks: Vec<Track>) -> PlayerController {
    let mut player = PlayerController::new(
        Box::new(MemoryEngine::new()),
        Arc::new(OfflineLibrary),
        Arc::new(MemoryCredentialStore::new()),
        PlaybackConfig::default(),
    );
    player.set_catalog(tracks).unwrap();
    player
}

#[derive(Debug, Clone)]
enum QueueOp {
    Enqueue(usize),
    Advance,
}

fn queue_op(len: usize) -> impl Strategy<Value = QueueOp> {
    prop_oneof![
        (0..len).prop_map(QueueOp::Enqueue),
        Just(QueueOp::Advance),
    ]
}

// ===== Property Tests =====

proptest! {
    /// Property: Without queue or shuffle, next is (i + 1) mod len
    #[test]
    fn next_is_cyclic(len in 1usize..40, start in 0usize..40) {
        let start = start % len;
        let mut player = player_with(catalog_of(len));
        player.select_index(start).unwrap();

        player.advance_next().unwrap();

        prop_assert_eq!(player.current_index(), Some((start + 1) % len));
    }

    /// Property: Previous then next returns to the same track
    #[test]
    fn previous_then_next_is_identity(len in 1usize..40, start in 0usize..40) {
        let start = start % len;
        let mut player = player_with(catalog_of(len));
        player.select_index(start).unwrap();
        let original = player.current_track().cloned();

        player.advance_previous().unwrap();
        player.advance_next().unwrap();

        prop_assert_eq!(player.current_index(), Some(start));
        prop_assert_eq!(player.current_track().cloned(), original);
    }

    /// Property: len consecutive nexts visit every track and return home
    #[test]
    fn full_cycle_visits_every_track(len in 1usize..25) {
        let mut player = player_with(catalog_of(len));
        let mut seen = Vec::new();

        for _ in 0..len {
            player.advance_next().unwrap();
            seen.push(player.current_index().unwrap());
        }

        seen.sort_unstable();
        prop_assert_eq!(seen, (0..len).collect::<Vec<_>>());
    }

    /// Property: Queued tracks come out in insertion order
    #[test]
    fn queue_is_fifo(picks in prop::collection::vec(0usize..10, 1..20)) {
        let tracks = catalog_of(10);
        let mut player = player_with(tracks.clone());

        for &i in &picks {
            player.enqueue(tracks[i].clone());
        }

        for &i in &picks {
            player.advance_next().unwrap();
            prop_assert_eq!(&player.current_track().unwrap().id, &tracks[i].id);
            prop_assert_eq!(player.current_index(), Some(i));
        }
        prop_assert!(player.queue().is_empty());
    }

    /// Property: Interleaved enqueue/next matches a FIFO model, falling back
    /// to catalog order whenever the queue runs dry
    #[test]
    fn interleaved_queue_matches_model(
        len in 1usize..8,
        ops in prop::collection::vec(queue_op(8), 1..40),
    ) {
        let tracks = catalog_of(len);
        let mut player = player_with(tracks.clone());
        let mut queued: VecDeque<usize> = VecDeque::new();
        let mut index = player.current_index();

        for op in ops {
            match op {
                QueueOp::Enqueue(i) => {
                    let i = i % len;
                    player.enqueue(tracks[i].clone());
                    queued.push_back(i);
                }
                QueueOp::Advance => {
                    player.advance_next().unwrap();
                    let expected = queued
                        .pop_front()
                        .unwrap_or_else(|| index.map_or(0, |i| (i + 1) % len));
                    index = Some(expected);

                    prop_assert_eq!(&player.current_track().unwrap().id, &tracks[expected].id);
                    prop_assert_eq!(player.current_index(), Some(expected));
                }
            }
            prop_assert_eq!(player.queue().len(), queued.len());
        }
    }

    /// Property: Shuffle always lands inside the catalog
    #[test]
    fn shuffle_index_in_range(len in 1usize..40, steps in 1usize..20) {
        let mut player = player_with(catalog_of(len));
        player.toggle_shuffle();

        for _ in 0..steps {
            player.advance_next().unwrap();
            prop_assert!(player.current_index().is_some_and(|i| i < len));
            player.advance_previous().unwrap();
            prop_assert!(player.current_index().is_some_and(|i| i < len));
        }
    }

    /// Property: Seek never leaves [0, duration]
    #[test]
    fn seek_stays_within_track(duration in 1.0f64..3600.0, percent in -500.0f64..500.0) {
        let mut player = player_with(catalog_of(1));
        player.handle_engine_event(cave_playback::EngineEvent::DurationChange(duration)).unwrap();

        player.seek(percent).unwrap();

        prop_assert!(player.current_time() >= 0.0);
        prop_assert!(player.current_time() <= duration);
        prop_assert!((0.0..=100.0).contains(&player.progress_percent()));
    }

    /// Property: Volume stays in [0, 1] for any finite input
    #[test]
    fn volume_clamped(level in -10.0f64..10.0) {
        let mut player = player_with(Vec::new());

        player.set_volume(level).unwrap();

        prop_assert!((0.0..=1.0).contains(&player.volume()));
    }

    /// Property: Catalog previous is the inverse of next
    #[test]
    fn catalog_previous_inverts_next(len in 1usize..100, start in 0usize..100) {
        let catalog = Catalog::new(catalog_of(len));
        let start = start % len;

        let next = catalog.next_index(Some(start));

        prop_assert_eq!(catalog.previous_index(next), Some(start));
    }
}
