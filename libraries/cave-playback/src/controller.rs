//! Player controller - core orchestration
//!
//! Owns the playback state, the manual queue, and the cached remote state
//! (catalog, favorites, playlists). Pushes intent to the engine binding and
//! reacts to its events.

use crate::{
    catalog::Catalog,
    engine::{EngineEvent, EngineSubscription, PlaybackEngine},
    error::{PlaybackError, Result},
    events::PlaybackEvent,
    queue::Queue,
    shuffle,
    types::{progress_percent, PlaybackConfig, PlaybackPhase, PlayerState},
    volume::Volume,
};
use cave_core::{CoreError, CredentialStore, LibraryService, Playlist, PlaylistId, Track, TrackId};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Central playback control
///
/// Orchestrates:
/// - Track selection and play/pause intent
/// - Manual FIFO queue, consulted before catalog order
/// - Shuffle (random catalog index) and repeat (loop current track)
/// - Seek and volume, mirrored to the engine
/// - Favorites and playlists, synchronized through the library service
///
/// Every method runs to completion before the next one starts (`&mut self`);
/// the only suspension points are library-service calls.
pub struct PlayerController {
    // State
    phase: PlaybackPhase,
    current_track: Option<Track>,
    current_index: Option<usize>,
    is_playing: bool,

    // Settings
    is_shuffle: bool,
    is_repeat: bool,
    volume: Volume,

    // Position, mirrored from engine events
    current_time: f64,
    duration: f64,

    // Navigation
    catalog: Catalog,
    queue: Queue,

    // Remote state, replaced wholesale on every fetch
    favorites: Vec<Track>,
    playlists: Vec<Playlist>,

    // Collaborators
    engine: Box<dyn PlaybackEngine>,
    subscription: Option<EngineSubscription>,
    service: Arc<dyn LibraryService>,
    credentials: Arc<dyn CredentialStore>,

    // Event queue for UI synchronization
    pending_events: Vec<PlaybackEvent>,
}

impl PlayerController {
    /// Create a controller bound to `engine`
    ///
    /// Subscribes to the engine for the lifetime of the controller; the
    /// subscription is released by [`shutdown`](Self::shutdown) or on drop.
    pub fn new(
        mut engine: Box<dyn PlaybackEngine>,
        service: Arc<dyn LibraryService>,
        credentials: Arc<dyn CredentialStore>,
        config: PlaybackConfig,
    ) -> Self {
        let subscription = EngineSubscription::attach(engine.as_mut());
        let volume = Volume::new(config.volume);
        engine.set_volume(volume.effective());

        Self {
            phase: PlaybackPhase::Idle,
            current_track: None,
            current_index: None,
            is_playing: false,
            is_shuffle: config.shuffle,
            is_repeat: config.repeat,
            volume,
            current_time: 0.0,
            duration: 0.0,
            catalog: Catalog::default(),
            queue: Queue::new(),
            favorites: Vec::new(),
            playlists: Vec::new(),
            engine,
            subscription: Some(subscription),
            service,
            credentials,
            pending_events: Vec::new(),
        }
    }

    // ===== Session =====

    /// Bootstrap the dashboard
    ///
    /// Reads the credential, confirms the account exists, loads the catalog
    /// (cueing the first track), then refreshes favorites and playlists.
    /// Favorites/playlist failures are reported but do not fail the bootstrap.
    pub async fn initialize(&mut self) -> Result<()> {
        let claims = match self.credentials.claims() {
            Ok(claims) => claims,
            Err(e) => return Err(self.report_service_error("read credentials", e)),
        };

        let Some(email) = claims.email() else {
            warn!("Credential has no subject claim");
            return Err(self.report_service_error(
                "read credentials",
                CoreError::InvalidToken("token has no subject".into()),
            ));
        };

        let service = Arc::clone(&self.service);
        let exists = match service.check_user(&email).await {
            Ok(exists) => exists,
            Err(e) => return Err(self.report_service_error("verify account", e)),
        };

        if !exists {
            warn!(email = %email, "Account not found on server");
            self.emit_error("User not found in database".to_string());
            return Err(PlaybackError::UserNotFound(email));
        }

        info!(email = %email, "Account verified");

        self.load_catalog().await?;

        if let Err(e) = self.refresh_favorites().await {
            debug!(error = %e, "Continuing without favorites");
        }
        if let Err(e) = self.refresh_playlists().await {
            debug!(error = %e, "Continuing without playlists");
        }

        Ok(())
    }

    /// Clear the credential and ask the UI to show the login screen
    pub fn logout(&mut self) -> Result<()> {
        self.credentials.clear()?;
        info!("Logged out");
        self.pending_events.push(PlaybackEvent::AuthRequired);
        Ok(())
    }

    // ===== Catalog =====

    /// Fetch the catalog from the library service and install it
    pub async fn load_catalog(&mut self) -> Result<()> {
        self.ensure_active()?;

        let service = Arc::clone(&self.service);
        match service.fetch_tracks().await {
            Ok(tracks) => self.set_catalog(tracks),
            Err(e) => Err(self.report_service_error("load tracks", e)),
        }
    }

    /// Replace the catalog
    ///
    /// The current index is recomputed by lookup. With nothing selected yet,
    /// the first track is cued (loaded, not played).
    pub fn set_catalog(&mut self, tracks: Vec<Track>) -> Result<()> {
        self.ensure_active()?;

        self.catalog = Catalog::new(tracks);
        info!(tracks = self.catalog.len(), "Catalog loaded");
        self.pending_events.push(PlaybackEvent::CatalogLoaded {
            count: self.catalog.len(),
        });

        match self.current_track.as_ref() {
            Some(track) => {
                self.current_index = self.catalog.index_of(&track.id);
            }
            None => {
                if let Some(first) = self.catalog.get(0).cloned() {
                    self.cue_track(first, Some(0));
                }
            }
        }
        Ok(())
    }

    /// Catalog in its navigation order
    pub fn catalog(&self) -> &[Track] {
        self.catalog.tracks()
    }

    /// Catalog tracks whose title or artist contains `query`
    pub fn filtered_catalog(&self, query: &str) -> Vec<&Track> {
        self.catalog.filter(query)
    }

    // ===== Playback Control =====

    /// Make `track` current and start playing it
    ///
    /// `explicit_index` is trusted only when it points at the same track in
    /// the catalog; otherwise the index is looked up by id, and a track that
    /// is not in the catalog gets no index.
    pub fn select_track(&mut self, track: Track, explicit_index: Option<usize>) -> Result<()> {
        self.ensure_active()?;

        let index = explicit_index
            .filter(|&i| self.catalog.get(i).is_some_and(|t| t.id == track.id))
            .or_else(|| self.catalog.index_of(&track.id));

        self.start_track(track, index)
    }

    /// Select the catalog track at `index`
    pub fn select_index(&mut self, index: usize) -> Result<()> {
        let track = self
            .catalog
            .get(index)
            .cloned()
            .ok_or_else(|| PlaybackError::Validation(format!("no catalog track at {}", index)))?;
        self.select_track(track, Some(index))
    }

    /// Flip the playing intent
    ///
    /// No-op without a current track.
    pub fn toggle_play(&mut self) -> Result<()> {
        self.ensure_active()?;

        if self.current_track.is_none() {
            debug!("toggle_play ignored: no track selected");
            return Ok(());
        }

        if self.is_playing {
            self.engine.pause();
            self.is_playing = false;
            self.set_phase(PlaybackPhase::Paused);
            Ok(())
        } else {
            if self.phase == PlaybackPhase::Ended {
                self.rewind()?;
            }
            self.start_engine()
        }
    }

    /// Skip to the next track
    ///
    /// Priority: front of the manual queue, then a random catalog index when
    /// shuffling, then the following catalog index (wrapping to 0).
    /// No-op when both queue and catalog are empty.
    pub fn advance_next(&mut self) -> Result<()> {
        self.ensure_active()?;

        if let Some(track) = self.queue.pop_front() {
            let index = self.catalog.index_of(&track.id);
            debug!(track_id = %track.id, index = ?index, "Playing from manual queue");
            self.emit_queue_changed();
            return self.start_track(track, index);
        }

        let next = if self.is_shuffle {
            shuffle::random_index(self.catalog.len())
        } else {
            self.catalog.next_index(self.current_index)
        };

        self.play_catalog_index(next)
    }

    /// Go back one track
    ///
    /// Ignores the manual queue: a random catalog index when shuffling,
    /// otherwise the preceding catalog index (wrapping to the last).
    pub fn advance_previous(&mut self) -> Result<()> {
        self.ensure_active()?;

        let previous = if self.is_shuffle {
            shuffle::random_index(self.catalog.len())
        } else {
            self.catalog.previous_index(self.current_index)
        };

        self.play_catalog_index(previous)
    }

    /// Handle the end of the current track
    ///
    /// With repeat on, rewinds and resumes the same track; otherwise advances.
    pub fn on_engine_ended(&mut self) -> Result<()> {
        self.ensure_active()?;

        let Some(track_id) = self.current_track.as_ref().map(|t| t.id.to_string()) else {
            return Ok(());
        };

        self.set_phase(PlaybackPhase::Ended);
        self.pending_events
            .push(PlaybackEvent::TrackFinished { track_id });

        if self.is_repeat {
            self.rewind()?;
            self.emit_position_update();
            return self.start_engine();
        }

        self.advance_next()?;

        // Nothing to advance to: stay on the finished track
        if self.phase == PlaybackPhase::Ended {
            self.is_playing = false;
        }
        Ok(())
    }

    // ===== Shuffle & Repeat =====

    /// Toggle shuffle
    pub fn toggle_shuffle(&mut self) {
        self.is_shuffle = !self.is_shuffle;
        self.pending_events.push(PlaybackEvent::ShuffleChanged {
            enabled: self.is_shuffle,
        });
    }

    /// Toggle repeat (loop current track)
    pub fn toggle_repeat(&mut self) {
        self.is_repeat = !self.is_repeat;
        self.pending_events.push(PlaybackEvent::RepeatChanged {
            enabled: self.is_repeat,
        });
    }

    pub fn is_shuffle(&self) -> bool {
        self.is_shuffle
    }

    pub fn is_repeat(&self) -> bool {
        self.is_repeat
    }

    // ===== Queue Management =====

    /// Append a track to the manual queue
    pub fn enqueue(&mut self, track: Track) {
        debug!(track_id = %track.id, "Enqueued");
        self.queue.enqueue(track);
        self.emit_queue_changed();
    }

    /// Remove a queued track by position
    pub fn remove_from_queue(&mut self, index: usize) -> Result<Track> {
        let track = self
            .queue
            .remove(index)
            .ok_or_else(|| PlaybackError::Validation(format!("no queued track at {}", index)))?;
        self.emit_queue_changed();
        Ok(track)
    }

    /// Clear the manual queue
    pub fn clear_queue(&mut self) {
        self.queue.clear();
        self.emit_queue_changed();
    }

    /// Queued tracks, next first
    pub fn queue(&self) -> Vec<&Track> {
        self.queue.get_all()
    }

    // ===== Seek =====

    /// Seek by progress percentage (0-100)
    ///
    /// The position is written to the engine and reflected in the displayed
    /// progress immediately, before the engine confirms.
    pub fn seek(&mut self, percent: f64) -> Result<()> {
        if !percent.is_finite() {
            return Err(PlaybackError::Validation(format!(
                "seek percentage must be finite, got {}",
                percent
            )));
        }
        let position = percent.clamp(0.0, 100.0) / 100.0 * self.duration;
        self.seek_to_seconds(position)
    }

    /// Seek to an absolute position, clamped to `[0, duration]`
    pub fn seek_to_seconds(&mut self, seconds: f64) -> Result<()> {
        self.ensure_active()?;

        if self.current_track.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        if !seconds.is_finite() {
            return Err(PlaybackError::Validation(format!(
                "seek position must be finite, got {}",
                seconds
            )));
        }

        let mut position = seconds.max(0.0);
        if self.duration > 0.0 {
            position = position.min(self.duration);
        }

        self.engine.seek_to(position)?;
        self.current_time = position;
        self.emit_position_update();
        Ok(())
    }

    // ===== Volume =====

    /// Set volume, clamped to 0.0-1.0
    pub fn set_volume(&mut self, level: f64) -> Result<()> {
        self.ensure_active()?;

        if !self.volume.set_level(level) {
            return Err(PlaybackError::Validation(format!(
                "volume must be finite, got {}",
                level
            )));
        }
        self.apply_volume();
        Ok(())
    }

    /// Current volume level (0.0-1.0)
    pub fn volume(&self) -> f64 {
        self.volume.level()
    }

    /// Toggle mute state
    ///
    /// After shutdown only the stored state changes.
    pub fn toggle_mute(&mut self) {
        self.volume.toggle_mute();
        self.apply_volume();
    }

    pub fn is_muted(&self) -> bool {
        self.volume.is_muted()
    }

    // ===== Favorites =====

    /// Toggle the favorite status of the current track
    pub async fn toggle_favorite(&mut self) -> Result<()> {
        let track_id = self
            .current_track
            .as_ref()
            .map(|t| t.id.clone())
            .ok_or(PlaybackError::NoTrackLoaded)?;
        self.toggle_favorite_track(&track_id).await
    }

    /// Toggle the favorite status of any track
    ///
    /// Issues add or remove depending on cached membership, then replaces the
    /// cached favorites with a fresh fetch. The cache is never patched
    /// locally; on failure it keeps its previous contents.
    pub async fn toggle_favorite_track(&mut self, track_id: &TrackId) -> Result<()> {
        self.ensure_authenticated()?;

        let service = Arc::clone(&self.service);
        let result = if self.is_favorite(track_id) {
            debug!(track_id = %track_id, "Removing favorite");
            service.remove_favorite(track_id).await
        } else {
            debug!(track_id = %track_id, "Adding favorite");
            service.add_favorite(track_id).await
        };

        if let Err(e) = result {
            return Err(self.report_service_error("update favorites", e));
        }

        self.refresh_favorites().await
    }

    /// Re-fetch favorites; the latest response wins
    pub async fn refresh_favorites(&mut self) -> Result<()> {
        let service = Arc::clone(&self.service);
        match service.fetch_favorites().await {
            Ok(favorites) => {
                self.favorites = favorites;
                self.pending_events.push(PlaybackEvent::FavoritesChanged {
                    count: self.favorites.len(),
                });
                Ok(())
            }
            Err(e) => Err(self.report_service_error("load favorites", e)),
        }
    }

    /// Cached favorites
    pub fn favorites(&self) -> &[Track] {
        &self.favorites
    }

    /// Whether `track_id` is in the cached favorites
    pub fn is_favorite(&self, track_id: &TrackId) -> bool {
        self.favorites.iter().any(|t| &t.id == track_id)
    }

    /// Whether the current track is a favorite
    pub fn is_current_favorite(&self) -> bool {
        self.current_track
            .as_ref()
            .is_some_and(|t| self.is_favorite(&t.id))
    }

    // ===== Playlists =====

    /// Add the current track to the playlist named `name`
    ///
    /// The playlist is looked up case-insensitively and created first if it
    /// does not exist. Any failing step aborts the rest. A playlist created
    /// before a failed add is reused when the call is retried.
    pub async fn add_current_track_to_playlist(&mut self, name: &str) -> Result<PlaylistId> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlaybackError::Validation("playlist name is empty".into()));
        }

        let track_id = self
            .current_track
            .as_ref()
            .map(|t| t.id.clone())
            .ok_or(PlaybackError::NoTrackLoaded)?;

        self.ensure_authenticated()?;

        let service = Arc::clone(&self.service);

        let playlist_id = match Playlist::find_by_name(&self.playlists, name) {
            Some(playlist) => playlist.id.clone(),
            None => {
                info!(playlist = %name, "Creating playlist");
                if let Err(e) = service.create_playlist(name).await {
                    return Err(self.report_service_error("create playlist", e));
                }
                self.refresh_playlists().await?;

                match Playlist::find_by_name(&self.playlists, name) {
                    Some(playlist) => playlist.id.clone(),
                    None => {
                        return Err(self.report_service_error(
                            "create playlist",
                            CoreError::not_found("Playlist", name),
                        ))
                    }
                }
            }
        };

        if let Err(e) = service.add_track_to_playlist(&playlist_id, &track_id).await {
            return Err(self.report_service_error("add track to playlist", e));
        }

        info!(playlist_id = %playlist_id, track_id = %track_id, "Track added to playlist");
        self.refresh_playlists().await?;

        Ok(playlist_id)
    }

    /// Re-fetch playlists; the latest response wins
    pub async fn refresh_playlists(&mut self) -> Result<()> {
        let service = Arc::clone(&self.service);
        match service.fetch_playlists().await {
            Ok(playlists) => {
                self.playlists = playlists;
                self.pending_events.push(PlaybackEvent::PlaylistsChanged {
                    count: self.playlists.len(),
                });
                Ok(())
            }
            Err(e) => Err(self.report_service_error("load playlists", e)),
        }
    }

    /// Cached playlists
    pub fn playlists(&self) -> &[Playlist] {
        &self.playlists
    }

    // ===== Engine Events =====

    /// Apply one engine event
    pub fn handle_engine_event(&mut self, event: EngineEvent) -> Result<()> {
        match event {
            EngineEvent::TimeUpdate(seconds) => {
                if seconds.is_finite() {
                    let mut position = seconds.max(0.0);
                    if self.duration > 0.0 {
                        position = position.min(self.duration);
                    }
                    self.current_time = position;
                    self.emit_position_update();
                }
                Ok(())
            }
            EngineEvent::DurationChange(seconds) => {
                self.duration = if seconds.is_finite() && seconds > 0.0 {
                    seconds
                } else {
                    0.0
                };
                if self.duration > 0.0 {
                    self.current_time = self.current_time.min(self.duration);
                }
                self.emit_position_update();
                Ok(())
            }
            EngineEvent::Ended => self.on_engine_ended(),
        }
    }

    /// Dispatch every event the engine delivered since the last call
    ///
    /// Returns the number of events handled. Failures are already reported
    /// as `Error` events and only logged here.
    pub fn pump_engine_events(&mut self) -> usize {
        let events = match self.subscription.as_mut() {
            Some(subscription) => subscription.drain(),
            None => return 0,
        };

        let count = events.len();
        for event in events {
            if let Err(e) = self.handle_engine_event(event) {
                warn!(error = %e, event = ?event, "Engine event handling failed");
            }
        }
        count
    }

    // ===== State Queries =====

    /// Snapshot for rendering
    pub fn state(&self) -> PlayerState {
        PlayerState {
            phase: self.phase,
            current_track: self.current_track.clone(),
            current_index: self.current_index,
            is_playing: self.is_playing,
            is_shuffle: self.is_shuffle,
            is_repeat: self.is_repeat,
            volume: self.volume.level(),
            is_muted: self.volume.is_muted(),
            current_time: self.current_time,
            duration: self.duration,
            queue_length: self.queue.len(),
            is_favorite: self.is_current_favorite(),
        }
    }

    pub fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.current_track.as_ref()
    }

    /// Catalog position of the current track; `None` outside the catalog
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration of the current track (0 when unknown)
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Progress in percent (0-100), 0 when the duration is unknown
    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.current_time, self.duration)
    }

    // ===== Teardown =====

    /// Pause and release the engine and drop the engine subscription
    ///
    /// Idempotent; also runs on drop.
    pub fn shutdown(&mut self) {
        let Some(subscription) = self.subscription.take() else {
            return;
        };

        self.engine.pause();
        subscription.detach(self.engine.as_mut());
        self.engine.release();
        self.is_playing = false;
        info!("Player shut down");
    }

    /// Whether [`shutdown`](Self::shutdown) has run
    pub fn is_shut_down(&self) -> bool {
        self.subscription.is_none()
    }

    // ===== Events =====

    /// Drain all pending events
    ///
    /// Returns all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<PlaybackEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn ensure_active(&self) -> Result<()> {
        if self.is_shut_down() {
            Err(PlaybackError::ShutDown)
        } else {
            Ok(())
        }
    }

    /// Fail fast, without any request, when no credential is stored
    fn ensure_authenticated(&mut self) -> Result<()> {
        match self.credentials.require() {
            Ok(_) => Ok(()),
            Err(e) => Err(self.report_service_error("authenticate", e)),
        }
    }

    fn play_catalog_index(&mut self, index: Option<usize>) -> Result<()> {
        let Some(index) = index else {
            debug!("Catalog is empty, nothing to advance to");
            return Ok(());
        };
        let Some(track) = self.catalog.get(index).cloned() else {
            return Ok(());
        };
        self.start_track(track, Some(index))
    }

    /// Make `track` current without starting playback
    fn cue_track(&mut self, track: Track, index: Option<usize>) {
        if self.is_shut_down() {
            return;
        }

        let src = track.audio_src.clone();
        self.install_track(track, index);
        self.is_playing = false;

        match self.engine.load(&src) {
            Ok(()) => self.set_phase(PlaybackPhase::Paused),
            Err(e) => {
                warn!(error = %e, "Failed to cue track");
                self.emit_error(format!("Failed to load track: {}", e));
            }
        }
    }

    /// Make `track` current, load it, and start playback
    fn start_track(&mut self, track: Track, index: Option<usize>) -> Result<()> {
        let src = track.audio_src.clone();
        self.install_track(track, index);
        self.is_playing = true;
        self.set_phase(PlaybackPhase::Loading);

        if let Err(e) = self.engine.load(&src) {
            warn!(error = %e, src = %src, "Engine refused source");
            self.is_playing = false;
            self.set_phase(PlaybackPhase::Paused);
            self.emit_error(format!("Failed to load track: {}", e));
            return Err(e);
        }

        self.start_engine()
    }

    fn install_track(&mut self, track: Track, index: Option<usize>) {
        let previous_track_id = self.current_track.as_ref().map(|t| t.id.to_string());

        self.current_time = 0.0;
        self.duration = track.duration.filter(|d| d.is_finite() && *d > 0.0).unwrap_or(0.0);
        self.current_index = index;

        info!(track_id = %track.id, title = %track.title, index = ?index, "Track selected");
        self.pending_events.push(PlaybackEvent::TrackChanged {
            track_id: track.id.to_string(),
            previous_track_id,
        });
        self.current_track = Some(track);
    }

    /// Ask the engine to play; a refusal resets the playing intent
    fn start_engine(&mut self) -> Result<()> {
        match self.engine.play() {
            Ok(()) => {
                self.is_playing = true;
                self.set_phase(PlaybackPhase::Playing);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Engine refused to start playback");
                self.is_playing = false;
                self.set_phase(PlaybackPhase::Paused);
                self.emit_error(format!("Failed to play audio: {}", e));
                Err(e)
            }
        }
    }

    /// Seek the engine back to the start of the current track
    ///
    /// A failed seek settles the player in `Paused` so it never reports
    /// playing from the `Ended` phase.
    fn rewind(&mut self) -> Result<()> {
        match self.engine.seek_to(0.0) {
            Ok(()) => {
                self.current_time = 0.0;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Engine refused to rewind");
                self.is_playing = false;
                self.set_phase(PlaybackPhase::Paused);
                self.emit_error(format!("Failed to restart track: {}", e));
                Err(e)
            }
        }
    }

    fn apply_volume(&mut self) {
        if self.is_shut_down() {
            return;
        }

        self.engine.set_volume(self.volume.effective());
        self.pending_events.push(PlaybackEvent::VolumeChanged {
            level: self.volume.level(),
            is_muted: self.volume.is_muted(),
        });
    }

    /// Log a service failure, surface it to the UI, and convert it
    fn report_service_error(&mut self, action: &str, error: CoreError) -> PlaybackError {
        if error.is_auth() {
            warn!(action, error = %error, "Not authenticated");
            self.pending_events.push(PlaybackEvent::AuthRequired);
        } else {
            warn!(action, error = %error, "Library service call failed");
            self.emit_error(format!("Failed to {}: {}", action, error));
        }
        PlaybackError::Service(error)
    }

    fn set_phase(&mut self, phase: PlaybackPhase) {
        if self.phase != phase {
            self.phase = phase;
            self.pending_events
                .push(PlaybackEvent::StateChanged { phase });
        }
    }

    fn emit_queue_changed(&mut self) {
        self.pending_events.push(PlaybackEvent::QueueChanged {
            length: self.queue.len(),
        });
    }

    fn emit_position_update(&mut self) {
        self.pending_events.push(PlaybackEvent::PositionUpdate {
            position_secs: self.current_time,
            duration_secs: self.duration,
        });
    }

    fn emit_error(&mut self, message: String) {
        self.pending_events.push(PlaybackEvent::Error { message });
    }
}

impl Drop for PlayerController {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{EngineCommand, MemoryEngine};
    use async_trait::async_trait;
    use cave_core::{MemoryCredentialStore, SignupRequest, UserProfile};
    use mockall::mock;

    mock! {
        pub Library {}

        #[async_trait]
        impl LibraryService for Library {
            async fn fetch_tracks(&self) -> cave_core::Result<Vec<Track>>;
            async fn fetch_favorites(&self) -> cave_core::Result<Vec<Track>>;
            async fn add_favorite(&self, track_id: &TrackId) -> cave_core::Result<()>;
            async fn remove_favorite(&self, track_id: &TrackId) -> cave_core::Result<()>;
            async fn fetch_playlists(&self) -> cave_core::Result<Vec<Playlist>>;
            async fn create_playlist(&self, name: &str) -> cave_core::Result<()>;
            async fn add_track_to_playlist(
                &self,
                playlist_id: &PlaylistId,
                track_id: &TrackId,
            ) -> cave_core::Result<()>;
            async fn fetch_profile(&self) -> cave_core::Result<UserProfile>;
            async fn check_user(&self, email: &str) -> cave_core::Result<bool>;
            async fn signup(&self, request: &SignupRequest) -> cave_core::Result<String>;
        }
    }

    fn create_test_track(id: &str) -> Track {
        Track::new(id, format!("Track {}", id), "Test Artist", format!("/music/{}.mp3", id))
    }

    fn controller_with(library: MockLibrary, token: Option<&str>) -> (PlayerController, MemoryEngine) {
        let engine = MemoryEngine::new();
        let credentials = match token {
            Some(token) => MemoryCredentialStore::with_token(token),
            None => MemoryCredentialStore::new(),
        };
        let controller = PlayerController::new(
            Box::new(engine.clone()),
            Arc::new(library),
            Arc::new(credentials),
            PlaybackConfig::default(),
        );
        (controller, engine)
    }

    #[test]
    fn create_controller() {
        let (controller, engine) = controller_with(MockLibrary::new(), None);

        assert_eq!(controller.phase(), PlaybackPhase::Idle);
        assert!(controller.current_track().is_none());
        assert!(!controller.is_playing());
        assert_eq!(engine.subscriber_count(), 1);
        assert_eq!(engine.volume(), 1.0);
    }

    #[test]
    fn set_catalog_cues_first_track_without_playing() {
        let (mut controller, engine) = controller_with(MockLibrary::new(), None);

        controller.set_catalog(vec![create_test_track("a"), create_test_track("b")]).unwrap();

        assert_eq!(controller.current_track().unwrap().id.as_str(), "a");
        assert_eq!(controller.current_index(), Some(0));
        assert!(!controller.is_playing());
        assert!(!engine.is_playing());
        assert_eq!(engine.source().as_deref(), Some("/music/a.mp3"));
    }

    #[test]
    fn toggle_play_without_track_is_noop() {
        let (mut controller, engine) = controller_with(MockLibrary::new(), None);

        controller.toggle_play().unwrap();

        assert!(!controller.is_playing());
        assert!(engine.commands().iter().all(|c| *c != EngineCommand::Play));
    }

    #[test]
    fn select_track_ignores_mismatched_explicit_index() {
        let (mut controller, _engine) = controller_with(MockLibrary::new(), None);
        controller.set_catalog(vec![create_test_track("a"), create_test_track("b")]).unwrap();

        controller.select_track(create_test_track("b"), Some(0)).unwrap();

        assert_eq!(controller.current_index(), Some(1));
    }

    #[test]
    fn volume_is_forwarded_and_clamped() {
        let (mut controller, engine) = controller_with(MockLibrary::new(), None);

        controller.set_volume(1.7).unwrap();
        assert_eq!(controller.volume(), 1.0);
        assert_eq!(engine.volume(), 1.0);

        controller.set_volume(0.25).unwrap();
        assert_eq!(engine.volume(), 0.25);

        assert!(controller.set_volume(f64::NAN).is_err());
        assert_eq!(controller.volume(), 0.25);

        controller.toggle_mute();
        assert_eq!(engine.volume(), 0.0);
        assert_eq!(controller.volume(), 0.25);
    }

    #[tokio::test]
    async fn toggle_favorite_adds_then_refetches() {
        let mut library = MockLibrary::new();
        library
            .expect_add_favorite()
            .withf(|id| id.as_str() == "a")
            .times(1)
            .returning(|_| Ok(()));
        library
            .expect_fetch_favorites()
            .times(1)
            .returning(|| Ok(vec![create_test_track("a")]));

        let (mut controller, _engine) = controller_with(library, Some("token"));
        controller.set_catalog(vec![create_test_track("a")]).unwrap();

        controller.toggle_favorite().await.unwrap();

        assert!(controller.is_current_favorite());
        assert!(controller
            .drain_events()
            .contains(&PlaybackEvent::FavoritesChanged { count: 1 }));
    }

    #[tokio::test]
    async fn toggle_favorite_without_credential_sends_nothing() {
        // No expectations: any call on the mock panics
        let (mut controller, _engine) = controller_with(MockLibrary::new(), None);
        controller.set_catalog(vec![create_test_track("a")]).unwrap();
        controller.drain_events();

        let err = controller.toggle_favorite().await.unwrap_err();

        assert_eq!(err.category(), crate::ErrorCategory::Auth);
        assert_eq!(controller.drain_events(), vec![PlaybackEvent::AuthRequired]);
    }

    #[tokio::test]
    async fn failed_favorite_update_keeps_cached_set() {
        let mut library = MockLibrary::new();
        library
            .expect_fetch_favorites()
            .times(1)
            .returning(|| Ok(vec![create_test_track("a")]));
        library
            .expect_remove_favorite()
            .times(1)
            .returning(|_| Err(CoreError::network("connection reset")));

        let (mut controller, _engine) = controller_with(library, Some("token"));
        controller.set_catalog(vec![create_test_track("a")]).unwrap();
        controller.refresh_favorites().await.unwrap();
        controller.drain_events();

        let err = controller.toggle_favorite().await.unwrap_err();

        assert_eq!(err.category(), crate::ErrorCategory::Network);
        assert!(controller.is_current_favorite());
        let events = controller.drain_events();
        assert!(matches!(
            events.as_slice(),
            [PlaybackEvent::Error { message }] if message.contains("update favorites")
        ));
    }

    #[tokio::test]
    async fn playlist_created_when_missing() {
        let mut library = MockLibrary::new();
        let mut fetches = 0;
        library.expect_fetch_playlists().times(2).returning(move || {
            fetches += 1;
            let mut playlist = Playlist::new("p1", "Road Trip");
            if fetches > 1 {
                playlist = playlist.with_tracks(vec![create_test_track("a")]);
            }
            Ok(vec![playlist])
        });
        library
            .expect_create_playlist()
            .withf(|name| name == "Road Trip")
            .times(1)
            .returning(|_| Ok(()));
        library
            .expect_add_track_to_playlist()
            .withf(|playlist, track| playlist.as_str() == "p1" && track.as_str() == "a")
            .times(1)
            .returning(|_, _| Ok(()));

        let (mut controller, _engine) = controller_with(library, Some("token"));
        controller.set_catalog(vec![create_test_track("a")]).unwrap();

        let id = controller
            .add_current_track_to_playlist("  Road Trip ")
            .await
            .unwrap();

        assert_eq!(id.as_str(), "p1");
        assert!(controller.playlists()[0].contains(&TrackId::new("a")));
    }

    #[tokio::test]
    async fn empty_playlist_name_is_rejected_before_any_request() {
        let (mut controller, _engine) = controller_with(MockLibrary::new(), Some("token"));
        controller.set_catalog(vec![create_test_track("a")]).unwrap();

        let err = controller
            .add_current_track_to_playlist("   ")
            .await
            .unwrap_err();

        assert_eq!(err.category(), crate::ErrorCategory::Validation);
    }

    #[test]
    fn shutdown_releases_engine_once() {
        let (mut controller, engine) = controller_with(MockLibrary::new(), None);
        controller.set_catalog(vec![create_test_track("a")]).unwrap();
        controller.toggle_play().unwrap();

        controller.shutdown();
        controller.shutdown();

        assert!(engine.is_released());
        assert!(!engine.is_playing());
        assert_eq!(engine.subscriber_count(), 0);
        assert_eq!(
            engine
                .commands()
                .iter()
                .filter(|c| **c == EngineCommand::Release)
                .count(),
            1
        );
        assert!(matches!(
            controller.advance_next(),
            Err(PlaybackError::ShutDown)
        ));
    }

    #[test]
    fn engine_stays_released_after_shutdown() {
        let (mut controller, engine) = controller_with(MockLibrary::new(), None);
        controller.shutdown();

        assert!(matches!(
            controller.set_catalog(vec![create_test_track("a")]),
            Err(PlaybackError::ShutDown)
        ));
        assert!(matches!(
            controller.set_volume(0.3),
            Err(PlaybackError::ShutDown)
        ));
        controller.toggle_mute();

        assert!(engine.is_released());
        assert!(engine.source().is_none());
        assert_eq!(engine.volume(), 1.0);
        assert_eq!(
            engine.commands(),
            vec![
                EngineCommand::SetVolume(1.0),
                EngineCommand::Pause,
                EngineCommand::Release,
            ]
        );
        assert!(controller.current_track().is_none());
    }

    #[tokio::test]
    async fn load_catalog_after_shutdown_sends_nothing() {
        // No expectations: any service call panics
        let (mut controller, engine) = controller_with(MockLibrary::new(), Some("token"));
        controller.shutdown();

        let err = controller.load_catalog().await.unwrap_err();

        assert!(matches!(err, PlaybackError::ShutDown));
        assert!(engine.is_released());
        assert!(controller.catalog().is_empty());
    }

    #[test]
    fn failed_rewind_on_repeat_settles_paused() {
        let (mut controller, engine) = controller_with(MockLibrary::new(), None);
        controller.set_catalog(vec![create_test_track("a"), create_test_track("b")]).unwrap();
        controller.toggle_repeat();
        controller.toggle_play().unwrap();
        controller.drain_events();

        engine.refuse_next_seek("stream not seekable");
        let result = controller.handle_engine_event(EngineEvent::Ended);

        assert!(matches!(result, Err(PlaybackError::Engine(_))));
        assert!(!controller.is_playing());
        assert_eq!(controller.phase(), PlaybackPhase::Paused);
        assert_eq!(controller.current_track().unwrap().id.as_str(), "a");
        assert!(controller.drain_events().iter().any(|e| matches!(
            e,
            PlaybackEvent::Error { message } if message.starts_with("Failed to restart track")
        )));
    }

    #[test]
    fn failed_rewind_from_ended_settles_paused() {
        let (mut controller, engine) = controller_with(MockLibrary::new(), None);
        // Off-catalog track: nothing to advance to, so it stays Ended
        controller.select_track(create_test_track("solo"), None).unwrap();
        engine.finish();
        controller.pump_engine_events();
        assert_eq!(controller.phase(), PlaybackPhase::Ended);
        assert!(!controller.is_playing());

        engine.refuse_next_seek("stream not seekable");
        let result = controller.toggle_play();

        assert!(matches!(result, Err(PlaybackError::Engine(_))));
        assert!(!controller.is_playing());
        assert_eq!(controller.phase(), PlaybackPhase::Paused);
        assert!(!engine.is_playing());

        controller.toggle_play().unwrap();
        assert!(controller.is_playing());
        assert_eq!(controller.phase(), PlaybackPhase::Playing);
    }
}
