//! Playback engine binding
//!
//! Abstracts the single media element the controller drives. A desktop
//! binding can wrap a native audio backend, a web binding can wrap an
//! `<audio>` element; the controller only sees this trait.

use crate::error::{PlaybackError, Result};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

/// Notifications emitted by the engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    /// Playback position moved (seconds)
    TimeUpdate(f64),

    /// Duration became known or changed (seconds)
    DurationChange(f64),

    /// Track reached its end
    Ended,
}

/// Sending half handed to the engine on subscribe
pub type EngineEventSender = UnboundedSender<EngineEvent>;

/// Identifier returned by [`PlaybackEngine::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Platform media engine
///
/// Implementors must not start playback from [`load`](Self::load), must
/// clamp [`seek_to`](Self::seek_to) to `[0, duration]`, and must stop
/// delivering events to a subscription once it is unsubscribed or its
/// receiver is dropped.
pub trait PlaybackEngine: Send {
    /// Set the media source without starting playback
    fn load(&mut self, src: &str) -> Result<()>;

    /// Start or resume playback
    ///
    /// Fails when playback cannot start (autoplay policy, decode error, no
    /// source). The controller resets its playing intent on failure.
    fn play(&mut self) -> Result<()>;

    /// Pause playback (idempotent)
    fn pause(&mut self);

    /// Move the playback position, clamped to `[0, duration]`
    fn seek_to(&mut self, seconds: f64) -> Result<()>;

    /// Set normalized volume (0.0-1.0)
    fn set_volume(&mut self, volume: f64);

    /// Current playback position in seconds
    fn current_time(&self) -> f64;

    /// Duration in seconds, once known
    fn duration(&self) -> Option<f64>;

    /// Register an event sink for the lifetime of the binding
    fn subscribe(&mut self, sender: EngineEventSender) -> SubscriptionId;

    /// Stop delivering events to a subscription
    fn unsubscribe(&mut self, id: SubscriptionId);

    /// Detach the source and free the underlying resource
    ///
    /// Called on teardown. Temporary resources (e.g. local blob URLs) must be
    /// revoked here.
    fn release(&mut self);
}

/// Receiving side of an engine subscription
///
/// Owned by the controller. Dropping it closes the channel, so an engine
/// that keeps a stale sender can no longer reach a disposed controller.
#[derive(Debug)]
pub struct EngineSubscription {
    id: SubscriptionId,
    receiver: UnboundedReceiver<EngineEvent>,
}

impl EngineSubscription {
    /// Subscribe to `engine`
    pub fn attach(engine: &mut dyn PlaybackEngine) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let id = engine.subscribe(sender);
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Take every event delivered so far, oldest first
    pub fn drain(&mut self) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        events
    }

    /// Unsubscribe from `engine` and close the channel
    pub fn detach(mut self, engine: &mut dyn PlaybackEngine) {
        engine.unsubscribe(self.id);
        self.receiver.close();
    }
}

/// Commands recorded by [`MemoryEngine`]
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCommand {
    Load(String),
    Play,
    Pause,
    SeekTo(f64),
    SetVolume(f64),
    Release,
}

#[derive(Debug)]
struct MemoryEngineInner {
    source: Option<String>,
    playing: bool,
    position: f64,
    duration: Option<f64>,
    volume: f64,
    released: bool,
    refusals: Vec<String>,
    seek_refusals: Vec<String>,
    next_subscription: u64,
    subscribers: Vec<(SubscriptionId, EngineEventSender)>,
    commands: Vec<EngineCommand>,
}

/// In-process engine without audio output
///
/// Tracks source, position, and volume, records every command, and lets the
/// host drive time forward or refuse playback. Clones share state, so a
/// handle kept outside the controller can fire events and inspect commands.
#[derive(Debug, Clone)]
pub struct MemoryEngine {
    inner: Arc<Mutex<MemoryEngineInner>>,
}

impl Default for MemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryEngineInner {
                source: None,
                playing: false,
                position: 0.0,
                duration: None,
                volume: 1.0,
                released: false,
                refusals: Vec::new(),
                seek_refusals: Vec::new(),
                next_subscription: 0,
                subscribers: Vec::new(),
                commands: Vec::new(),
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryEngineInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(inner: &mut MemoryEngineInner, event: EngineEvent) {
        inner
            .subscribers
            .retain(|(_, sender)| sender.send(event).is_ok());
    }

    /// Make the next `play()` fail with `reason`
    pub fn refuse_next_play(&self, reason: impl Into<String>) {
        self.lock().refusals.push(reason.into());
    }

    /// Make the next `seek_to()` fail with `reason`
    pub fn refuse_next_seek(&self, reason: impl Into<String>) {
        self.lock().seek_refusals.push(reason.into());
    }

    /// Report the duration of the loaded source
    pub fn set_duration(&self, seconds: f64) {
        let mut inner = self.lock();
        inner.duration = Some(seconds);
        Self::emit(&mut inner, EngineEvent::DurationChange(seconds));
    }

    /// Advance playback by `seconds`, emitting time updates and `Ended`
    /// when the duration is reached. No-op while paused.
    pub fn advance(&self, seconds: f64) {
        let mut inner = self.lock();
        if !inner.playing {
            return;
        }
        let mut position = inner.position + seconds.max(0.0);
        let finished = inner.duration.is_some_and(|d| position >= d);
        if let Some(duration) = inner.duration {
            position = position.min(duration);
        }
        inner.position = position;
        Self::emit(&mut inner, EngineEvent::TimeUpdate(position));
        if finished {
            inner.playing = false;
            Self::emit(&mut inner, EngineEvent::Ended);
        }
    }

    /// Jump to the end of the track and emit `Ended`
    pub fn finish(&self) {
        let mut inner = self.lock();
        if let Some(duration) = inner.duration {
            inner.position = duration;
        }
        inner.playing = false;
        Self::emit(&mut inner, EngineEvent::Ended);
    }

    pub fn is_playing(&self) -> bool {
        self.lock().playing
    }

    pub fn position(&self) -> f64 {
        self.lock().position
    }

    pub fn source(&self) -> Option<String> {
        self.lock().source.clone()
    }

    pub fn volume(&self) -> f64 {
        self.lock().volume
    }

    pub fn is_released(&self) -> bool {
        self.lock().released
    }

    /// Subscriptions whose receivers are still open
    pub fn subscriber_count(&self) -> usize {
        let mut inner = self.lock();
        inner.subscribers.retain(|(_, sender)| !sender.is_closed());
        inner.subscribers.len()
    }

    /// Every command received so far
    pub fn commands(&self) -> Vec<EngineCommand> {
        self.lock().commands.clone()
    }
}

impl PlaybackEngine for MemoryEngine {
    fn load(&mut self, src: &str) -> Result<()> {
        let mut inner = self.lock();
        inner.commands.push(EngineCommand::Load(src.to_string()));
        if src.trim().is_empty() {
            return Err(PlaybackError::Engine("empty media source".into()));
        }
        inner.source = Some(src.to_string());
        inner.playing = false;
        inner.position = 0.0;
        inner.duration = None;
        inner.released = false;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let mut inner = self.lock();
        inner.commands.push(EngineCommand::Play);
        if !inner.refusals.is_empty() {
            let reason = inner.refusals.remove(0);
            inner.playing = false;
            return Err(PlaybackError::Engine(reason));
        }
        if inner.source.is_none() {
            return Err(PlaybackError::Engine("no media source loaded".into()));
        }
        inner.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        let mut inner = self.lock();
        inner.commands.push(EngineCommand::Pause);
        inner.playing = false;
    }

    fn seek_to(&mut self, seconds: f64) -> Result<()> {
        let mut inner = self.lock();
        inner.commands.push(EngineCommand::SeekTo(seconds));
        if !inner.seek_refusals.is_empty() {
            let reason = inner.seek_refusals.remove(0);
            return Err(PlaybackError::Engine(reason));
        }
        if inner.source.is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }
        let mut position = if seconds.is_finite() { seconds.max(0.0) } else { 0.0 };
        if let Some(duration) = inner.duration {
            position = position.min(duration);
        }
        inner.position = position;
        Self::emit(&mut inner, EngineEvent::TimeUpdate(position));
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) {
        let mut inner = self.lock();
        inner.commands.push(EngineCommand::SetVolume(volume));
        inner.volume = volume.clamp(0.0, 1.0);
    }

    fn current_time(&self) -> f64 {
        self.lock().position
    }

    fn duration(&self) -> Option<f64> {
        self.lock().duration
    }

    fn subscribe(&mut self, sender: EngineEventSender) -> SubscriptionId {
        let mut inner = self.lock();
        let id = SubscriptionId(inner.next_subscription);
        inner.next_subscription += 1;
        inner.subscribers.push((id, sender));
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) {
        self.lock().subscribers.retain(|(sub, _)| *sub != id);
    }

    fn release(&mut self) {
        let mut inner = self.lock();
        inner.commands.push(EngineCommand::Release);
        inner.playing = false;
        inner.source = None;
        inner.position = 0.0;
        inner.duration = None;
        inner.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_does_not_start_playback() {
        let mut engine = MemoryEngine::new();
        engine.load("a.mp3").unwrap();

        assert!(!engine.is_playing());
        assert_eq!(engine.source().as_deref(), Some("a.mp3"));
    }

    #[test]
    fn play_without_source_fails() {
        let mut engine = MemoryEngine::new();
        assert!(matches!(engine.play(), Err(PlaybackError::Engine(_))));
    }

    #[test]
    fn refused_play_fails_once() {
        let mut engine = MemoryEngine::new();
        engine.load("a.mp3").unwrap();
        engine.refuse_next_play("autoplay blocked");

        assert!(engine.play().is_err());
        assert!(!engine.is_playing());
        assert!(engine.play().is_ok());
        assert!(engine.is_playing());
    }

    #[test]
    fn refused_seek_keeps_position() {
        let mut engine = MemoryEngine::new();
        engine.load("a.mp3").unwrap();
        engine.play().unwrap();
        engine.advance(12.0);
        engine.refuse_next_seek("stream not seekable");

        assert!(matches!(engine.seek_to(0.0), Err(PlaybackError::Engine(_))));
        assert_eq!(engine.position(), 12.0);
        assert!(engine.seek_to(0.0).is_ok());
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn seek_is_clamped_to_duration() {
        let mut engine = MemoryEngine::new();
        engine.load("a.mp3").unwrap();
        engine.set_duration(120.0);

        engine.seek_to(500.0).unwrap();
        assert_eq!(engine.position(), 120.0);

        engine.seek_to(-5.0).unwrap();
        assert_eq!(engine.position(), 0.0);
    }

    #[test]
    fn subscription_receives_events_until_detached() {
        let mut engine = MemoryEngine::new();
        let handle = engine.clone();
        engine.load("a.mp3").unwrap();

        let mut subscription = EngineSubscription::attach(&mut engine);
        handle.set_duration(10.0);
        engine.play().unwrap();
        handle.advance(10.0);

        assert_eq!(
            subscription.drain(),
            vec![
                EngineEvent::DurationChange(10.0),
                EngineEvent::TimeUpdate(10.0),
                EngineEvent::Ended
            ]
        );

        subscription.detach(&mut engine);
        assert_eq!(handle.subscriber_count(), 0);
    }

    #[test]
    fn dropped_subscription_is_pruned() {
        let mut engine = MemoryEngine::new();
        let subscription = EngineSubscription::attach(&mut engine);
        assert_eq!(engine.subscriber_count(), 1);

        drop(subscription);
        assert_eq!(engine.subscriber_count(), 0);
    }

    #[test]
    fn release_detaches_source() {
        let mut engine = MemoryEngine::new();
        engine.load("blob:local").unwrap();
        engine.play().unwrap();
        engine.release();

        assert!(engine.is_released());
        assert!(!engine.is_playing());
        assert!(engine.source().is_none());
    }
}
