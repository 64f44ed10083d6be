//! Player facade - core orchestration
//!
//! Coordinates the playlist controller, volume mirror, provider, persistence
//! and event bus behind one stateful object.
//!
//! The player is single-threaded and cooperative: every public method runs to
//! completion and emits its events before returning. Time only moves through
//! [`Player::tick`] (one sampling frame plus due timers) and the async driver
//! [`Player::step`].

use crate::config::PlayerConfig;
use crate::events::{
    EventBus, PlayerEvent, PlaylistAction, PlaylistChange, Ready, SettingsChange, StateChange,
    SubscriptionId, TimeUpdate, TrackChange, VolumeChange,
};
use crate::gateway::ProviderGateway;
use crate::machine::{self, EndedAction, TimeSampler};
use crate::provider::{classify_error, MediaProvider, ProviderEvent, ProviderState};
use crate::queue::{PlaylistController, RemoveEffect};
use crate::volume::Volume;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info, warn};
use ytmp_core::reference::INVALID_REFERENCE_REASON;
use ytmp_core::{
    parse_reference, ErrorCause, ErrorKind, PlayerError, Playlist, Settings, StateSnapshot,
    Track, TrackMetadata, VideoId,
};
use ytmp_storage::{
    Debouncer, KeyValueStore, MemoryStore, PlayerStore, SAVE_DEBOUNCE, TIME_DEBOUNCE,
};

/// Interval between time-sampling frames
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

const INIT_FAILED_MESSAGE: &str = "Failed to initialize player";
const SAVE_FAILED_MESSAGE: &str = "Failed to save player state";

/// The playback queue and state synchronization engine
pub struct Player {
    container_id: String,
    gateway: Arc<ProviderGateway>,
    store: PlayerStore,

    provider: Option<Box<dyn MediaProvider>>,
    provider_events: Option<mpsc::UnboundedReceiver<ProviderEvent>>,

    queue: PlaylistController,
    settings: Settings,
    volume: Volume,
    current_time: f64,

    ready: bool,
    init_failed: bool,
    destroyed: bool,

    events: EventBus,
    sampler: TimeSampler,
    save_debounce: Debouncer,
    time_debounce: Debouncer,
}

impl std::fmt::Debug for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Player")
            .field("container_id", &self.container_id)
            .field("tracks", &self.queue.len())
            .field("current_index", &self.queue.current_index())
            .field("ready", &self.ready)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl Player {
    /// Create a player persisting through `backend`
    ///
    /// Settings start from defaults, then `config`, then any snapshot found
    /// under `config.storage_key`. Nothing touches the provider until
    /// [`Player::initialize`].
    pub fn new(
        config: PlayerConfig,
        gateway: Arc<ProviderGateway>,
        backend: Arc<dyn KeyValueStore>,
    ) -> Self {
        let store = if config.save_state {
            PlayerStore::new(backend, config.storage_key.clone())
        } else {
            PlayerStore::disabled()
        };

        let mut settings = Settings::default();
        if let Some(volume) = config.volume {
            settings.volume = volume;
        }
        if let Some(repeat) = config.repeat {
            settings.repeat_mode = repeat;
        }
        if let Some(shuffle) = config.shuffle {
            settings.shuffled = shuffle;
        }
        if let Some(autoplay) = config.autoplay {
            settings.autoplay = autoplay;
        }

        let mut playlist = Playlist::new();
        let mut current_time = 0.0;
        if let Some(snapshot) = store.load_state() {
            info!(
                tracks = snapshot.playlist.len(),
                current_index = snapshot.playlist.current_index,
                "Restored player state"
            );
            playlist = snapshot.playlist;
            current_time = snapshot.current_time.max(0.0);
            settings = snapshot.settings;
        }

        let volume = Volume::new(settings.volume);
        settings.volume = volume.level();
        let queue = PlaylistController::restore(playlist, settings.shuffled);

        Self {
            container_id: config.container_id,
            gateway,
            store,
            provider: None,
            provider_events: None,
            queue,
            settings,
            volume,
            current_time,
            ready: false,
            init_failed: false,
            destroyed: false,
            events: EventBus::new(),
            sampler: TimeSampler::new(),
            save_debounce: Debouncer::new(SAVE_DEBOUNCE),
            time_debounce: Debouncer::new(TIME_DEBOUNCE),
        }
    }

    /// Create a player whose state lives only as long as the process
    pub fn in_memory(config: PlayerConfig, gateway: Arc<ProviderGateway>) -> Self {
        Self::new(config, gateway, Arc::new(MemoryStore::new()))
    }

    // ===== Lifecycle =====

    /// Wait for the provider runtime and construct the provider
    ///
    /// Returns whether a provider now exists. On failure one `API_ERROR` is
    /// emitted and the player stays not-ready for good. Readiness itself
    /// arrives later as [`ProviderEvent::Ready`].
    pub async fn initialize(&mut self) -> bool {
        if self.destroyed || self.init_failed {
            return false;
        }
        if self.provider.is_some() {
            return true;
        }

        let created = match self.gateway.await_ready().await {
            Ok(()) => {
                let (tx, rx) = mpsc::unbounded_channel();
                self.gateway
                    .loader()
                    .create(&self.container_id, tx)
                    .map(|provider| (provider, rx))
            }
            Err(e) => Err(e.into()),
        };

        match created {
            Ok((provider, rx)) => {
                debug!(container = %self.container_id, "Media provider created");
                self.provider = Some(provider);
                self.provider_events = Some(rx);
                true
            }
            Err(e) => {
                self.init_failed = true;
                self.report_error(
                    PlayerError::new(ErrorKind::ApiError, INIT_FAILED_MESSAGE)
                        .with_cause(ErrorCause::Message(e.to_string())),
                );
                false
            }
        }
    }

    /// Process one provider event, frame or timer expiry
    ///
    /// Returns `false` once the player has been destroyed.
    pub async fn step(&mut self) -> bool {
        if self.destroyed {
            return false;
        }

        let frame = tokio::time::sleep(FRAME_INTERVAL);
        let deadline = self.next_deadline();
        let timer = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            event = next_provider_event(&mut self.provider_events) => match event {
                Some(event) => self.handle_provider_event(event),
                None => self.provider_events = None,
            },
            () = timer => self.fire_due_timers(Instant::now()),
            () = frame => self.tick(),
        }

        !self.destroyed
    }

    /// Drive the player until it is destroyed
    pub async fn run(&mut self) {
        while self.step().await {}
    }

    /// Tear down the provider and observers
    ///
    /// Pending saves are dropped, not flushed.
    pub fn destroy(&mut self) {
        if let Some(mut provider) = self.provider.take() {
            provider.destroy();
        }
        self.provider_events = None;
        self.events.clear();
        self.save_debounce.cancel();
        self.time_debounce.cancel();
        self.ready = false;
        self.destroyed = true;
        debug!(container = %self.container_id, "Player destroyed");
    }

    // ===== Provider reactions =====

    /// React to a signal from the provider
    pub fn handle_provider_event(&mut self, event: ProviderEvent) {
        if self.destroyed || self.provider.is_none() {
            return;
        }

        match event {
            ProviderEvent::Ready => self.on_provider_ready(),
            ProviderEvent::StateChange(state) => self.on_provider_state(state),
            ProviderEvent::Error(code) => self.on_provider_error(code),
        }
    }

    fn on_provider_ready(&mut self) {
        if self.ready {
            return;
        }
        self.ready = true;

        let volume = self.volume.level();
        if let Some(provider) = self.provider.as_mut() {
            provider.set_volume(volume);
        }
        self.sampler.reset();

        if !self.queue.is_empty() {
            self.load_current_track();
        }

        info!(container = %self.container_id, "Player ready");
        self.events.emit(&Ready);
    }

    fn on_provider_state(&mut self, state: ProviderState) {
        self.events.emit(&StateChange::new(state));

        if machine::reports_duration(state) {
            let duration = self.duration();
            self.queue.fill_current_duration(duration);
        }

        match state {
            ProviderState::Ended => self.on_track_ended(),
            ProviderState::Playing => self.save_debounce.schedule(),
            _ => {}
        }
    }

    fn on_track_ended(&mut self) {
        match machine::on_ended(self.settings.repeat_mode) {
            EndedAction::Restart => {
                self.seek_to(0.0);
                self.play();
            }
            EndedAction::Advance => self.next(),
        }
    }

    fn on_provider_error(&mut self, code: i32) {
        let video_id = self.queue.current_track().map(|t| t.id.clone());
        let error = classify_error(code, video_id.as_ref());
        let skip = machine::should_auto_skip(error.kind, self.queue.len());

        self.report_error(error);

        if skip {
            info!(code, "Skipping unplayable track");
            self.next();
        }
    }

    // ===== Time sampling =====

    /// Run one sampling frame and fire any due timers
    pub fn tick(&mut self) {
        if self.destroyed {
            return;
        }
        let now = Instant::now();

        if self.ready {
            if let Some(provider) = self.provider.as_ref() {
                let current_time = provider.current_time();
                let duration = provider.duration();
                self.current_time = current_time;

                self.events.emit(&TimeUpdate {
                    current_time,
                    duration,
                    progress: machine::progress(current_time, duration),
                });

                if self.sampler.observe(current_time) {
                    self.time_debounce.schedule_at(now);
                }
            }
        }

        self.fire_due_timers(now);
    }

    fn fire_due_timers(&mut self, now: Instant) {
        if self.time_debounce.fire_if_due(now) {
            self.save_debounce.schedule_at(now);
        }
        if self.save_debounce.fire_if_due(now) {
            self.save_now();
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        match (self.save_debounce.deadline(), self.time_debounce.deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Whether a debounced save is waiting
    pub fn has_pending_save(&self) -> bool {
        self.save_debounce.is_pending()
    }

    // ===== Playlist =====

    /// Queue media from a URL or bare identifier
    ///
    /// Invalid input emits `INVALID_VIDEO_ID` and returns `None`.
    pub fn add_track(&mut self, reference: &str, title: Option<&str>) -> Option<Track> {
        let parsed = match parse_reference(reference) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Rejected reference {:?}: {}", reference, e);
                self.report_error(
                    PlayerError::new(ErrorKind::InvalidVideoId, INVALID_REFERENCE_REASON)
                        .with_cause(ErrorCause::Message(reference.to_string())),
                );
                return None;
            }
        };

        let title = match title.map(str::trim) {
            Some(title) if !title.is_empty() => title.to_string(),
            _ => format!("Video {}", parsed.id),
        };

        Some(self.push_track(Track::new(parsed.id, title)))
    }

    /// Queue media by bare identifier with caller-supplied metadata
    pub fn add_track_with_metadata(&mut self, metadata: TrackMetadata) -> Option<Track> {
        let id = match VideoId::parse(metadata.id.trim()) {
            Ok(id) => id,
            Err(e) => {
                self.report_error(
                    PlayerError::new(ErrorKind::InvalidVideoId, e.to_string())
                        .with_video_id(metadata.id),
                );
                return None;
            }
        };

        let mut track = Track::new(id, metadata.title);
        if let Some(artist) = metadata.artist {
            track = track.with_artist(artist);
        }
        if let Some(tags) = metadata.tags {
            track = track.with_tags(tags);
        }

        Some(self.push_track(track))
    }

    fn push_track(&mut self, track: Track) -> Track {
        if self.queue.add(track.clone()) {
            self.load_current_track();
        }

        self.events.emit(&PlaylistChange {
            playlist: self.queue.playlist().clone(),
            action: PlaylistAction::Add,
            track: Some(track.clone()),
            index: Some(self.queue.len() - 1),
        });
        self.save_debounce.schedule();
        track
    }

    /// Remove the track at `index`; `false` when out of bounds
    pub fn remove_track(&mut self, index: usize) -> bool {
        let Some(removed) = self.queue.remove(index) else {
            return false;
        };

        match removed.effect {
            RemoveEffect::Stop => {
                self.current_time = 0.0;
                self.stop();
            }
            RemoveEffect::Reload => {
                self.current_time = 0.0;
                self.load_current_track();
            }
            RemoveEffect::None => {}
        }

        self.events.emit(&PlaylistChange {
            playlist: self.queue.playlist().clone(),
            action: PlaylistAction::Remove,
            track: Some(removed.track),
            index: Some(index),
        });
        self.save_debounce.schedule();
        true
    }

    /// Empty the playlist and stop
    pub fn clear_playlist(&mut self) {
        self.queue.clear();
        self.current_time = 0.0;
        self.stop();

        self.events.emit(&PlaylistChange {
            playlist: self.queue.playlist().clone(),
            action: PlaylistAction::Clear,
            track: None,
            index: None,
        });
        self.save_debounce.schedule();
    }

    /// Advance in traversal order, wrapping around
    pub fn next(&mut self) {
        if let Some(index) = self.queue.next_index() {
            self.jump_to_track(index);
        }
    }

    /// Step back in traversal order, wrapping around
    pub fn previous(&mut self) {
        if let Some(index) = self.queue.previous_index() {
            self.jump_to_track(index);
        }
    }

    /// Load the track at `index` from the start; no-op when out of bounds
    pub fn jump_to_track(&mut self, index: usize) {
        if !self.queue.jump(index) {
            return;
        }

        self.current_time = 0.0;
        self.load_current_track();

        if self.settings.autoplay {
            self.play();
        }
        self.save_debounce.schedule();
    }

    fn load_current_track(&mut self) {
        if !self.ready {
            return;
        }
        let Some(track) = self.queue.current_track().cloned() else {
            return;
        };
        let Some(provider) = self.provider.as_mut() else {
            return;
        };

        provider.load(&track.id, self.current_time);
        self.sampler.reset();

        self.events.emit(&TrackChange {
            track,
            index: self.queue.current_index(),
            playlist: self.queue.playlist().clone(),
        });
    }

    // ===== Transport =====

    fn ready_provider(&mut self) -> Option<&mut (dyn MediaProvider + 'static)> {
        if self.ready {
            self.provider.as_deref_mut()
        } else {
            None
        }
    }

    pub fn play(&mut self) {
        if let Some(provider) = self.ready_provider() {
            provider.play();
        }
    }

    pub fn pause(&mut self) {
        if let Some(provider) = self.ready_provider() {
            provider.pause();
        }
    }

    /// Stop playback and rewind the mirrored position
    pub fn stop(&mut self) {
        if let Some(provider) = self.ready_provider() {
            provider.stop();
            self.current_time = 0.0;
        }
    }

    /// Pause when the provider reports playing, play otherwise
    pub fn toggle_play(&mut self) {
        let Some(provider) = self.ready_provider() else {
            return;
        };
        if provider.state() == ProviderState::Playing {
            provider.pause();
        } else {
            provider.play();
        }
    }

    /// Seek within the current track
    pub fn seek_to(&mut self, seconds: f64) {
        let seconds = seconds.max(0.0);
        if let Some(provider) = self.ready_provider() {
            provider.seek_to(seconds);
            self.current_time = seconds;
        }
    }

    /// Set the volume, clamped into 0-100
    ///
    /// The mirrored setting changes even before the provider is ready; the
    /// provider picks it up on ready.
    pub fn set_volume(&mut self, volume: i32) {
        let level = self.volume.set_level(volume);
        self.settings.volume = level;

        if let Some(provider) = self.ready_provider() {
            provider.set_volume(level);
        }

        self.emit_volume_change();
        self.save_debounce.schedule();
    }

    /// Flip the provider's mute state
    pub fn toggle_mute(&mut self) {
        let Some(provider) = self.ready_provider() else {
            return;
        };
        let muted = if provider.is_muted() {
            provider.unmute();
            false
        } else {
            provider.mute();
            true
        };

        self.volume.set_muted(muted);
        self.emit_volume_change();
    }

    fn emit_volume_change(&mut self) {
        let event = VolumeChange {
            volume: self.volume.level(),
            muted: self.is_muted(),
        };
        self.events.emit(&event);
    }

    // ===== Settings =====

    /// Turn shuffle on or off
    pub fn toggle_shuffle(&mut self) {
        self.settings.shuffled = !self.settings.shuffled;
        self.queue.set_shuffle(self.settings.shuffled);
        self.emit_settings_change();
    }

    /// Cycle repeat `none -> all -> one -> none`
    pub fn toggle_repeat(&mut self) {
        self.settings.repeat_mode = self.settings.repeat_mode.cycle();
        self.emit_settings_change();
    }

    fn emit_settings_change(&mut self) {
        let event = SettingsChange {
            settings: self.settings(),
        };
        self.events.emit(&event);
        self.save_debounce.schedule();
    }

    // ===== Persistence =====

    fn snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(
            self.queue.playlist().clone(),
            self.current_time,
            self.settings(),
        )
    }

    fn save_now(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.store.save_state(&snapshot) {
            self.report_error(
                PlayerError::new(ErrorKind::StorageError, SAVE_FAILED_MESSAGE)
                    .with_cause(ErrorCause::Message(e.to_string())),
            );
        }
    }

    /// Write the snapshot now and drop any pending debounced save
    pub fn flush(&mut self) {
        self.save_debounce.cancel();
        self.time_debounce.cancel();
        self.save_now();
    }

    fn report_error(&mut self, error: PlayerError) {
        warn!(kind = %error.kind, "Player error: {}", error.message);
        self.events.emit(&error);
    }

    // ===== Observers =====

    /// Subscribe to events of type `T`
    pub fn on<T, F>(&mut self, handler: F) -> SubscriptionId
    where
        T: PlayerEvent,
        F: FnMut(&T) + Send + 'static,
    {
        self.events.on(handler)
    }

    /// Unsubscribe; `false` if the id is unknown
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    // ===== Getters =====

    pub fn current_track(&self) -> Option<Track> {
        self.queue.current_track().cloned()
    }

    pub fn playlist(&self) -> Playlist {
        self.queue.playlist().clone()
    }

    pub fn settings(&self) -> Settings {
        self.settings.clone()
    }

    /// Last sampled or commanded position in seconds
    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    /// Duration reported by the provider, 0 when unknown
    pub fn duration(&self) -> f64 {
        self.provider.as_ref().map_or(0.0, |p| p.duration())
    }

    /// Percent of the current track played (0-100)
    pub fn progress(&self) -> f64 {
        machine::progress(self.current_time, self.duration())
    }

    pub fn volume(&self) -> u8 {
        self.volume.level()
    }

    pub fn is_playing(&self) -> bool {
        self.provider_state() == Some(ProviderState::Playing)
    }

    pub fn is_paused(&self) -> bool {
        self.provider_state() == Some(ProviderState::Paused)
    }

    pub fn is_muted(&self) -> bool {
        self.provider
            .as_ref()
            .map_or(self.volume.is_muted(), |p| p.is_muted())
    }

    /// Provider constructed and reported ready
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    fn provider_state(&self) -> Option<ProviderState> {
        self.provider.as_ref().map(|p| p.state())
    }
}

async fn next_provider_event(
    events: &mut Option<mpsc::UnboundedReceiver<ProviderEvent>>,
) -> Option<ProviderEvent> {
    match events {
        Some(rx) => rx.recv().await,
        None => std::future::pending().await,
    }
}
