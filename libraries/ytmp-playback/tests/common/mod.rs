//! Shared fakes for player integration tests
//!
//! The fake provider records every command it receives and reports whatever
//! position, duration and state the test sets. Events are pushed either
//! through the loader's channel or straight into the player.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use tokio::sync::mpsc;
use ytmp_core::VideoId;
use ytmp_playback::{
    GatewayError, MediaProvider, PlaybackError, Player, PlayerConfig, PlayerEvent,
    ProviderEvent, ProviderGateway, ProviderLoader, ProviderState,
};
use ytmp_storage::{KeyValueStore, MemoryStore, StorageError};

pub const IDS: [&str; 4] = ["dQw4w9WgXcQ", "9bZkp7q19f0", "kJQP7kiw5Fk", "JGwWNGJdvx8"];

// ===== Fake provider =====

/// Command received by the fake provider
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Load(String, f64),
    Play,
    Pause,
    Stop,
    SeekTo(f64),
    SetVolume(u8),
    Mute,
    Unmute,
    Destroy,
}

#[derive(Debug)]
pub struct FakeProviderState {
    pub calls: Vec<Call>,
    pub current_time: f64,
    pub duration: f64,
    pub state: ProviderState,
    pub muted: bool,
}

impl Default for FakeProviderState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            current_time: 0.0,
            duration: 0.0,
            state: ProviderState::Unstarted,
            muted: false,
        }
    }
}

pub type SharedProvider = Arc<Mutex<FakeProviderState>>;

pub struct FakeProvider {
    shared: SharedProvider,
}

impl MediaProvider for FakeProvider {
    fn load(&mut self, id: &VideoId, start_seconds: f64) {
        let mut s = self.shared.lock().unwrap();
        s.calls.push(Call::Load(id.as_str().to_string(), start_seconds));
        s.current_time = start_seconds;
    }

    fn play(&mut self) {
        let mut s = self.shared.lock().unwrap();
        s.calls.push(Call::Play);
        s.state = ProviderState::Playing;
    }

    fn pause(&mut self) {
        let mut s = self.shared.lock().unwrap();
        s.calls.push(Call::Pause);
        s.state = ProviderState::Paused;
    }

    fn stop(&mut self) {
        let mut s = self.shared.lock().unwrap();
        s.calls.push(Call::Stop);
        s.current_time = 0.0;
    }

    fn seek_to(&mut self, seconds: f64) {
        let mut s = self.shared.lock().unwrap();
        s.calls.push(Call::SeekTo(seconds));
        s.current_time = seconds;
    }

    fn current_time(&self) -> f64 {
        self.shared.lock().unwrap().current_time
    }

    fn duration(&self) -> f64 {
        self.shared.lock().unwrap().duration
    }

    fn state(&self) -> ProviderState {
        self.shared.lock().unwrap().state
    }

    fn set_volume(&mut self, volume: u8) {
        self.shared.lock().unwrap().calls.push(Call::SetVolume(volume));
    }

    fn mute(&mut self) {
        let mut s = self.shared.lock().unwrap();
        s.calls.push(Call::Mute);
        s.muted = true;
    }

    fn unmute(&mut self) {
        let mut s = self.shared.lock().unwrap();
        s.calls.push(Call::Unmute);
        s.muted = false;
    }

    fn is_muted(&self) -> bool {
        self.shared.lock().unwrap().muted
    }

    fn destroy(&mut self) {
        self.shared.lock().unwrap().calls.push(Call::Destroy);
    }
}

// ===== Fake loader =====

pub struct FakeLoader {
    pub provider: SharedProvider,
    pub available: AtomicBool,
    pub fail_bootstrap: AtomicBool,
    pub bootstraps: AtomicUsize,
    pub events: Mutex<Option<mpsc::UnboundedSender<ProviderEvent>>>,
}

impl FakeLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            provider: Arc::default(),
            available: AtomicBool::new(false),
            fail_bootstrap: AtomicBool::new(false),
            bootstraps: AtomicUsize::new(0),
            events: Mutex::new(None),
        })
    }

    /// Push an event through the channel handed to the player
    pub fn send(&self, event: ProviderEvent) {
        let events = self.events.lock().unwrap();
        events
            .as_ref()
            .expect("provider not created")
            .send(event)
            .expect("player dropped its receiver");
    }

    pub fn calls(&self) -> Vec<Call> {
        self.provider.lock().unwrap().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut self.provider.lock().unwrap().calls)
    }

    pub fn set_time(&self, current_time: f64, duration: f64) {
        let mut s = self.provider.lock().unwrap();
        s.current_time = current_time;
        s.duration = duration;
    }
}

#[async_trait]
impl ProviderLoader for FakeLoader {
    async fn bootstrap(&self) -> Result<(), GatewayError> {
        self.bootstraps.fetch_add(1, Ordering::SeqCst);
        if self.fail_bootstrap.load(Ordering::SeqCst) {
            return Err(GatewayError::LoadFailed("script blocked".to_string()));
        }
        self.available.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::SeqCst)
    }

    fn create(
        &self,
        _container_id: &str,
        events: mpsc::UnboundedSender<ProviderEvent>,
    ) -> Result<Box<dyn MediaProvider>, PlaybackError> {
        *self.events.lock().unwrap() = Some(events);
        Ok(Box::new(FakeProvider {
            shared: Arc::clone(&self.provider),
        }))
    }
}

// ===== Storage =====

/// Backend whose writes always fail
#[derive(Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> ytmp_storage::Result<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> ytmp_storage::Result<()> {
        Err(StorageError::backend("quota exceeded"))
    }

    fn remove(&self, _key: &str) -> ytmp_storage::Result<()> {
        Ok(())
    }

    fn keys(&self) -> ytmp_storage::Result<Vec<String>> {
        Ok(Vec::new())
    }
}

// ===== Harness =====

static TRACING: Once = Once::new();

/// Route player logs to the test output (`RUST_LOG=ytmp_playback=debug`)
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub struct Harness {
    pub player: Player,
    pub loader: Arc<FakeLoader>,
    pub backend: Arc<MemoryStore>,
}

impl Harness {
    /// Player over a fresh memory store; not initialized
    pub fn new(config: PlayerConfig) -> Self {
        Self::with_backend(config, Arc::new(MemoryStore::new()))
    }

    pub fn with_backend(config: PlayerConfig, backend: Arc<MemoryStore>) -> Self {
        init_tracing();
        let loader = FakeLoader::new();
        let gateway = Arc::new(ProviderGateway::new(loader.clone()));
        let player = Player::new(config, gateway, backend.clone());
        Self {
            player,
            loader,
            backend,
        }
    }

    /// Initialize and deliver the provider's ready signal
    pub async fn ready(config: PlayerConfig) -> Self {
        let mut harness = Self::new(config);
        assert!(harness.player.initialize().await);
        harness.player.handle_provider_event(ProviderEvent::Ready);
        harness
    }
}

pub fn config() -> PlayerConfig {
    PlayerConfig::new("player")
}

/// Subscribe a recorder for events of type `T`
pub fn record<T: PlayerEvent>(player: &mut Player) -> Arc<Mutex<Vec<T>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    player.on(move |event: &T| sink.lock().unwrap().push(event.clone()));
    seen
}

pub fn url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={id}")
}
