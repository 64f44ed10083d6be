//! Player events
//!
//! Event-based communication for UI synchronization. Each event name has one
//! payload type; observers subscribe per type and are called synchronously,
//! in subscription order, before the mutating call returns.
//!
//! Emitted at:
//! - Provider readiness
//! - Provider state changes
//! - Track loads and playlist edits
//! - Errors (provider, input, persistence)
//! - Every time-sampling frame
//! - Volume, mute and settings changes

use crate::provider::ProviderState;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;
use ytmp_core::{Playlist, PlayerError, Settings, Track};

/// A payload type that can travel on the [`EventBus`]
pub trait PlayerEvent: Clone + Send + 'static {
    /// Event name as exposed to consumers
    const NAME: &'static str;
}

/// The provider is ready and the player accepts playback commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ready;

/// Provider state changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateChange {
    /// The new provider state
    pub state: ProviderState,
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_ended: bool,
}

impl StateChange {
    pub fn new(state: ProviderState) -> Self {
        Self {
            state,
            is_playing: state == ProviderState::Playing,
            is_paused: state == ProviderState::Paused,
            is_ended: state == ProviderState::Ended,
        }
    }
}

/// A track was loaded into the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackChange {
    /// The loaded track
    pub track: Track,
    /// Its index in the playlist
    pub index: usize,
    /// Playlist at load time
    pub playlist: Playlist,
}

/// Kind of playlist edit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlaylistAction {
    Add,
    Remove,
    Clear,
}

/// The playlist was edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistChange {
    /// Playlist after the edit
    pub playlist: Playlist,
    pub action: PlaylistAction,
    /// Added or removed track
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track: Option<Track>,
    /// Index the edit happened at
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

/// One time-sampling frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeUpdate {
    /// Position in seconds
    pub current_time: f64,
    /// Duration in seconds, 0 when unknown
    pub duration: f64,
    /// Percent played (0-100)
    pub progress: f64,
}

/// Volume or mute changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeChange {
    /// New volume level (0-100)
    pub volume: u8,
    /// Whether audio is muted
    pub muted: bool,
}

/// Shuffle or repeat changed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsChange {
    pub settings: Settings,
}

impl PlayerEvent for Ready {
    const NAME: &'static str = "ready";
}

impl PlayerEvent for StateChange {
    const NAME: &'static str = "stateChange";
}

impl PlayerEvent for TrackChange {
    const NAME: &'static str = "trackChange";
}

impl PlayerEvent for PlaylistChange {
    const NAME: &'static str = "playlistChange";
}

impl PlayerEvent for PlayerError {
    const NAME: &'static str = "error";
}

impl PlayerEvent for TimeUpdate {
    const NAME: &'static str = "timeUpdate";
}

impl PlayerEvent for VolumeChange {
    const NAME: &'static str = "volumeChange";
}

impl PlayerEvent for SettingsChange {
    const NAME: &'static str = "settingsChange";
}

/// Handle returned by [`EventBus::on`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

type Handler<T> = Box<dyn FnMut(&T) + Send>;

struct Subscription {
    id: SubscriptionId,
    // Always a `Handler<T>` for the `T` it is filed under
    handler: Box<dyn Any + Send>,
}

/// Typed observer registry
#[derive(Default)]
pub struct EventBus {
    handlers: HashMap<TypeId, Vec<Subscription>>,
    next_id: u64,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("handlers", &self.len())
            .finish()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to events of type `T`
    pub fn on<T, F>(&mut self, handler: F) -> SubscriptionId
    where
        T: PlayerEvent,
        F: FnMut(&T) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;

        let handler: Handler<T> = Box::new(handler);
        self.handlers
            .entry(TypeId::of::<T>())
            .or_default()
            .push(Subscription {
                id,
                handler: Box::new(handler),
            });
        id
    }

    /// Unsubscribe; `false` if the id is unknown
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        for subscriptions in self.handlers.values_mut() {
            if let Some(pos) = subscriptions.iter().position(|s| s.id == id) {
                subscriptions.remove(pos);
                return true;
            }
        }
        false
    }

    /// Deliver `event` to every subscriber of `T`
    ///
    /// A panicking handler is logged and skipped; later handlers still run and
    /// the panic never reaches the emitter.
    pub fn emit<T: PlayerEvent>(&mut self, event: &T) {
        let Some(subscriptions) = self.handlers.get_mut(&TypeId::of::<T>()) else {
            return;
        };

        for subscription in subscriptions.iter_mut() {
            let Some(handler) = subscription.handler.downcast_mut::<Handler<T>>() else {
                continue;
            };
            if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(event))) {
                warn!(
                    event = T::NAME,
                    "Event handler panicked: {}",
                    panic_message(payload.as_ref())
                );
            }
        }
    }

    /// Number of subscribers for `T`
    pub fn subscribers<T: PlayerEvent>(&self) -> usize {
        self.handlers.get(&TypeId::of::<T>()).map_or(0, Vec::len)
    }

    /// Total number of subscribers
    pub fn len(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every subscriber
    pub fn clear(&mut self) {
        self.handlers.clear();
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "non-string panic payload"
    }
}
