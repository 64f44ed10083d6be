//! ytmp - Playback Queue & State Synchronization
//!
//! Drives an external streaming media provider from an ordered playlist.
//!
//! This crate provides:
//! - Playlist editing with a current-track cursor (add, remove, jump, clear)
//! - Shuffle traversal order that always starts at the current track
//! - Repeat modes (None, All, One) applied when a track ends
//! - Volume mirror (0-100, mute) that survives provider reloads
//! - Typed observer events delivered synchronously
//! - Debounced snapshot persistence through `ytmp-storage`
//! - Single-flight provider bootstrap with a timeout
//!
//! # Architecture
//!
//! `ytmp-playback` never talks to a real media runtime. The host supplies:
//! - A [`ProviderLoader`] that bootstraps the runtime and constructs providers
//! - A [`MediaProvider`] per player, reporting through [`ProviderEvent`]s
//! - A [`ytmp_storage::KeyValueStore`] for snapshots
//!
//! The [`Player`] is driven cooperatively: commands run synchronously, and
//! [`Player::step`] (or [`Player::run`]) waits for the next provider event,
//! sampling frame or debounce expiry.
//!
//! # Example: Queue traversal
//!
//! ```rust
//! use ytmp_core::{Track, VideoId};
//! use ytmp_playback::PlaylistController;
//!
//! let mut queue = PlaylistController::new();
//! for id in ["dQw4w9WgXcQ", "9bZkp7q19f0", "kJQP7kiw5Fk"] {
//!     queue.add(Track::new(VideoId::parse(id).unwrap(), id));
//! }
//!
//! assert_eq!(queue.next_index(), Some(1));
//! assert_eq!(queue.previous_index(), Some(2));
//!
//! queue.set_shuffle(true);
//! let order = queue.playlist().shuffle_order.as_deref().unwrap();
//! assert_eq!(order[0], queue.current_index());
//! ```
//!
//! # Example: Player wiring
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ytmp_playback::{Player, PlayerConfig, ProviderGateway, ProviderLoader, TrackChange};
//!
//! async fn start(loader: Arc<dyn ProviderLoader>) {
//!     let gateway = Arc::new(ProviderGateway::new(loader));
//!     let mut player = Player::in_memory(PlayerConfig::new("player"), gateway);
//!
//!     player.on(|change: &TrackChange| println!("Now playing {}", change.track.title));
//!     player.add_track("https://youtu.be/dQw4w9WgXcQ", Some("Never Gonna Give You Up"));
//!
//!     if player.initialize().await {
//!         player.run().await;
//!     }
//! }
//! ```

mod config;
mod error;
pub mod events;
mod gateway;
pub mod machine;
mod player;
pub mod provider;
mod queue;
mod shuffle;
mod volume;

// Public exports
pub use crate::config::PlayerConfig;
pub use error::{ConfigError, GatewayError, PlaybackError, Result};
pub use events::{
    EventBus, PlayerEvent, PlaylistAction, PlaylistChange, Ready, SettingsChange, StateChange,
    SubscriptionId, TimeUpdate, TrackChange, VolumeChange,
};
pub use gateway::{GatewayState, ProviderGateway, ProviderLoader, BOOTSTRAP_TIMEOUT};
pub use player::{Player, FRAME_INTERVAL};
pub use provider::{classify_error, MediaProvider, ProviderEvent, ProviderState};
pub use queue::{PlaylistController, RemoveEffect, Removed};
pub use shuffle::{shuffle_order, shuffle_order_with};
pub use volume::{Volume, MAX_VOLUME};
