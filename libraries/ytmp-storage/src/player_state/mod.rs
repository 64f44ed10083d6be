//! Player snapshot persistence
//!
//! Stores one [`StateSnapshot`] as JSON under `<prefix>:playerState`. Every read
//! failure degrades to "no snapshot"; write failures are logged and returned so
//! the caller can surface them.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use ytmp_core::{Playlist, Settings, StateSnapshot};
//! use ytmp_storage::{MemoryStore, PlayerStore};
//!
//! let store = PlayerStore::new(Arc::new(MemoryStore::new()), "ytMusicPlayer");
//! let snapshot = StateSnapshot::capture(Playlist::new(), 0.0, Settings::default());
//!
//! store.save_state(&snapshot).unwrap();
//! assert_eq!(store.load_state(), Some(snapshot));
//! ```

use crate::backend::{KeyValueStore, StorageUsage};
use crate::error::{Result, StorageError};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};
use ytmp_core::{Playlist, Settings, StateSnapshot};

/// Default key prefix
pub const DEFAULT_PREFIX: &str = "ytMusicPlayer";

/// Key (below the prefix) holding the snapshot
pub const STATE_KEY: &str = "playerState";

const AVAILABILITY_KEY: &str = "__ytmp_availability__";

/// Snapshot gateway over an optional key-value backend
///
/// A store without a backend accepts every call and remembers nothing, which is
/// how persistence is switched off.
#[derive(Clone)]
pub struct PlayerStore {
    backend: Option<Arc<dyn KeyValueStore>>,
    prefix: String,
}

impl std::fmt::Debug for PlayerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerStore")
            .field("enabled", &self.backend.is_some())
            .field("prefix", &self.prefix)
            .finish()
    }
}

impl PlayerStore {
    /// Create a store writing through `backend` under `prefix`
    pub fn new(backend: Arc<dyn KeyValueStore>, prefix: impl Into<String>) -> Self {
        Self {
            backend: Some(backend),
            prefix: prefix.into(),
        }
    }

    /// Create a store that persists nothing
    pub fn disabled() -> Self {
        Self {
            backend: None,
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    /// Whether a backend is attached
    pub fn is_enabled(&self) -> bool {
        self.backend.is_some()
    }

    /// Key prefix
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Fully qualified backend key for `key`
    pub fn full_key(&self, key: &str) -> String {
        format!("{}:{}", self.prefix, key)
    }

    /// Serialize and write a snapshot
    pub fn save_state(&self, snapshot: &StateSnapshot) -> Result<()> {
        let Some(backend) = &self.backend else {
            return Ok(());
        };

        let result = serde_json::to_string(snapshot)
            .map_err(StorageError::from)
            .and_then(|json| backend.set(&self.full_key(STATE_KEY), &json));

        match &result {
            Ok(()) => debug!(
                tracks = snapshot.playlist.len(),
                current_time = snapshot.current_time,
                "Saved player state"
            ),
            Err(e) => warn!("Failed to save player state: {}", e),
        }
        result
    }

    /// Read the stored snapshot, if any
    ///
    /// Missing data, backend errors and malformed JSON all yield `None`.
    pub fn load_state(&self) -> Option<StateSnapshot> {
        let backend = self.backend.as_ref()?;

        let raw = match backend.get(&self.full_key(STATE_KEY)) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read player state: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!("Failed to parse player state: {}", e);
                None
            }
        }
    }

    /// Replace only the playlist of an existing snapshot
    ///
    /// Does nothing when no snapshot has been saved yet.
    pub fn save_playlist(&self, playlist: &Playlist) -> Result<()> {
        self.update_existing(|snapshot| snapshot.playlist = playlist.clone())
    }

    /// Replace only the playback position of an existing snapshot
    pub fn save_current_time(&self, current_time: f64) -> Result<()> {
        self.update_existing(|snapshot| snapshot.current_time = current_time)
    }

    /// Replace only the settings of an existing snapshot
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.update_existing(|snapshot| snapshot.settings = settings.clone())
    }

    fn update_existing(&self, apply: impl FnOnce(&mut StateSnapshot)) -> Result<()> {
        let Some(mut snapshot) = self.load_state() else {
            return Ok(());
        };
        apply(&mut snapshot);
        snapshot.last_updated = Utc::now();
        self.save_state(&snapshot)
    }

    /// Delete the stored snapshot
    pub fn clear_state(&self) -> Result<()> {
        match &self.backend {
            Some(backend) => backend.remove(&self.full_key(STATE_KEY)),
            None => Ok(()),
        }
    }

    /// Delete everything stored under this prefix
    pub fn clear_all(&self) -> Result<usize> {
        match &self.backend {
            Some(backend) => backend.clear_prefix(&format!("{}:", self.prefix)),
            None => Ok(0),
        }
    }

    /// Check the backend with a write and a remove
    pub fn is_available(&self) -> bool {
        let Some(backend) = &self.backend else {
            return false;
        };
        backend.set(AVAILABILITY_KEY, "test").is_ok() && backend.remove(AVAILABILITY_KEY).is_ok()
    }

    /// Space used in the backend; all zero when disabled or unavailable
    pub fn usage(&self) -> StorageUsage {
        let Some(backend) = self.backend.as_ref().filter(|_| self.is_available()) else {
            return StorageUsage::default();
        };
        backend.usage().unwrap_or_else(|e| {
            warn!("Failed to measure storage usage: {}", e);
            StorageUsage::default()
        })
    }

    /// Move a blob stored under an unprefixed legacy key to the snapshot key
    ///
    /// Returns `true` when something was migrated. Only JSON objects are moved.
    pub fn migrate_legacy(&self, old_key: &str) -> bool {
        let Some(backend) = &self.backend else {
            return false;
        };

        let raw = match backend.get(old_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return false,
            Err(e) => {
                warn!("Failed to read legacy state: {}", e);
                return false;
            }
        };

        match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) if value.is_object() => {}
            _ => return false,
        }

        let moved = backend
            .set(&self.full_key(STATE_KEY), &raw)
            .and_then(|()| backend.remove(old_key));
        match moved {
            Ok(()) => {
                debug!("Migrated legacy player state from '{}'", old_key);
                true
            }
            Err(e) => {
                warn!("Failed to migrate legacy state: {}", e);
                false
            }
        }
    }
}
