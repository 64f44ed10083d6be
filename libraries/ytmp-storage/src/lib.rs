//! ytmp Storage
//!
//! Snapshot persistence for the ytmp player.
//!
//! This crate provides:
//! - A minimal [`KeyValueStore`] contract with in-memory and file-backed stores
//! - [`PlayerStore`]: JSON snapshot save/load under a namespaced key
//! - [`Debouncer`]: the single pending-timer resource gating writes
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ytmp_storage::{FileStore, PlayerStore};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = FileStore::open("/var/lib/ytmp")?;
//! let store = PlayerStore::new(Arc::new(backend), "ytMusicPlayer");
//!
//! if let Some(snapshot) = store.load_state() {
//!     println!("{} tracks restored", snapshot.playlist.len());
//! }
//! # Ok(())
//! # }
//! ```

mod backend;
mod debounce;
mod error;
mod player_state;

pub use backend::{FileStore, KeyValueStore, MemoryStore, StorageUsage, USAGE_ESTIMATE};
pub use debounce::{Debouncer, SAVE_DEBOUNCE, TIME_DEBOUNCE};
pub use error::{Result, StorageError};
pub use player_state::{PlayerStore, DEFAULT_PREFIX, STATE_KEY};
