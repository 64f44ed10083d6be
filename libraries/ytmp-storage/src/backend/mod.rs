//! Key-value backends
//!
//! The player only needs string get/set/remove under string keys, so any
//! store that can do that can hold a snapshot.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::Result;

/// Capacity assumed when reporting usage; backends expose no real quota
pub const USAGE_ESTIMATE: usize = 5 * 1024 * 1024;

/// Space taken by stored keys and values, in bytes
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StorageUsage {
    pub used: usize,
    pub available: usize,
    /// Share of [`USAGE_ESTIMATE`] in use, capped at 100
    pub percentage: f64,
}

impl StorageUsage {
    pub fn from_used(used: usize) -> Self {
        let percentage = (used as f64 / USAGE_ESTIMATE as f64 * 100.0).min(100.0);
        Self {
            used,
            available: USAGE_ESTIMATE.saturating_sub(used),
            percentage,
        }
    }
}

/// Minimal key-value contract used by [`crate::PlayerStore`]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`; removing a missing key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored
    fn keys(&self) -> Result<Vec<String>>;

    /// Remove every key starting with `prefix`, returning how many were removed
    fn clear_prefix(&self, prefix: &str) -> Result<usize> {
        let doomed: Vec<String> = self
            .keys()?
            .into_iter()
            .filter(|key| key.starts_with(prefix))
            .collect();
        for key in &doomed {
            self.remove(key)?;
        }
        Ok(doomed.len())
    }

    /// Total length of every key and value against [`USAGE_ESTIMATE`]
    fn usage(&self) -> Result<StorageUsage> {
        let mut used = 0;
        for key in self.keys()? {
            let value = self.get(&key)?.map_or(0, |v| v.len());
            used += key.len() + value;
        }
        Ok(StorageUsage::from_used(used))
    }
}
