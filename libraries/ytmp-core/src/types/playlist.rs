/// Playlist and persisted snapshot types
use crate::types::{Settings, Track};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Ordered track collection with a cursor and optional shuffle permutation
///
/// Invariants (maintained by the playlist controller):
/// - non-empty: `current_index < tracks.len()`; empty: `current_index == 0`
/// - `shuffle_order.is_some() == shuffled`
/// - `shuffle_order` is a permutation of `0..tracks.len()`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    /// Tracks in insertion order
    pub tracks: Vec<Track>,

    /// Index of the current track
    pub current_index: usize,

    /// Whether traversal follows `shuffle_order`
    pub shuffled: bool,

    /// Traversal order while shuffled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shuffle_order: Option<Vec<usize>>,
}

impl Playlist {
    /// Create an empty playlist
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether there are no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track under the cursor
    pub fn current_track(&self) -> Option<&Track> {
        self.tracks.get(self.current_index)
    }

    /// Check every structural invariant
    pub fn is_consistent(&self) -> bool {
        let cursor_ok = if self.tracks.is_empty() {
            self.current_index == 0
        } else {
            self.current_index < self.tracks.len()
        };

        let order_ok = match (&self.shuffle_order, self.shuffled) {
            (Some(order), true) => is_permutation(order, self.tracks.len()),
            (None, false) => true,
            _ => false,
        };

        cursor_ok && order_ok
    }
}

/// Whether `order` contains every index of `0..len` exactly once
pub fn is_permutation(order: &[usize], len: usize) -> bool {
    if order.len() != len {
        return false;
    }
    let mut seen = vec![false; len];
    for &i in order {
        if i >= len || seen[i] {
            return false;
        }
        seen[i] = true;
    }
    true
}

/// The unit of persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSnapshot {
    /// Playlist at save time
    pub playlist: Playlist,

    /// Playback position in seconds
    pub current_time: f64,

    /// Settings at save time
    pub settings: Settings,

    /// When the snapshot was taken
    pub last_updated: DateTime<Utc>,
}

impl StateSnapshot {
    /// Snapshot the given state, stamped now
    pub fn capture(playlist: Playlist, current_time: f64, settings: Settings) -> Self {
        Self {
            playlist,
            current_time,
            settings,
            last_updated: Utc::now(),
        }
    }
}
