//! Playlist controller
//!
//! Owns the track list, the cursor and the shuffle permutation. All methods
//! are pure index bookkeeping; the caller performs the provider side effects
//! the returned values ask for.
//!
//! ```text
//! tracks:        [A, B, C, D]
//! current_index:     ^ 1
//! shuffle_order: [1, 3, 0, 2]   traversal: B -> D -> A -> C -> B ...
//! ```

use crate::shuffle::shuffle_order;
use ytmp_core::{is_permutation, Playlist, Track};

/// What the caller must do after a removal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveEffect {
    /// The cursor still points at the same track
    None,
    /// The current track was removed; load the track now under the cursor
    Reload,
    /// The playlist is now empty; stop playback
    Stop,
}

/// A successful removal
#[derive(Debug, Clone, PartialEq)]
pub struct Removed {
    /// The track taken out
    pub track: Track,
    /// Follow-up for the caller
    pub effect: RemoveEffect,
}

/// Index logic over a [`Playlist`]
#[derive(Debug, Clone, Default)]
pub struct PlaylistController {
    playlist: Playlist,
}

impl PlaylistController {
    /// Create an empty controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt a restored playlist, repairing anything inconsistent
    ///
    /// The cursor is clamped into range, `shuffled` follows the settings flag,
    /// and a missing or invalid shuffle order is regenerated.
    pub fn restore(mut playlist: Playlist, shuffled: bool) -> Self {
        let len = playlist.tracks.len();
        if len == 0 {
            playlist.current_index = 0;
        } else if playlist.current_index >= len {
            playlist.current_index = len - 1;
        }

        playlist.shuffled = shuffled;
        if shuffled {
            let valid = playlist
                .shuffle_order
                .as_deref()
                .is_some_and(|order| is_permutation(order, len));
            if !valid {
                playlist.shuffle_order = Some(shuffle_order(len, playlist.current_index));
            }
        } else {
            playlist.shuffle_order = None;
        }

        Self { playlist }
    }

    /// Borrow the playlist
    pub fn playlist(&self) -> &Playlist {
        &self.playlist
    }

    pub fn len(&self) -> usize {
        self.playlist.len()
    }

    pub fn is_empty(&self) -> bool {
        self.playlist.is_empty()
    }

    pub fn current_index(&self) -> usize {
        self.playlist.current_index
    }

    pub fn current_track(&self) -> Option<&Track> {
        self.playlist.current_track()
    }

    /// Whether traversal follows a shuffle order
    pub fn is_shuffled(&self) -> bool {
        self.playlist.shuffled
    }

    /// Append a track
    ///
    /// Returns `true` when it is the only track, in which case the cursor is
    /// reset to it and the caller should load it.
    pub fn add(&mut self, track: Track) -> bool {
        self.playlist.tracks.push(track);
        let first = self.playlist.tracks.len() == 1;
        if first {
            self.playlist.current_index = 0;
        }
        self.reshuffle_if_active();
        first
    }

    /// Remove the track at `index`
    ///
    /// Returns `None` when `index` is out of bounds.
    pub fn remove(&mut self, index: usize) -> Option<Removed> {
        if index >= self.playlist.tracks.len() {
            return None;
        }

        let track = self.playlist.tracks.remove(index);
        let current = self.playlist.current_index;

        let effect = if index < current {
            self.playlist.current_index -= 1;
            RemoveEffect::None
        } else if index == current {
            if self.playlist.tracks.is_empty() {
                self.playlist.current_index = 0;
                RemoveEffect::Stop
            } else {
                if current >= self.playlist.tracks.len() {
                    self.playlist.current_index = 0;
                }
                RemoveEffect::Reload
            }
        } else {
            RemoveEffect::None
        };

        self.reshuffle_if_active();
        Some(Removed { track, effect })
    }

    /// Index after the current one in traversal order, wrapping around
    pub fn next_index(&self) -> Option<usize> {
        let len = self.playlist.tracks.len();
        if len == 0 {
            return None;
        }

        match &self.playlist.shuffle_order {
            Some(order) if self.playlist.shuffled && !order.is_empty() => {
                let pos = self.shuffle_position(order);
                Some(order[(pos + 1) % order.len()])
            }
            _ => Some((self.playlist.current_index + 1) % len),
        }
    }

    /// Index before the current one in traversal order, wrapping around
    pub fn previous_index(&self) -> Option<usize> {
        let len = self.playlist.tracks.len();
        if len == 0 {
            return None;
        }

        match &self.playlist.shuffle_order {
            Some(order) if self.playlist.shuffled && !order.is_empty() => {
                let pos = self.shuffle_position(order);
                let prev = if pos == 0 { order.len() - 1 } else { pos - 1 };
                Some(order[prev])
            }
            _ => {
                let current = self.playlist.current_index;
                Some(if current == 0 { len - 1 } else { current - 1 })
            }
        }
    }

    fn shuffle_position(&self, order: &[usize]) -> usize {
        order
            .iter()
            .position(|&i| i == self.playlist.current_index)
            .unwrap_or(0)
    }

    /// Move the cursor; `false` (and no change) when out of bounds
    pub fn jump(&mut self, index: usize) -> bool {
        if index >= self.playlist.tracks.len() {
            return false;
        }
        self.playlist.current_index = index;
        true
    }

    /// Turn shuffle on (fresh order, current track first) or off (order dropped)
    pub fn set_shuffle(&mut self, enabled: bool) {
        self.playlist.shuffled = enabled;
        self.playlist.shuffle_order = if enabled {
            Some(shuffle_order(
                self.playlist.tracks.len(),
                self.playlist.current_index,
            ))
        } else {
            None
        };
    }

    /// Drop every track
    ///
    /// Shuffle stays enabled if it was, with an empty order.
    pub fn clear(&mut self) {
        self.playlist.tracks.clear();
        self.playlist.current_index = 0;
        self.reshuffle_if_active();
    }

    /// Record the provider-reported duration on the current track, once
    ///
    /// Returns `true` when the track changed.
    pub fn fill_current_duration(&mut self, duration: f64) -> bool {
        if duration.is_nan() || duration <= 0.0 {
            return false;
        }
        let index = self.playlist.current_index;
        match self.playlist.tracks.get_mut(index) {
            Some(track) if !track.has_duration() => {
                track.duration = duration;
                true
            }
            _ => false,
        }
    }

    fn reshuffle_if_active(&mut self) {
        if self.playlist.shuffled {
            self.playlist.shuffle_order = Some(shuffle_order(
                self.playlist.tracks.len(),
                self.playlist.current_index,
            ));
        }
    }
}
