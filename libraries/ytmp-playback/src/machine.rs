//! Playback state-machine policy
//!
//! Pure decisions the player makes in reaction to provider signals. Keeping
//! them here lets the rules be tested without a provider.

use crate::provider::ProviderState;
use ytmp_core::{ErrorKind, RepeatMode};

/// Reaction to a track reaching its end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndedAction {
    /// Seek to 0 and play again
    Restart,
    /// Move to the next track in traversal order, wrapping at the end
    Advance,
}

/// Decide what happens when the provider reports `Ended`
///
/// Only repeat-one holds on the current track. Repeat none advances like
/// repeat all, so the last track wraps to the first.
pub fn on_ended(repeat: RepeatMode) -> EndedAction {
    match repeat {
        RepeatMode::One => EndedAction::Restart,
        RepeatMode::All | RepeatMode::None => EndedAction::Advance,
    }
}

/// Whether a provider error should skip to the next track
///
/// Only media the provider refuses outright is skipped, and only when there is
/// somewhere else to go.
pub fn should_auto_skip(kind: ErrorKind, track_count: usize) -> bool {
    kind.is_unplayable_media() && track_count > 1
}

/// States after which the provider knows the media duration
pub fn reports_duration(state: ProviderState) -> bool {
    matches!(state, ProviderState::Playing | ProviderState::Cued)
}

/// Percent of `duration` reached at `current_time`, 0 when unknown
pub fn progress(current_time: f64, duration: f64) -> f64 {
    if duration > 0.0 {
        current_time / duration * 100.0
    } else {
        0.0
    }
}

/// Detects position changes between sampling frames
#[derive(Debug, Clone, Default)]
pub struct TimeSampler {
    last: Option<f64>,
}

impl TimeSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample; `true` when it differs from the previous one
    pub fn observe(&mut self, current_time: f64) -> bool {
        let changed = self.last != Some(current_time);
        self.last = Some(current_time);
        changed
    }

    /// Forget the previous sample
    pub fn reset(&mut self) {
        self.last = None;
    }
}
