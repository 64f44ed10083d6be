//! Media provider contract
//!
//! The provider is the black-box engine that actually renders media. The
//! player only drives it through [`MediaProvider`] and hears back through
//! [`ProviderEvent`]s delivered on a channel.

use crate::error::PlaybackError;
use serde::{Deserialize, Serialize};
use ytmp_core::{ErrorCause, ErrorKind, PlayerError, VideoId};

/// State reported by the provider, with its wire code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i32")]
pub enum ProviderState {
    /// Nothing loaded yet (-1)
    Unstarted,
    /// Reached the end of the media (0)
    Ended,
    /// Playing (1)
    Playing,
    /// Paused (2)
    Paused,
    /// Buffering (3)
    Buffering,
    /// Loaded and waiting to start (5)
    Cued,
}

impl ProviderState {
    /// Wire code of the state
    pub fn code(self) -> i32 {
        match self {
            Self::Unstarted => -1,
            Self::Ended => 0,
            Self::Playing => 1,
            Self::Paused => 2,
            Self::Buffering => 3,
            Self::Cued => 5,
        }
    }

    /// Parse a wire code
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Unstarted),
            0 => Some(Self::Ended),
            1 => Some(Self::Playing),
            2 => Some(Self::Paused),
            3 => Some(Self::Buffering),
            5 => Some(Self::Cued),
            _ => None,
        }
    }
}

impl From<ProviderState> for i32 {
    fn from(state: ProviderState) -> Self {
        state.code()
    }
}

impl TryFrom<i32> for ProviderState {
    type Error = PlaybackError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(PlaybackError::UnknownProviderState(code))
    }
}

/// Asynchronous signal from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The provider finished constructing and accepts commands
    Ready,
    /// Playback state changed
    StateChange(ProviderState),
    /// The provider failed with a raw error code
    Error(i32),
}

/// Commands the player issues to the provider
///
/// Implementations are expected to be cheap and non-blocking; results come
/// back as [`ProviderEvent`]s.
pub trait MediaProvider: Send {
    /// Load media and start from `start_seconds`
    fn load(&mut self, id: &VideoId, start_seconds: f64);

    fn play(&mut self);

    fn pause(&mut self);

    fn stop(&mut self);

    fn seek_to(&mut self, seconds: f64);

    /// Current position in seconds
    fn current_time(&self) -> f64;

    /// Duration of the loaded media in seconds, 0 when unknown
    fn duration(&self) -> f64;

    /// Last reported state
    fn state(&self) -> ProviderState;

    /// Set output volume (0-100)
    fn set_volume(&mut self, volume: u8);

    fn mute(&mut self);

    fn unmute(&mut self);

    fn is_muted(&self) -> bool;

    /// Tear down; no further calls follow
    fn destroy(&mut self);
}

const INVALID_ID_MESSAGE: &str = "The video ID is invalid or contains invalid characters.";
const HTML5_MESSAGE: &str = "The requested content cannot be played in an HTML5 player.";
const NOT_FOUND_MESSAGE: &str = "The video was not found or has been removed.";
const NOT_EMBEDDABLE_MESSAGE: &str =
    "The video owner does not allow it to be played in embedded players.";

/// Map a raw provider error code to the error taxonomy
///
/// The raw code is always kept as the cause.
pub fn classify_error(code: i32, video_id: Option<&VideoId>) -> PlayerError {
    let error = match code {
        2 => PlayerError::new(ErrorKind::InvalidVideoId, INVALID_ID_MESSAGE),
        5 => PlayerError::new(ErrorKind::ApiError, HTML5_MESSAGE),
        100 => PlayerError::new(ErrorKind::VideoNotFound, NOT_FOUND_MESSAGE),
        101 | 150 => PlayerError::new(ErrorKind::VideoNotEmbeddable, NOT_EMBEDDABLE_MESSAGE),
        other => PlayerError::new(
            ErrorKind::ApiError,
            format!("Unknown provider error: {other}"),
        ),
    }
    .with_cause(ErrorCause::Code(code));

    match video_id {
        Some(id) => error.with_video_id(id.as_str()),
        None => error,
    }
}
