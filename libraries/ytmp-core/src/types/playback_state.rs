/// Playback settings types
use serde::{Deserialize, Serialize};

/// Repeat mode for playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatMode {
    /// Play through once
    #[default]
    None,
    /// Loop the current track
    One,
    /// Loop the whole playlist
    All,
}

impl RepeatMode {
    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::One => "one",
            Self::All => "all",
        }
    }

    /// Parse from string
    #[must_use]
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(Self::None),
            "one" => Some(Self::One),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Next mode in the `none -> all -> one -> none` cycle
    #[must_use]
    pub fn cycle(self) -> Self {
        match self {
            Self::None => Self::All,
            Self::All => Self::One,
            Self::One => Self::None,
        }
    }
}

impl std::fmt::Display for RepeatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User-facing playback settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Volume level (0-100)
    pub volume: u8,

    /// Repeat mode
    pub repeat_mode: RepeatMode,

    /// Whether shuffle is enabled
    pub shuffled: bool,

    /// Start playback automatically after jumping to a track
    pub autoplay: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 80,
            repeat_mode: RepeatMode::All,
            shuffled: false,
            autoplay: false,
        }
    }
}
