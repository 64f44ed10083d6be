//! Error types for playback management

use std::time::Duration;
use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The provider reported a state code outside the known set
    #[error("Unknown provider state: {0}")]
    UnknownProviderState(i32),

    /// The provider could not be created or driven
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider bootstrap failed
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// Configuration could not be loaded
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Domain error from the core crate
    #[error(transparent)]
    Core(#[from] ytmp_core::CoreError),
}

impl PlaybackError {
    /// Create a provider error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }
}

/// Provider bootstrap failures
///
/// Cloneable so one outcome can be handed to every caller sharing a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GatewayError {
    /// The ready hook did not fire in time
    #[error("Provider bootstrap timed out after {0:?}")]
    Timeout(Duration),

    /// The bootstrap itself failed
    #[error("Provider bootstrap failed: {0}")]
    LoadFailed(String),

    /// Bootstrap finished but no provider constructor is present
    #[error("Provider constructor is unavailable")]
    Unavailable,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(String),

    /// Values are present but unusable
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        Self::Load(err.to_string())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
