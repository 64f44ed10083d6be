/// Core error types for ytmp
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Internal error type shared by the ytmp crates
#[derive(Error, Debug)]
pub enum CoreError {
    /// Malformed media reference or identifier
    #[error("Invalid reference: {0}")]
    InvalidReference(String),

    /// Persistence backend errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl CoreError {
    /// Create an invalid reference error
    pub fn invalid_reference(msg: impl Into<String>) -> Self {
        Self::InvalidReference(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }
}

/// Error taxonomy surfaced to consumers through the `error` event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// Malformed input reference
    InvalidVideoId,
    /// The provider could not find the media
    VideoNotFound,
    /// The media owner disallows embedded playback
    VideoNotEmbeddable,
    /// Bootstrap transport failure
    NetworkError,
    /// Bootstrap or unclassified provider failure
    ApiError,
    /// Persistence failure
    StorageError,
}

impl ErrorKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidVideoId => "INVALID_VIDEO_ID",
            Self::VideoNotFound => "VIDEO_NOT_FOUND",
            Self::VideoNotEmbeddable => "VIDEO_NOT_EMBEDDABLE",
            Self::NetworkError => "NETWORK_ERROR",
            Self::ApiError => "API_ERROR",
            Self::StorageError => "STORAGE_ERROR",
        }
    }

    /// Whether the provider rejected the media itself, so another track may still play
    pub fn is_unplayable_media(&self) -> bool {
        matches!(self, Self::VideoNotFound | Self::VideoNotEmbeddable)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whatever caused a [`PlayerError`], kept opaque for consumers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorCause {
    /// Raw provider error code
    Code(i32),
    /// Rendered message of an underlying error
    Message(String),
}

/// Error payload carried by the `error` event
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[error("{kind}: {message}")]
#[serde(rename_all = "camelCase")]
pub struct PlayerError {
    /// Taxonomy bucket
    #[serde(rename = "type")]
    pub kind: ErrorKind,

    /// Human-readable description
    pub message: String,

    /// Media the error relates to, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_id: Option<String>,

    /// Underlying cause
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_error: Option<ErrorCause>,
}

impl PlayerError {
    /// Create an error with no video or cause attached
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            video_id: None,
            original_error: None,
        }
    }

    /// Attach the related video id
    #[must_use]
    pub fn with_video_id(mut self, video_id: impl Into<String>) -> Self {
        self.video_id = Some(video_id.into());
        self
    }

    /// Attach the underlying cause
    #[must_use]
    pub fn with_cause(mut self, cause: ErrorCause) -> Self {
        self.original_error = Some(cause);
        self
    }
}
