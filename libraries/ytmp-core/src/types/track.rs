/// Track domain type
use crate::reference::{thumbnail_for, ThumbnailQuality};
use crate::types::VideoId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One playable media item
///
/// Everything except `duration` is fixed once the track is queued; the duration
/// stays at `0.0` until the provider reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Track {
    /// Media identifier
    pub id: VideoId,

    /// Display title
    pub title: String,

    /// Artist name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artist: Option<String>,

    /// Free-form tags
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<BTreeSet<String>>,

    /// Duration in seconds (0 until known)
    #[serde(default)]
    pub duration: f64,

    /// Thumbnail URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    /// Canonical reference
    pub url: String,

    /// When the track was queued
    pub added_at: DateTime<Utc>,
}

impl Track {
    /// Create a track with a default thumbnail and canonical URL
    pub fn new(id: VideoId, title: impl Into<String>) -> Self {
        Self {
            thumbnail: Some(thumbnail_for(&id, ThumbnailQuality::Medium)),
            url: id.canonical_url(),
            id,
            title: title.into(),
            artist: None,
            tags: None,
            duration: 0.0,
            added_at: Utc::now(),
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the tags
    #[must_use]
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    /// Whether the provider has reported a duration yet
    pub fn has_duration(&self) -> bool {
        self.duration > 0.0
    }
}

/// Caller-supplied metadata for queuing a track by identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackMetadata {
    /// Bare media identifier
    pub id: String,

    /// Display title
    pub title: String,

    /// Artist name
    #[serde(default)]
    pub artist: Option<String>,

    /// Free-form tags
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}
