/// Media identifier type
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of a media identifier
pub const VIDEO_ID_LEN: usize = 11;

/// Opaque 11-character media identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VideoId(String);

impl VideoId {
    /// Validate and wrap a bare identifier
    pub fn parse(id: &str) -> Result<Self> {
        if is_video_id(id) {
            Ok(Self(id.to_string()))
        } else {
            Err(CoreError::invalid_reference(format!(
                "'{id}' is not an {VIDEO_ID_LEN}-character media identifier"
            )))
        }
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Canonical short URL for this identifier
    pub fn canonical_url(&self) -> String {
        format!("https://youtu.be/{}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PartialEq<str> for VideoId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for VideoId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Whether `c` may appear in a media identifier
pub(crate) fn is_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Whether `s` is exactly one media identifier
pub(crate) fn is_video_id(s: &str) -> bool {
    s.len() == VIDEO_ID_LEN && s.chars().all(is_id_char)
}
