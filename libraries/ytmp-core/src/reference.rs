//! Media reference parsing and thumbnail derivation
//!
//! A reference is whatever a user pastes: a watch URL, a short link, an embed
//! URL, a mobile URL or the bare identifier itself.

use crate::error::{CoreError, Result};
use crate::types::{is_id_char, is_video_id, VideoId, VIDEO_ID_LEN};
use serde::{Deserialize, Serialize};
use url::Url;

/// Reason reported for any input that matches no known shape
pub const INVALID_REFERENCE_REASON: &str = "Invalid media URL or video ID";

/// Which reference shape produced the identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceShape {
    /// `youtube.com/watch?v=<id>`
    Watch,
    /// `youtu.be/<id>`
    Short,
    /// `youtube.com/embed/<id>`
    Embed,
    /// `m.youtube.com/watch?v=<id>`
    Mobile,
    /// The identifier on its own
    BareId,
}

/// A successfully parsed reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReference {
    /// Extracted identifier
    pub id: VideoId,
    /// Shape that matched
    pub shape: ReferenceShape,
}

// Checked in order; the first marker followed by a valid identifier wins.
const MARKERS: [(&str, ReferenceShape); 3] = [
    ("youtube.com/watch?v=", ReferenceShape::Watch),
    ("youtu.be/", ReferenceShape::Short),
    ("youtube.com/embed/", ReferenceShape::Embed),
];

/// Extract the media identifier from free-form input
///
/// The input is trimmed first. Anything after the 11 identifier characters is
/// ignored, so `https://youtu.be/<id>?t=42` parses to `<id>`.
pub fn parse_reference(input: &str) -> Result<ParsedReference> {
    let input = input.trim();

    if is_video_id(input) {
        return Ok(ParsedReference {
            id: VideoId::parse(input)?,
            shape: ReferenceShape::BareId,
        });
    }

    for (marker, shape) in MARKERS {
        for (pos, _) in input.match_indices(marker) {
            if let Some(id) = id_at(&input[pos + marker.len()..]) {
                let shape = if shape == ReferenceShape::Watch && input[..pos].ends_with("m.") {
                    ReferenceShape::Mobile
                } else {
                    shape
                };
                return Ok(ParsedReference { id, shape });
            }
        }
    }

    if let Some(parsed) = parse_watch_query(input) {
        return Ok(parsed);
    }

    Err(CoreError::invalid_reference(INVALID_REFERENCE_REASON))
}

/// Whether `input` parses as a media reference
pub fn is_valid_reference(input: &str) -> bool {
    parse_reference(input).is_ok()
}

/// Identifier at the start of `rest`, if its first 11 characters form one
fn id_at(rest: &str) -> Option<VideoId> {
    let candidate: String = rest.chars().take(VIDEO_ID_LEN).collect();
    if candidate.chars().count() == VIDEO_ID_LEN && candidate.chars().all(is_id_char) {
        VideoId::parse(&candidate).ok()
    } else {
        None
    }
}

/// Watch URLs whose `v` parameter is not the first query parameter
fn parse_watch_query(input: &str) -> Option<ParsedReference> {
    let url = Url::parse(input).ok()?;
    let host = url.host_str()?;
    if !(host == "youtube.com" || host.ends_with(".youtube.com")) || url.path() != "/watch" {
        return None;
    }

    let id = url
        .query_pairs()
        .find(|(key, _)| key == "v")
        .and_then(|(_, value)| VideoId::parse(&value).ok())?;

    let shape = if host == "m.youtube.com" {
        ReferenceShape::Mobile
    } else {
        ReferenceShape::Watch
    };
    Some(ParsedReference { id, shape })
}

/// Thumbnail size variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThumbnailQuality {
    Default,
    #[default]
    Medium,
    High,
    Standard,
    Maxres,
}

impl ThumbnailQuality {
    /// Image file stem used by the thumbnail host
    pub fn file_stem(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Medium => "mqdefault",
            Self::High => "hqdefault",
            Self::Standard => "sddefault",
            Self::Maxres => "maxresdefault",
        }
    }

    /// Parse a quality name, falling back to `Medium` for unknown names
    pub fn from_name(name: &str) -> Self {
        match name {
            "default" => Self::Default,
            "medium" => Self::Medium,
            "high" => Self::High,
            "standard" => Self::Standard,
            "maxres" => Self::Maxres,
            _ => Self::Medium,
        }
    }
}

/// Thumbnail URL for `id` at the given quality
pub fn thumbnail_for(id: &VideoId, quality: ThumbnailQuality) -> String {
    format!(
        "https://img.youtube.com/vi/{}/{}.jpg",
        id.as_str(),
        quality.file_stem()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "dQw4w9WgXcQ";

    #[test]
    fn parses_every_supported_shape() {
        let cases = [
            ("https://www.youtube.com/watch?v=dQw4w9WgXcQ", ReferenceShape::Watch),
            ("https://youtube.com/watch?v=dQw4w9WgXcQ&t=10s", ReferenceShape::Watch),
            ("https://youtu.be/dQw4w9WgXcQ", ReferenceShape::Short),
            ("youtu.be/dQw4w9WgXcQ?si=abc", ReferenceShape::Short),
            ("https://www.youtube.com/embed/dQw4w9WgXcQ", ReferenceShape::Embed),
            ("https://m.youtube.com/watch?v=dQw4w9WgXcQ", ReferenceShape::Mobile),
            ("dQw4w9WgXcQ", ReferenceShape::BareId),
            ("  dQw4w9WgXcQ \n", ReferenceShape::BareId),
        ];

        for (input, shape) in cases {
            let parsed = parse_reference(input).unwrap_or_else(|e| panic!("{input}: {e}"));
            assert_eq!(parsed.id, ID, "{input}");
            assert_eq!(parsed.shape, shape, "{input}");
        }
    }

    #[test]
    fn accepts_v_parameter_in_any_position() {
        let parsed =
            parse_reference("https://www.youtube.com/watch?list=PL123&v=dQw4w9WgXcQ").unwrap();
        assert_eq!(parsed.id, ID);
        assert_eq!(parsed.shape, ReferenceShape::Watch);
    }

    #[test]
    fn rejects_garbage_with_reason() {
        for input in [
            "",
            "hello",
            "https://example.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/short",
            "dQw4w9WgXc",
            "dQw4w9WgXcQQ",
        ] {
            let err = parse_reference(input).unwrap_err();
            assert!(!err.to_string().is_empty());
            assert!(!is_valid_reference(input), "{input}");
        }
    }

    #[test]
    fn thumbnail_template() {
        let id = VideoId::parse(ID).unwrap();
        assert_eq!(
            thumbnail_for(&id, ThumbnailQuality::default()),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/mqdefault.jpg"
        );
        assert_eq!(
            thumbnail_for(&id, ThumbnailQuality::Maxres),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"
        );
    }

    #[test]
    fn unknown_quality_defaults_to_medium() {
        assert_eq!(ThumbnailQuality::from_name("ultra"), ThumbnailQuality::Medium);
        assert_eq!(ThumbnailQuality::from_name("high"), ThumbnailQuality::High);
    }
}
