//! ytmp Core
//!
//! Platform-agnostic types, error taxonomy and identifier utilities shared by
//! the ytmp crates.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `Settings`, `StateSnapshot`
//! - **Error Handling**: internal `CoreError` plus the consumer-facing `PlayerError`
//! - **Identifier Utilities**: reference parsing, thumbnails, duration formatting
//!
//! # Example
//!
//! ```rust
//! use ytmp_core::{parse_reference, format_duration, Track};
//!
//! let parsed = parse_reference("https://youtu.be/dQw4w9WgXcQ").unwrap();
//! let track = Track::new(parsed.id, "Never Gonna Give You Up");
//!
//! assert_eq!(track.url, "https://youtu.be/dQw4w9WgXcQ");
//! assert_eq!(format_duration(213.0), "3:33");
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod reference;
pub mod time;
pub mod types;

// Re-export commonly used types
pub use error::{CoreError, ErrorCause, ErrorKind, PlayerError, Result};
pub use reference::{
    is_valid_reference, parse_reference, thumbnail_for, ParsedReference, ReferenceShape,
    ThumbnailQuality,
};
pub use time::{format_duration, parse_duration};
pub use types::{
    is_permutation, Playlist, RepeatMode, Settings, StateSnapshot, Track, TrackMetadata, VideoId,
};
