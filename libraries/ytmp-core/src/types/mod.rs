mod ids;
mod playback_state;
mod playlist;
mod track;

pub use ids::{VideoId, VIDEO_ID_LEN};
pub(crate) use ids::{is_id_char, is_video_id};
pub use playback_state::{RepeatMode, Settings};
pub use playlist::{is_permutation, Playlist, StateSnapshot};
pub use track::{Track, TrackMetadata};
