//! Kind of external video linked from a course.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const VIDEO_TYPE_VIDEO: &str = "video";
pub const VIDEO_TYPE_PLAYLIST: &str = "playlist";

/// A single video or a whole playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoType {
    Video,
    Playlist,
}

impl VideoType {
    /// Convert to the database string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Video => VIDEO_TYPE_VIDEO,
            Self::Playlist => VIDEO_TYPE_PLAYLIST,
        }
    }
}

/// A video type only makes sense next to a video URL.
pub fn validate_video_link(
    video_url: Option<&str>,
    video_type: Option<VideoType>,
) -> Result<(), CoreError> {
    if video_type.is_some() && video_url.is_none() {
        return Err(CoreError::Validation(
            "video_type requires a video_url".into(),
        ));
    }
    Ok(())
}
