//! YouTube video ID extraction.

use crate::error::{Result, VidnoteError};
use regex::Regex;
use std::sync::LazyLock;

/// Matches an 11-character video ID after any of the known URL markers.
static URL_VIDEO_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|vi=|youtu\.be/|embed/|shorts/|v/)([a-zA-Z0-9_-]{11})")
        .expect("video ID pattern is valid")
});

/// Matches input that is nothing but a video ID.
static BARE_VIDEO_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("bare ID pattern is valid"));

/// Extract the video ID from a YouTube URL or a bare 11-character ID.
///
/// Recognises `watch?v=`, `vi=`, `youtu.be/`, `embed/`, `shorts/` and `v/` URLs.
pub fn extract_video_id(input: &str) -> Result<String> {
    let input = input.trim();

    if let Some(caps) = URL_VIDEO_ID.captures(input) {
        if let Some(id) = caps.get(1) {
            return Ok(id.as_str().to_string());
        }
    }

    if BARE_VIDEO_ID.is_match(input) {
        return Ok(input.to_string());
    }

    Err(VidnoteError::InvalidVideoUrl(input.to_string()))
}

/// Canonical watch URL for a video ID.
pub fn watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
