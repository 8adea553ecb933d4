//! Transcript acquisition.
//!
//! A [`TranscriptProvider`] lists the caption tracks a video has and fetches
//! the lines of one of them. The [`TranscriptResolver`] decides which track to
//! use: manual English first, then any other manual track, then generated
//! English, then any other generated track.

mod resolver;
mod youtube;

pub use resolver::{priority_list, TranscriptResolver};
pub use youtube::YoutubeTranscriptProvider;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Language every downstream stage works in.
pub const WORKING_LANGUAGE: &str = "en";

/// One caption track available for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptTrack {
    /// Language code as reported by the provider (e.g. "en", "pt-BR").
    pub language_code: String,
    /// Human-readable language name.
    pub language: String,
    /// Whether the track was produced by speech recognition.
    pub is_generated: bool,
    /// Provider-specific location of the track's content.
    pub source_url: String,
}

/// A single timed line of a transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptLine {
    pub text: String,
    /// Start offset in seconds.
    pub start: f64,
    /// Duration in seconds.
    pub duration: f64,
}

/// All tracks a provider reported for one video, in provider order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackList {
    pub video_id: String,
    pub tracks: Vec<TranscriptTrack>,
}

impl TrackList {
    pub fn new(video_id: impl Into<String>, tracks: Vec<TranscriptTrack>) -> Self {
        Self {
            video_id: video_id.into(),
            tracks,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Manually created tracks, in provider order.
    pub fn manual(&self) -> impl Iterator<Item = &TranscriptTrack> {
        self.tracks.iter().filter(|t| !t.is_generated)
    }

    /// Generated tracks, in provider order.
    pub fn generated(&self) -> impl Iterator<Item = &TranscriptTrack> {
        self.tracks.iter().filter(|t| t.is_generated)
    }

    /// Return the track for the first language code that has one.
    ///
    /// For a given code a manual track wins over a generated one.
    pub fn find_track(&self, language_codes: &[String]) -> Option<&TranscriptTrack> {
        language_codes.iter().find_map(|code| {
            self.manual()
                .find(|t| &t.language_code == code)
                .or_else(|| self.generated().find(|t| &t.language_code == code))
        })
    }
}

/// The text of the selected track for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTranscript {
    pub video_id: String,
    /// All line texts joined by a single space, in original order.
    pub full_text: String,
    pub language_code: String,
    pub is_generated: bool,
}

impl ResolvedTranscript {
    pub fn is_english(&self) -> bool {
        is_working_language(&self.language_code)
    }
}

/// Transcript text ready for the content pipeline (always English).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoTranscript {
    pub video_id: String,
    /// Language of the track the text came from.
    pub source_language: String,
    pub text: String,
    /// Whether `text` was machine-translated from `source_language`.
    pub translated: bool,
}

/// Whether a language code's primary subtag is the working language.
pub fn is_working_language(language_code: &str) -> bool {
    language_code
        .split(['-', '_'])
        .next()
        .is_some_and(|primary| primary.eq_ignore_ascii_case(WORKING_LANGUAGE))
}

/// Trait for transcript providers.
#[async_trait]
pub trait TranscriptProvider: Send + Sync {
    /// List every track available for a video.
    ///
    /// Must fail with `VidnoteError::TranscriptsDisabled` when the video has
    /// captions turned off.
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList>;

    /// Fetch the lines of one track, in temporal order.
    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptLine>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(code: &str, generated: bool) -> TranscriptTrack {
        TranscriptTrack {
            language_code: code.to_string(),
            language: code.to_string(),
            is_generated: generated,
            source_url: format!("mock://{}/{}", code, generated),
        }
    }

    #[test]
    fn test_find_track_prefers_manual_for_same_code() {
        let list = TrackList::new("vid", vec![track("en", true), track("en", false)]);
        let found = list.find_track(&["en".to_string()]).unwrap();
        assert!(!found.is_generated);
    }

    #[test]
    fn test_find_track_follows_code_order() {
        let list = TrackList::new("vid", vec![track("de", true), track("fr", false)]);
        let found = list
            .find_track(&["es".to_string(), "de".to_string(), "fr".to_string()])
            .unwrap();
        assert_eq!(found.language_code, "de");
        assert!(list.find_track(&["ja".to_string()]).is_none());
    }

    #[test]
    fn test_is_working_language() {
        assert!(is_working_language("en"));
        assert!(is_working_language("en-GB"));
        assert!(is_working_language("EN_us"));
        assert!(!is_working_language("es"));
        assert!(!is_working_language("eng"));
        assert!(!is_working_language(""));
    }
}
