//! Track selection with prioritised language fallback.

use super::{ResolvedTranscript, TrackList, TranscriptProvider, TranscriptTrack, WORKING_LANGUAGE};
use crate::error::{Result, VidnoteError};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Build the ordered list of language codes to try for a video.
///
/// Order: manual English, other manual tracks, generated English (unless
/// manual English was already taken), other generated tracks. Provider order
/// is preserved inside each group and no code appears twice.
pub fn priority_list(tracks: &[TranscriptTrack]) -> Vec<String> {
    let mut manual: Vec<&str> = tracks
        .iter()
        .filter(|t| !t.is_generated)
        .map(|t| t.language_code.as_str())
        .collect();
    let mut generated: Vec<&str> = tracks
        .iter()
        .filter(|t| t.is_generated)
        .map(|t| t.language_code.as_str())
        .collect();

    let mut ordered: Vec<&str> = Vec::with_capacity(tracks.len());

    if let Some(pos) = manual.iter().position(|c| *c == WORKING_LANGUAGE) {
        ordered.push(manual.remove(pos));
    }
    ordered.append(&mut manual);

    if !ordered.contains(&WORKING_LANGUAGE) {
        if let Some(pos) = generated.iter().position(|c| *c == WORKING_LANGUAGE) {
            ordered.push(generated.remove(pos));
        }
    }
    ordered.append(&mut generated);

    let mut codes: Vec<String> = Vec::with_capacity(ordered.len());
    for code in ordered {
        if !codes.iter().any(|c| c == code) {
            codes.push(code.to_string());
        }
    }
    codes
}

/// Picks the best transcript track for a video and fetches its text.
pub struct TranscriptResolver {
    provider: Arc<dyn TranscriptProvider>,
}

impl TranscriptResolver {
    pub fn new(provider: Arc<dyn TranscriptProvider>) -> Self {
        Self { provider }
    }

    /// List the tracks of a video, reporting failures as transcript-list errors.
    pub async fn list_tracks(&self, video_id: &str) -> Result<TrackList> {
        self.provider
            .list_tracks(video_id)
            .await
            .map_err(|e| match e {
                VidnoteError::TranscriptsDisabled(_) | VidnoteError::TranscriptList(_) => e,
                other => VidnoteError::TranscriptList(other.to_string()),
            })
    }

    /// Resolve the transcript text of a video.
    #[instrument(skip(self))]
    pub async fn resolve(&self, video_id: &str) -> Result<ResolvedTranscript> {
        let tracks = self.list_tracks(video_id).await?;
        let priority = priority_list(&tracks.tracks);
        debug!("Transcript priority for {}: {:?}", video_id, priority);

        if priority.is_empty() {
            return Err(VidnoteError::NoTranscriptsAvailable(video_id.to_string()));
        }

        let track = tracks.find_track(&priority).ok_or_else(|| {
            VidnoteError::TranscriptFetch(format!(
                "no track matched any of the languages {:?}",
                priority
            ))
        })?;

        info!(
            "Selected {} transcript track '{}' for {}",
            if track.is_generated { "generated" } else { "manual" },
            track.language_code,
            video_id
        );

        let lines = self
            .provider
            .fetch_track(track)
            .await
            .map_err(|e| match e {
                VidnoteError::TranscriptFetch(_) => e,
                other => VidnoteError::TranscriptFetch(other.to_string()),
            })?;

        let full_text = lines
            .iter()
            .map(|l| l.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        if full_text.trim().is_empty() {
            return Err(VidnoteError::TranscriptFetch(format!(
                "the '{}' track of {} contains no text",
                track.language_code, video_id
            )));
        }

        debug!(
            "Fetched {} lines ({} chars)",
            lines.len(),
            full_text.chars().count()
        );

        Ok(ResolvedTranscript {
            video_id: video_id.to_string(),
            full_text,
            language_code: track.language_code.clone(),
            is_generated: track.is_generated,
        })
    }
}
