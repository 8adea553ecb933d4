//! Per-user session state.
//!
//! A session works on one video at a time. Everything derived from that video
//! (transcript, notes, index, chat history, greeting flag) is cleared together
//! when a different video is activated.

use crate::content::VideoNotes;
use crate::rag::VectorIndex;
use crate::transcript::VideoTranscript;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who wrote a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in a chat history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Utc>,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
            at: Utc::now(),
        }
    }
}

/// State for one user of the pipeline.
#[derive(Debug)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    video_id: Option<String>,
    transcript: Option<VideoTranscript>,
    notes: Option<VideoNotes>,
    index: Option<VectorIndex>,
    history: Vec<ChatTurn>,
    greeted: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            video_id: None,
            transcript: None,
            notes: None,
            index: None,
            history: Vec::new(),
            greeted: false,
        }
    }

    pub fn video_id(&self) -> Option<&str> {
        self.video_id.as_deref()
    }

    /// Make `video_id` the active video. Returns true if the video changed.
    pub fn activate_video(&mut self, video_id: &str) -> bool {
        if self.video_id.as_deref() == Some(video_id) {
            return false;
        }
        self.video_id = Some(video_id.to_string());
        self.transcript = None;
        self.notes = None;
        self.index = None;
        self.history.clear();
        self.greeted = false;
        true
    }

    pub fn transcript(&self) -> Option<&VideoTranscript> {
        self.transcript.as_ref()
    }

    pub fn set_transcript(&mut self, transcript: VideoTranscript) {
        self.transcript = Some(transcript);
    }

    pub fn notes(&self) -> Option<&VideoNotes> {
        self.notes.as_ref()
    }

    pub fn set_notes(&mut self, notes: VideoNotes) {
        self.notes = Some(notes);
    }

    pub fn index(&self) -> Option<&VectorIndex> {
        self.index.as_ref()
    }

    pub fn set_index(&mut self, index: VectorIndex) {
        self.index = Some(index);
    }

    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// Whether the assistant has already greeted the user for this video.
    pub fn greeted(&self) -> bool {
        self.greeted
    }

    /// Record a completed question and answer.
    pub fn record_exchange(&mut self, question: &str, answer: &str) {
        self.history.push(ChatTurn::user(question));
        self.history.push(ChatTurn::assistant(answer));
        self.greeted = true;
    }

    /// Forget the conversation but keep the video and its index.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.greeted = false;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transcript(video_id: &str) -> VideoTranscript {
        VideoTranscript {
            video_id: video_id.to_string(),
            source_language: "en".to_string(),
            text: "text".to_string(),
            translated: false,
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.video_id().is_none());
        assert!(session.history().is_empty());
        assert!(!session.greeted());
    }

    #[test]
    fn test_same_video_keeps_state() {
        let mut session = Session::new();
        assert!(session.activate_video("aaaaaaaaaaa"));
        session.set_transcript(transcript("aaaaaaaaaaa"));
        session.record_exchange("q", "a");

        assert!(!session.activate_video("aaaaaaaaaaa"));
        assert!(session.transcript().is_some());
        assert_eq!(session.history().len(), 2);
        assert!(session.greeted());
    }

    #[test]
    fn test_new_video_clears_state() {
        let mut session = Session::new();
        session.activate_video("aaaaaaaaaaa");
        session.set_transcript(transcript("aaaaaaaaaaa"));
        session.record_exchange("q", "a");

        assert!(session.activate_video("bbbbbbbbbbb"));
        assert_eq!(session.video_id(), Some("bbbbbbbbbbb"));
        assert!(session.transcript().is_none());
        assert!(session.index().is_none());
        assert!(session.history().is_empty());
        assert!(!session.greeted());
    }

    #[test]
    fn test_exchange_order_and_clear() {
        let mut session = Session::new();
        session.record_exchange("question", "answer");
        let roles: Vec<Role> = session.history().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::User, Role::Assistant]);

        session.clear_history();
        assert!(session.history().is_empty());
        assert!(!session.greeted());
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_string(&ChatTurn::user("hi")).unwrap();
        assert!(json.contains("\"role\":\"user\""));
    }
}
