//! Error types for vidnote.

use thiserror::Error;

/// Library-level error type for vidnote operations.
#[derive(Error, Debug)]
pub enum VidnoteError {
    #[error("Transcripts are disabled for video {0}.")]
    TranscriptsDisabled(String),

    #[error("Error fetching transcript list: {0}")]
    TranscriptList(String),

    #[error("Could not fetch transcript data: {0}")]
    TranscriptFetch(String),

    #[error("No transcripts found for video {0}.")]
    NoTranscriptsAvailable(String),

    #[error("Translation failed: {0}")]
    Translation(String),

    #[error("Text generation failed: {0}")]
    Generation(String),

    #[error("Embedding generation failed: {0}")]
    Embedding(String),

    #[error("Vector index error: {0}")]
    Index(String),

    #[error("Could not extract a YouTube video ID from: {0}")]
    InvalidVideoUrl(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("OpenAI API error: {0}")]
    OpenAI(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("No video has been prepared for chat in this session")]
    ChatNotReady,

    #[error("Session not found: {0}")]
    SessionNotFound(String),
}

impl VidnoteError {
    /// Whether retrying the same request can never succeed.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VidnoteError::TranscriptsDisabled(_)
                | VidnoteError::NoTranscriptsAvailable(_)
                | VidnoteError::InvalidVideoUrl(_)
        )
    }
}

/// Result type alias for vidnote operations.
pub type Result<T> = std::result::Result<T, VidnoteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_errors() {
        assert!(VidnoteError::TranscriptsDisabled("abc".to_string()).is_terminal());
        assert!(VidnoteError::NoTranscriptsAvailable("abc".to_string()).is_terminal());
        assert!(!VidnoteError::TranscriptList("timeout".to_string()).is_terminal());
        assert!(!VidnoteError::Generation("rate limited".to_string()).is_terminal());
    }

    #[test]
    fn test_messages_are_readable() {
        let err = VidnoteError::TranscriptFetch("connection reset".to_string());
        assert_eq!(
            err.to_string(),
            "Could not fetch transcript data: connection reset"
        );
    }
}
