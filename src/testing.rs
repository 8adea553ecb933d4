//! In-memory providers for unit tests.

use crate::embedding::Embedder;
use crate::error::{Result, VidnoteError};
use crate::llm::{GenerationRequest, TextGenerator};
use crate::transcript::{TrackList, TranscriptLine, TranscriptProvider, TranscriptTrack};
use async_trait::async_trait;
use std::sync::Mutex;

/// Transcript provider serving fixed tracks.
#[derive(Default)]
pub struct MockTranscriptProvider {
    tracks: Vec<(TranscriptTrack, Vec<String>)>,
    disabled: bool,
    list_error: Option<String>,
    fetch_error: Option<String>,
    fetched: Mutex<Vec<(String, bool)>>,
}

impl MockTranscriptProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, code: &str, generated: bool, lines: &[&str]) -> Self {
        let track = TranscriptTrack {
            language_code: code.to_string(),
            language: format!("Language {}", code),
            is_generated: generated,
            source_url: format!("mock://{}/{}", code, if generated { "asr" } else { "manual" }),
        };
        self.tracks
            .push((track, lines.iter().map(|l| l.to_string()).collect()));
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn failing_list(mut self, message: &str) -> Self {
        self.list_error = Some(message.to_string());
        self
    }

    pub fn failing_fetch(mut self, message: &str) -> Self {
        self.fetch_error = Some(message.to_string());
        self
    }

    pub fn tracks(&self) -> Vec<TranscriptTrack> {
        self.tracks.iter().map(|(t, _)| t.clone()).collect()
    }

    /// Tracks fetched so far, as (language code, is_generated).
    pub fn fetched(&self) -> Vec<(String, bool)> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranscriptProvider for MockTranscriptProvider {
    async fn list_tracks(&self, video_id: &str) -> Result<TrackList> {
        if self.disabled {
            return Err(VidnoteError::TranscriptsDisabled(video_id.to_string()));
        }
        if let Some(message) = &self.list_error {
            return Err(VidnoteError::InvalidInput(message.clone()));
        }
        Ok(TrackList::new(video_id, self.tracks()))
    }

    async fn fetch_track(&self, track: &TranscriptTrack) -> Result<Vec<TranscriptLine>> {
        self.fetched
            .lock()
            .unwrap()
            .push((track.language_code.clone(), track.is_generated));

        if let Some(message) = &self.fetch_error {
            return Err(VidnoteError::InvalidInput(message.clone()));
        }

        let (_, lines) = self
            .tracks
            .iter()
            .find(|(t, _)| t.source_url == track.source_url)
            .ok_or_else(|| VidnoteError::TranscriptFetch("unknown track".to_string()))?;

        Ok(lines
            .iter()
            .enumerate()
            .map(|(i, text)| TranscriptLine {
                text: text.clone(),
                start: i as f64 * 2.0,
                duration: 2.0,
            })
            .collect())
    }
}

type Responder = Box<dyn Fn(&GenerationRequest) -> Result<String> + Send + Sync>;

/// Text generator that records every request it receives.
pub struct MockGenerator {
    responder: Responder,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl MockGenerator {
    pub fn with_fn<F>(responder: F) -> Self
    where
        F: Fn(&GenerationRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with the same text.
    pub fn replying(text: &str) -> Self {
        let text = text.to_string();
        Self::with_fn(move |_| Ok(text.clone()))
    }

    pub fn failing(message: &str) -> Self {
        let message = message.to_string();
        Self::with_fn(move |_| Err(VidnoteError::OpenAI(message.clone())))
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        (self.responder)(request)
    }

    fn model(&self) -> &str {
        "mock-model"
    }
}

/// Embedder counting occurrences of a fixed vocabulary, one dimension per word.
pub struct KeywordEmbedder {
    vocabulary: Vec<String>,
    model: String,
    fail: bool,
}

impl KeywordEmbedder {
    pub fn new(vocabulary: &[&str]) -> Self {
        Self {
            vocabulary: vocabulary.iter().map(|w| w.to_lowercase()).collect(),
            model: "keyword-embedder".to_string(),
            fail: false,
        }
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn failing(mut self) -> Self {
        self.fail = true;
        self
    }

    fn vectorize(&self, text: &str) -> Vec<f32> {
        let words: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();
        self.vocabulary
            .iter()
            .map(|v| words.iter().filter(|w| *w == v).count() as f32)
            .collect()
    }
}

#[async_trait]
impl Embedder for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.fail {
            return Err(VidnoteError::Embedding("embedding service unavailable".to_string()));
        }
        Ok(self.vectorize(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if self.fail {
            return Err(VidnoteError::Embedding("embedding service unavailable".to_string()));
        }
        Ok(texts.iter().map(|t| self.vectorize(t)).collect())
    }

    fn dimensions(&self) -> usize {
        self.vocabulary.len()
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
