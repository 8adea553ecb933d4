//! Pipeline orchestrator for vidnote.
//!
//! Coordinates transcript resolution, translation, note generation, indexing
//! and question answering for a [`Session`].

use crate::chunking::{Chunker, ChunkingConfig, RecursiveChunker};
use crate::config::{Prompts, Settings};
use crate::content::{ContentGenerator, VideoNotes};
use crate::embedding::{Embedder, OpenAIEmbedder};
use crate::error::{Result, VidnoteError};
use crate::llm::{OpenAIGenerator, TextGenerator};
use crate::rag::{Indexer, RagAnswerer, RagResponse};
use crate::session::Session;
use crate::transcript::{
    ResolvedTranscript, TrackList, TranscriptProvider, TranscriptResolver, VideoTranscript,
    YoutubeTranscriptProvider,
};
use crate::video::extract_video_id;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// The main orchestrator for the vidnote pipeline.
pub struct Orchestrator {
    settings: Settings,
    resolver: TranscriptResolver,
    content: ContentGenerator,
    chunker: Arc<dyn Chunker>,
    indexer: Indexer,
    answerer: RagAnswerer,
}

impl Orchestrator {
    /// Create a new orchestrator backed by YouTube and the configured model API.
    pub fn new(settings: Settings) -> Result<Self> {
        // Load prompts (with optional custom directory and variables)
        let prompts = Prompts::load(
            settings.prompts.custom_dir.as_deref(),
            Some(&settings.prompts.variables),
        )?;

        let provider = Arc::new(YoutubeTranscriptProvider::new(&settings.youtube)?);
        let generator = Arc::new(OpenAIGenerator::new(&settings.llm)?);
        let embedder = Arc::new(OpenAIEmbedder::new(&settings.embedding, &settings.llm)?);

        info!(
            "Using {} for text and {} for embeddings",
            settings.llm.model, settings.embedding.model
        );

        Self::with_components(settings, prompts, provider, generator, embedder)
    }

    /// Create an orchestrator with custom components.
    pub fn with_components(
        settings: Settings,
        prompts: Prompts,
        provider: Arc<dyn TranscriptProvider>,
        generator: Arc<dyn TextGenerator>,
        embedder: Arc<dyn Embedder>,
    ) -> Result<Self> {
        let chunking = ChunkingConfig::try_from(&settings.chunking)?;
        let temperature = settings.llm.temperature;

        Ok(Self {
            resolver: TranscriptResolver::new(provider),
            content: ContentGenerator::new(generator.clone(), prompts.clone(), temperature),
            chunker: Arc::new(RecursiveChunker::new(chunking)),
            indexer: Indexer::new(embedder.clone()),
            answerer: RagAnswerer::new(generator, embedder, &settings.rag, temperature)
                .with_prompts(prompts),
            settings,
        })
    }

    /// Get the settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// List the caption tracks of a video.
    pub async fn list_tracks(&self, input: &str) -> Result<TrackList> {
        let video_id = extract_video_id(input)?;
        self.resolver.list_tracks(&video_id).await
    }

    /// Resolve the best transcript track of a video, without translating it.
    pub async fn resolve_transcript(&self, input: &str) -> Result<ResolvedTranscript> {
        let video_id = extract_video_id(input)?;
        self.resolver.resolve(&video_id).await
    }

    /// Make the video the session's active one and return its English transcript.
    ///
    /// The transcript is cached on the session until the video changes.
    #[instrument(skip(self, session), fields(session = %session.id))]
    pub async fn load_transcript(
        &self,
        session: &mut Session,
        input: &str,
    ) -> Result<VideoTranscript> {
        let video_id = extract_video_id(input)?;
        if session.activate_video(&video_id) {
            info!("Session switched to video {}", video_id);
        }

        if let Some(transcript) = session.transcript() {
            debug!("Using cached transcript for {}", video_id);
            return Ok(transcript.clone());
        }

        let resolved = self.resolver.resolve(&video_id).await?;
        let transcript = self.content.ensure_english(resolved).await?;
        session.set_transcript(transcript.clone());
        Ok(transcript)
    }

    /// Generate key topics and notes for a video.
    #[instrument(skip(self, session), fields(session = %session.id))]
    pub async fn generate_notes(&self, session: &mut Session, input: &str) -> Result<VideoNotes> {
        let transcript = self.load_transcript(session, input).await?;

        if let Some(notes) = session.notes() {
            return Ok(notes.clone());
        }

        let notes = self.content.notes_for(&transcript).await?;
        session.set_notes(notes.clone());
        Ok(notes)
    }

    /// Chunk and index a video for questions. Returns the number of indexed chunks.
    #[instrument(skip(self, session), fields(session = %session.id))]
    pub async fn prepare_chat(&self, session: &mut Session, input: &str) -> Result<usize> {
        let transcript = self.load_transcript(session, input).await?;

        if let Some(index) = session.index() {
            debug!("Reusing index for {}", transcript.video_id);
            return Ok(index.chunk_count());
        }

        let chunks = self.chunker.chunk(&transcript.text);
        info!(
            "Split transcript of {} into {} chunks",
            transcript.video_id,
            chunks.len()
        );

        let index = self.indexer.build_index(&transcript.video_id, &chunks).await?;
        let count = index.chunk_count();
        session.set_index(index);
        Ok(count)
    }

    /// Answer a question about the session's prepared video.
    #[instrument(skip(self, session), fields(session = %session.id))]
    pub async fn ask(&self, session: &mut Session, question: &str) -> Result<RagResponse> {
        let index = session.index().ok_or(VidnoteError::ChatNotReady)?;
        let response = self
            .answerer
            .answer(question, index, !session.greeted())
            .await?;

        session.record_exchange(question.trim(), &response.answer);
        Ok(response)
    }
}
