//! Text generation for translation, topics, notes and answers.

mod openai;

pub use openai::OpenAIGenerator;

use crate::error::{Result, VidnoteError};
use async_trait::async_trait;

/// A single prompt sent to a text generation model.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Instructions sent as the system message.
    pub system: Option<String>,
    /// The user message.
    pub prompt: String,
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, temperature: f32) -> Self {
        Self {
            system: None,
            prompt: prompt.into(),
            temperature,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }
}

/// Trait for text generation models.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for the request and return its text verbatim.
    async fn generate(&self, request: &GenerationRequest) -> Result<String>;

    /// Name of the underlying model.
    fn model(&self) -> &str;
}

/// Report any failure of a generation call as a [`VidnoteError::Generation`].
pub(crate) fn as_generation_error(e: VidnoteError) -> VidnoteError {
    match e {
        VidnoteError::Generation(_) => e,
        other => VidnoteError::Generation(other.to_string()),
    }
}
