//! OpenAI embeddings implementation.

use super::Embedder;
use crate::config::{EmbeddingSettings, LlmSettings};
use crate::error::{Result, VidnoteError};
use crate::openai::create_client;
use async_openai::types::{CreateEmbeddingRequestArgs, EmbeddingInput};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Inputs sent per embeddings request.
const BATCH_SIZE: usize = 100;

/// OpenAI-based embedder.
pub struct OpenAIEmbedder {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
    dimensions: usize,
}

impl OpenAIEmbedder {
    /// Create an embedder sharing the connection settings of the LLM client.
    pub fn new(settings: &EmbeddingSettings, llm: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(llm)?,
            model: settings.model.clone(),
            dimensions: settings.dimensions as usize,
        })
    }
}

#[async_trait]
impl Embedder for OpenAIEmbedder {
    #[instrument(skip(self, text))]
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let embeddings = self.embed_batch(&[text.to_string()]).await?;
        embeddings
            .into_iter()
            .next()
            .ok_or_else(|| VidnoteError::Embedding("Empty embedding response".to_string()))
    }

    #[instrument(skip(self, texts), fields(count = texts.len()))]
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!("Generating embeddings for {} texts", texts.len());
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(BATCH_SIZE) {
            let request = CreateEmbeddingRequestArgs::default()
                .model(&self.model)
                .input(EmbeddingInput::StringArray(batch.to_vec()))
                .dimensions(self.dimensions as u32)
                .build()
                .map_err(|e| VidnoteError::Embedding(format!("Failed to build request: {}", e)))?;

            let response = self
                .client
                .embeddings()
                .create(request)
                .await
                .map_err(|e| VidnoteError::Embedding(format!("Embedding API error: {}", e)))?;

            if response.data.len() != batch.len() {
                return Err(VidnoteError::Embedding(format!(
                    "Expected {} embeddings, got {}",
                    batch.len(),
                    response.data.len()
                )));
            }

            let mut embeddings = response.data;
            embeddings.sort_by_key(|e| e.index);
            all_embeddings.extend(embeddings.into_iter().map(|e| e.embedding));
        }

        debug!("Generated {} embeddings", all_embeddings.len());
        Ok(all_embeddings)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedder_creation() {
        let embedder =
            OpenAIEmbedder::new(&EmbeddingSettings::default(), &LlmSettings::default()).unwrap();
        assert_eq!(embedder.dimensions(), 1536);
        assert_eq!(embedder.model_name(), "text-embedding-3-small");

        let settings = EmbeddingSettings {
            model: "text-embedding-3-large".to_string(),
            dimensions: 3072,
        };
        let embedder = OpenAIEmbedder::new(&settings, &LlmSettings::default()).unwrap();
        assert_eq!(embedder.dimensions(), 3072);
    }
}
