//! RAG response generation.

use super::{build_context, ContextChunk, VectorIndex};
use crate::config::{Prompts, RagSettings};
use crate::embedding::Embedder;
use crate::error::{Result, VidnoteError};
use crate::llm::{as_generation_error, GenerationRequest, TextGenerator};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Reply used when the transcript does not contain the answer.
pub const FALLBACK_ANSWER: &str =
    "I couldn't find that information in the database. Could you please rephrase or ask something else?";

/// Answers questions from the chunks of a [`VectorIndex`].
pub struct RagAnswerer {
    generator: Arc<dyn TextGenerator>,
    embedder: Arc<dyn Embedder>,
    prompts: Prompts,
    top_k: usize,
    temperature: f32,
}

impl RagAnswerer {
    /// Create a new answerer.
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        embedder: Arc<dyn Embedder>,
        settings: &RagSettings,
        temperature: f32,
    ) -> Self {
        Self {
            generator,
            embedder,
            prompts: Prompts::default(),
            top_k: settings.top_k,
            temperature,
        }
    }

    /// Set custom prompts (with user-defined variables).
    pub fn with_prompts(mut self, prompts: Prompts) -> Self {
        self.prompts = prompts;
        self
    }

    /// Answer a question from the indexed transcript.
    ///
    /// `first_turn` asks the model to open with a greeting.
    #[instrument(skip(self, index), fields(video_id = %index.video_id()))]
    pub async fn answer(
        &self,
        question: &str,
        index: &VectorIndex,
        first_turn: bool,
    ) -> Result<RagResponse> {
        let question = question.trim();
        if question.is_empty() {
            return Err(VidnoteError::InvalidInput("question is empty".to_string()));
        }

        if index.embedding_model() != self.embedder.model_name() {
            return Err(VidnoteError::Index(format!(
                "index was built with '{}' but questions are embedded with '{}'",
                index.embedding_model(),
                self.embedder.model_name()
            )));
        }

        info!("Processing question: {}", question);

        let query_embedding = self.embedder.embed(question).await?;
        let sources: Vec<ContextChunk> = index
            .search(&query_embedding, self.top_k)
            .await?
            .into_iter()
            .map(ContextChunk::from)
            .collect();

        if sources.is_empty() {
            debug!("Nothing retrieved, returning fallback");
            return Ok(RagResponse {
                answer: FALLBACK_ANSWER.to_string(),
                sources,
            });
        }

        let greeting = if first_turn {
            &self.prompts.rag.first_turn
        } else {
            &self.prompts.rag.follow_up
        };

        let mut vars = HashMap::new();
        vars.insert("fallback".to_string(), FALLBACK_ANSWER.to_string());
        vars.insert("context".to_string(), build_context(&sources));
        vars.insert("question".to_string(), question.to_string());
        vars.insert("greeting".to_string(), greeting.clone());

        let request = GenerationRequest::new(
            self.prompts.render_with_custom(&self.prompts.rag.user, &vars),
            self.temperature,
        )
        .with_system(self.prompts.render_with_custom(&self.prompts.rag.system, &vars));

        let answer = self
            .generator
            .generate(&request)
            .await
            .map_err(as_generation_error)?;

        debug!("Generated response with {} sources", sources.len());

        Ok(RagResponse { answer, sources })
    }
}

/// A RAG response with answer and sources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagResponse {
    /// The generated answer.
    pub answer: String,
    /// Chunks retrieved for the question, best first.
    pub sources: Vec<ContextChunk>,
}

impl RagResponse {
    /// Whether the answer is the fallback reply.
    pub fn is_fallback(&self) -> bool {
        self.answer.trim() == FALLBACK_ANSWER
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunking::Chunk;
    use crate::rag::Indexer;
    use crate::testing::{KeywordEmbedder, MockGenerator};

    const VOCABULARY: &[&str] = &["rust", "borrow", "memory", "async", "python", "garden"];

    async fn index_of(texts: &[&str]) -> VectorIndex {
        let chunks: Vec<Chunk> = texts
            .iter()
            .enumerate()
            .map(|(i, t)| Chunk::new(*t, i))
            .collect();
        Indexer::new(Arc::new(KeywordEmbedder::new(VOCABULARY)))
            .build_index("vid", &chunks)
            .await
            .unwrap()
    }

    fn answerer(generator: Arc<MockGenerator>) -> RagAnswerer {
        RagAnswerer::new(
            generator,
            Arc::new(KeywordEmbedder::new(VOCABULARY)),
            &RagSettings::default(),
            0.2,
        )
    }

    #[tokio::test]
    async fn test_answer_uses_top_chunks_as_context() {
        let index = index_of(&[
            "rust borrow checker",
            "python garden",
            "rust memory safety",
            "async rust",
            "garden tips",
            "rust rust borrow memory",
        ])
        .await;
        let generator = Arc::new(MockGenerator::replying("Rust is memory safe."));

        let response = answerer(generator.clone())
            .answer("How does rust handle memory?", &index, false)
            .await
            .unwrap();

        assert_eq!(response.answer, "Rust is memory safe.");
        let order: Vec<usize> = response.sources.iter().map(|s| s.chunk_order).collect();
        assert_eq!(order, vec![2, 5, 0, 3]);

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        let expected_context = response
            .sources
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        assert!(requests[0].prompt.contains(&expected_context));
        assert!(requests[0].prompt.contains("How does rust handle memory?"));
        assert!(requests[0]
            .system
            .as_deref()
            .unwrap()
            .contains(FALLBACK_ANSWER));
    }

    #[tokio::test]
    async fn test_model_output_returned_verbatim() {
        let index = index_of(&["rust"]).await;
        let reply = "  Hello!\n\nRust is great.  ";
        let generator = Arc::new(MockGenerator::replying(reply));

        let response = answerer(generator).answer("rust?", &index, true).await.unwrap();
        assert_eq!(response.answer, reply);
    }

    #[tokio::test]
    async fn test_greeting_follows_first_turn_flag() {
        let index = index_of(&["rust"]).await;
        let generator = Arc::new(MockGenerator::replying("ok"));
        let answerer = answerer(generator.clone());
        let prompts = Prompts::default();

        answerer.answer("rust?", &index, true).await.unwrap();
        answerer.answer("rust?", &index, false).await.unwrap();

        let requests = generator.requests();
        assert!(requests[0].prompt.contains(&prompts.rag.first_turn));
        assert!(!requests[0].prompt.contains(&prompts.rag.follow_up));
        assert!(requests[1].prompt.contains(&prompts.rag.follow_up));
    }

    #[tokio::test]
    async fn test_unanswerable_question_gets_fallback() {
        let index = index_of(&["rust borrow", "async memory"]).await;
        let generator = Arc::new(MockGenerator::with_fn(|request| {
            Ok(if request.prompt.contains("garden") {
                FALLBACK_ANSWER.to_string()
            } else {
                "something".to_string()
            })
        }));

        let response = answerer(generator)
            .answer("What about the garden?", &index, false)
            .await
            .unwrap();
        assert!(response.is_fallback());
    }

    #[tokio::test]
    async fn test_embedding_model_mismatch() {
        let index = index_of(&["rust"]).await;
        let answerer = RagAnswerer::new(
            Arc::new(MockGenerator::replying("ok")),
            Arc::new(KeywordEmbedder::new(VOCABULARY).with_model("other")),
            &RagSettings::default(),
            0.2,
        );
        assert!(matches!(
            answerer.answer("rust?", &index, false).await,
            Err(VidnoteError::Index(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_question_rejected() {
        let index = index_of(&["rust"]).await;
        let generator = Arc::new(MockGenerator::replying("ok"));
        assert!(matches!(
            answerer(generator.clone()).answer("   ", &index, false).await,
            Err(VidnoteError::InvalidInput(_))
        ));
        assert!(generator.requests().is_empty());
    }

    #[tokio::test]
    async fn test_generator_failure_propagates() {
        let index = index_of(&["rust"]).await;
        let generator = Arc::new(MockGenerator::failing("rate limited"));
        let err = answerer(generator)
            .answer("rust?", &index, false)
            .await
            .unwrap_err();
        assert!(matches!(err, VidnoteError::Generation(ref m) if m.contains("rate limited")));
    }

    #[tokio::test]
    async fn test_placeholders_in_chunks_reach_model_verbatim() {
        let chunk = "rust says {{question}} and {{greeting}}";
        let index = index_of(&[chunk]).await;
        let generator = Arc::new(MockGenerator::replying("ok"));

        answerer(generator.clone())
            .answer("What does rust say?", &index, false)
            .await
            .unwrap();

        let requests = generator.requests();
        assert!(requests[0].prompt.contains(chunk));
        assert!(requests[0].prompt.contains("What does rust say?"));
    }
}
