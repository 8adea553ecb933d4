//! RAG (Retrieval-Augmented Generation) over a single video's transcript.
//!
//! The [`Indexer`] embeds transcript chunks into a [`VectorIndex`]; the
//! [`RagAnswerer`] retrieves the closest chunks for a question and asks the
//! model to answer from them alone.

mod context;
mod index;
mod response;

pub use context::build_context;
pub use index::{Indexer, VectorIndex};
pub use response::{RagAnswerer, RagResponse, FALLBACK_ANSWER};

use crate::vector_store::SearchResult;
use serde::{Deserialize, Serialize};

/// A retrieved chunk with its similarity score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextChunk {
    /// Video ID.
    pub video_id: String,
    /// Position of the chunk in the transcript.
    pub chunk_order: usize,
    /// Text content.
    pub content: String,
    /// Similarity score.
    pub score: f32,
}

impl From<SearchResult> for ContextChunk {
    fn from(result: SearchResult) -> Self {
        Self {
            video_id: result.document.video_id,
            chunk_order: result.document.chunk_order,
            content: result.document.content,
            score: result.score,
        }
    }
}
