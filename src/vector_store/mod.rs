//! Vector store abstraction for chunk retrieval.
//!
//! Provides a trait-based interface so the index can be backed by different
//! stores. Only the in-memory store ships today.

mod memory;

pub use memory::MemoryVectorStore;

use crate::chunking::Chunk;
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A chunk stored together with its embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID.
    pub id: Uuid,
    /// Video ID this document belongs to.
    pub video_id: String,
    /// Text content of this chunk.
    pub content: String,
    /// Order of this chunk in the video.
    pub chunk_order: usize,
    /// Embedding vector.
    pub embedding: Vec<f32>,
}

impl Document {
    /// Create a document for an embedded chunk.
    pub fn from_chunk(video_id: &str, chunk: &Chunk, embedding: Vec<f32>) -> Self {
        Self {
            id: Uuid::new_v4(),
            video_id: video_id.to_string(),
            content: chunk.text.clone(),
            chunk_order: chunk.order,
            embedding,
        }
    }
}

/// A search result with score.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// The matched document.
    pub document: Document,
    /// Similarity score (higher is better).
    pub score: f32,
}

/// Trait for vector store implementations.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Bulk insert documents, returning how many were stored.
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize>;

    /// Search for the `limit` most similar documents, best first.
    ///
    /// Documents with equal scores keep their insertion order.
    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>>;

    /// Get total document count.
    async fn document_count(&self) -> Result<usize>;
}

/// Compute cosine similarity between two vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot_product / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 0.001);

        let c = vec![0.0, 1.0, 0.0];
        assert!((cosine_similarity(&a, &c)).abs() < 0.001);

        let d = vec![-1.0, 0.0, 0.0];
        assert!((cosine_similarity(&a, &d) + 1.0).abs() < 0.001);
    }

    #[test]
    fn test_cosine_similarity_degenerate_inputs() {
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_document_from_chunk() {
        let chunk = Chunk::new("some text", 3);
        let doc = Document::from_chunk("abc", &chunk, vec![0.5]);
        assert_eq!(doc.video_id, "abc");
        assert_eq!(doc.content, "some text");
        assert_eq!(doc.chunk_order, 3);
    }
}
