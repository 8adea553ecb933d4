//! In-memory vector store implementation.

use super::{cosine_similarity, Document, SearchResult, VectorStore};
use crate::error::{Result, VidnoteError};
use async_trait::async_trait;
use std::sync::RwLock;

/// In-memory vector store. Documents are kept in insertion order.
pub struct MemoryVectorStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryVectorStore {
    /// Create a new in-memory vector store.
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(Vec::new()),
        }
    }
}

impl Default for MemoryVectorStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> VidnoteError {
    VidnoteError::Index("vector store lock poisoned".to_string())
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn upsert_batch(&self, docs: &[Document]) -> Result<usize> {
        let mut store = self.documents.write().map_err(poisoned)?;
        for doc in docs {
            match store.iter_mut().find(|d| d.id == doc.id) {
                Some(existing) => *existing = doc.clone(),
                None => store.push(doc.clone()),
            }
        }
        Ok(docs.len())
    }

    async fn search(&self, query_embedding: &[f32], limit: usize) -> Result<Vec<SearchResult>> {
        let docs = self.documents.read().map_err(poisoned)?;

        let mut results: Vec<SearchResult> = docs
            .iter()
            .map(|doc| SearchResult {
                score: cosine_similarity(query_embedding, &doc.embedding),
                document: doc.clone(),
            })
            .collect();

        // Stable sort: ties keep insertion order, NaN scores rank last.
        results.sort_by(|a, b| rank_key(b.score).total_cmp(&rank_key(a.score)));
        results.truncate(limit);

        Ok(results)
    }

    async fn document_count(&self) -> Result<usize> {
        let docs = self.documents.read().map_err(poisoned)?;
        Ok(docs.len())
    }
}

fn rank_key(score: f32) -> f32 {
    if score.is_nan() {
        f32::NEG_INFINITY
    } else {
        score
    }
}
