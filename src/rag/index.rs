//! Building a searchable index from transcript chunks.

use crate::chunking::Chunk;
use crate::embedding::Embedder;
use crate::error::{Result, VidnoteError};
use crate::vector_store::{Document, MemoryVectorStore, SearchResult, VectorStore};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Embedded chunks of one video, ready for similarity search.
pub struct VectorIndex {
    video_id: String,
    store: Arc<dyn VectorStore>,
    embedding_model: String,
    dimensions: usize,
    chunk_count: usize,
}

impl VectorIndex {
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Model that produced the stored embeddings.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_count
    }

    /// Return the `k` chunks closest to the query embedding, best first.
    pub async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchResult>> {
        if query_embedding.len() != self.dimensions {
            return Err(VidnoteError::Index(format!(
                "query has {} dimensions, index has {}",
                query_embedding.len(),
                self.dimensions
            )));
        }
        self.store.search(query_embedding, k).await
    }
}

impl std::fmt::Debug for VectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndex")
            .field("video_id", &self.video_id)
            .field("embedding_model", &self.embedding_model)
            .field("dimensions", &self.dimensions)
            .field("chunk_count", &self.chunk_count)
            .finish()
    }
}

/// Embeds chunks and stores them in a fresh vector store.
pub struct Indexer {
    embedder: Arc<dyn Embedder>,
}

impl Indexer {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self { embedder }
    }

    /// Build an index over all chunks. Either every chunk is stored or an error is returned.
    #[instrument(skip(self, chunks), fields(chunks = chunks.len()))]
    pub async fn build_index(&self, video_id: &str, chunks: &[Chunk]) -> Result<VectorIndex> {
        if chunks.is_empty() {
            return Err(VidnoteError::Index("no chunks to index".to_string()));
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        if embeddings.len() != chunks.len() {
            return Err(VidnoteError::Index(format!(
                "expected {} embeddings, got {}",
                chunks.len(),
                embeddings.len()
            )));
        }

        let dimensions = embeddings.first().map(Vec::len).unwrap_or(0);
        if dimensions == 0 {
            return Err(VidnoteError::Index("embeddings are empty".to_string()));
        }
        if let Some(pos) = embeddings.iter().position(|e| e.len() != dimensions) {
            return Err(VidnoteError::Index(format!(
                "embedding {} has {} dimensions, expected {}",
                pos,
                embeddings[pos].len(),
                dimensions
            )));
        }

        let documents: Vec<Document> = chunks
            .iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| Document::from_chunk(video_id, chunk, embedding))
            .collect();

        let store = MemoryVectorStore::new();
        let stored = store.upsert_batch(&documents).await?;
        if stored != documents.len() {
            return Err(VidnoteError::Index(format!(
                "stored {} of {} chunks",
                stored,
                documents.len()
            )));
        }

        debug!("Indexed {} chunks with {} dimensions", stored, dimensions);
        info!("Built index for {} ({} chunks)", video_id, stored);

        Ok(VectorIndex {
            video_id: video_id.to_string(),
            store: Arc::new(store),
            embedding_model: self.embedder.model_name().to_string(),
            dimensions,
            chunk_count: stored,
        })
    }
}
