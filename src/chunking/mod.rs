//! Transcript chunking for embedding and retrieval.

mod recursive;

pub use recursive::RecursiveChunker;

use crate::config::ChunkingSettings;
use crate::error::{Result, VidnoteError};
use serde::{Deserialize, Serialize};

/// A bounded slice of transcript text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Text content of this chunk.
    pub text: String,
    /// Position of this chunk in the splitting pass.
    pub order: usize,
}

impl Chunk {
    pub fn new(text: impl Into<String>, order: usize) -> Self {
        Self {
            text: text.into(),
            order,
        }
    }

    /// Length in characters.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Size limits for chunking, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk.
    pub chunk_size: usize,
    /// Characters carried over from the end of one chunk into the next.
    pub chunk_overlap: usize,
}

impl ChunkingConfig {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(VidnoteError::Config(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(VidnoteError::Config(format!(
                "chunk overlap ({}) must be smaller than chunk size ({})",
                chunk_overlap, chunk_size
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            chunk_overlap: 1_000,
        }
    }
}

impl TryFrom<&ChunkingSettings> for ChunkingConfig {
    type Error = VidnoteError;

    fn try_from(settings: &ChunkingSettings) -> Result<Self> {
        Self::new(settings.chunk_size, settings.chunk_overlap)
    }
}

/// Trait for chunking implementations.
///
/// Implementations must be deterministic: the same text always yields the
/// same chunks.
pub trait Chunker: Send + Sync {
    /// Split text into ordered chunks. Blank text yields no chunks.
    fn chunk(&self, text: &str) -> Vec<Chunk>;
}
