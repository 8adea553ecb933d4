//! Context building for RAG prompts.

use super::ContextChunk;

/// Join retrieved chunk texts with newlines, in rank order.
pub fn build_context(chunks: &[ContextChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
