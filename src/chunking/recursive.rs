//! Recursive character splitting.
//!
//! Splits on the coarsest separator present in the text (paragraph, line,
//! word) and only descends to a finer one for pieces that are still too long,
//! ending with single characters. Pieces are then merged greedily up to the
//! chunk size, carrying up to `chunk_overlap` characters into the next chunk.

use super::{Chunk, Chunker, ChunkingConfig};
use std::collections::VecDeque;
use tracing::debug;

/// Separators from coarsest to finest. The empty separator splits characters.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Chunker that prefers natural text boundaries.
pub struct RecursiveChunker {
    config: ChunkingConfig,
}

impl RecursiveChunker {
    pub fn new(config: ChunkingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> ChunkingConfig {
        self.config
    }

    fn split_text(&self, text: &str, separators: &[&str]) -> Vec<String> {
        let (separator, finer) = pick_separator(text, separators);

        let mut chunks = Vec::new();
        let mut fitting: Vec<String> = Vec::new();

        for piece in split_keeping_separator(text, separator) {
            if char_len(&piece) < self.config.chunk_size {
                fitting.push(piece);
                continue;
            }

            if !fitting.is_empty() {
                chunks.extend(self.merge(&fitting));
                fitting.clear();
            }

            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_text(&piece, finer));
            }
        }

        if !fitting.is_empty() {
            chunks.extend(self.merge(&fitting));
        }

        chunks
    }

    /// Greedily join pieces into chunks no longer than the chunk size.
    fn merge(&self, pieces: &[String]) -> Vec<String> {
        let size = self.config.chunk_size;
        let overlap = self.config.chunk_overlap;

        let mut merged = Vec::new();
        let mut window: VecDeque<(&str, usize)> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let len = char_len(piece);

            if total + len > size && !window.is_empty() {
                if let Some(chunk) = join_window(&window) {
                    merged.push(chunk);
                }
                // Keep at most `overlap` trailing characters, and make room for the next piece.
                while total > overlap || (total + len > size && total > 0) {
                    match window.pop_front() {
                        Some((_, front_len)) => total -= front_len,
                        None => break,
                    }
                }
            }

            window.push_back((piece.as_str(), len));
            total += len;
        }

        if let Some(chunk) = join_window(&window) {
            merged.push(chunk);
        }

        merged
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, text: &str) -> Vec<Chunk> {
        let chunks: Vec<Chunk> = self
            .split_text(text, &SEPARATORS)
            .into_iter()
            .enumerate()
            .map(|(order, text)| Chunk::new(text, order))
            .collect();

        debug!(
            "Split {} chars into {} chunks (size {}, overlap {})",
            char_len(text),
            chunks.len(),
            self.config.chunk_size,
            self.config.chunk_overlap
        );
        chunks
    }
}

/// First separator present in `text`, and the finer separators after it.
fn pick_separator<'a, 's>(text: &str, separators: &'a [&'s str]) -> (&'s str, &'a [&'s str]) {
    for (i, separator) in separators.iter().enumerate() {
        if separator.is_empty() {
            return (separator, &[]);
        }
        if text.contains(separator) {
            return (separator, &separators[i + 1..]);
        }
    }
    ("", &[])
}

/// Split on `separator`, attaching it to the start of every following piece.
fn split_keeping_separator(text: &str, separator: &str) -> Vec<String> {
    if separator.is_empty() {
        return text.chars().map(String::from).collect();
    }

    let mut parts = text.split(separator);
    let mut pieces: Vec<String> = Vec::new();
    if let Some(first) = parts.next() {
        pieces.push(first.to_string());
    }
    pieces.extend(parts.map(|p| format!("{}{}", separator, p)));
    pieces.retain(|p| !p.is_empty());
    pieces
}

fn join_window(window: &VecDeque<(&str, usize)>) -> Option<String> {
    let joined: String = window.iter().map(|(piece, _)| *piece).collect();
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker(size: usize, overlap: usize) -> RecursiveChunker {
        RecursiveChunker::new(ChunkingConfig::new(size, overlap).unwrap())
    }

    fn numbered_words(count: usize) -> String {
        (0..count)
            .map(|i| format!("w{:03}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = chunker(100, 10).chunk("  a short transcript  ");
        assert_eq!(chunks, vec![Chunk::new("a short transcript", 0)]);
    }

    #[test]
    fn test_blank_text_has_no_chunks() {
        assert!(chunker(100, 10).chunk("").is_empty());
        assert!(chunker(100, 10).chunk("   \n\n ").is_empty());
    }

    #[test]
    fn test_chunks_respect_maximum_length() {
        let text = numbered_words(500);
        let chunks = chunker(120, 30).chunk(&text);

        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert!(chunk.char_len() <= 120, "chunk too long: {}", chunk.char_len());
        }
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.order, i);
        }
    }

    #[test]
    fn test_consecutive_chunks_overlap() {
        let text = numbered_words(300);
        let chunks = chunker(100, 30).chunk(&text);

        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let first_word = pair[1].text.split(' ').next().unwrap();
            assert!(
                pair[0].text.contains(first_word),
                "'{}' does not carry over from previous chunk",
                first_word
            );
        }
    }

    #[test]
    fn test_every_word_is_kept() {
        let text = numbered_words(300);
        let chunks = chunker(100, 30).chunk(&text);
        for i in 0..300 {
            let word = format!("w{:03}", i);
            assert!(chunks.iter().any(|c| c.text.contains(&word)), "{} missing", word);
        }
    }

    #[test]
    fn test_chunking_is_deterministic() {
        let text = format!("{}\n\n{}\n{}", numbered_words(80), numbered_words(120), numbered_words(40));
        let chunker = chunker(150, 40);
        assert_eq!(chunker.chunk(&text), chunker.chunk(&text));
    }

    #[test]
    fn test_paragraphs_split_at_boundaries() {
        let text = "first paragraph here\n\nsecond paragraph here\n\nthird one";
        let chunks = chunker(25, 0).chunk(text);
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(
            texts,
            vec!["first paragraph here", "second paragraph here", "third one"]
        );
    }

    #[test]
    fn test_unbroken_text_falls_back_to_characters() {
        let text: String = (0..250).map(|i| (b'a' + (i % 26) as u8) as char).collect();
        let chunks = chunker(100, 10).chunk(&text);

        let lens: Vec<usize> = chunks.iter().map(Chunk::char_len).collect();
        assert_eq!(lens, vec![100, 100, 70]);

        let tail: String = chunks[0].text.chars().skip(90).collect();
        let head: String = chunks[1].text.chars().take(10).collect();
        assert_eq!(tail, head);
    }

    #[test]
    fn test_multibyte_characters_counted_once() {
        let text = "é".repeat(30);
        let chunks = chunker(10, 0).chunk(&text);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.char_len() == 10));
    }
}
