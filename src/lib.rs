//! vidnote - notes and chat for YouTube videos
//!
//! Turns a YouTube video into AI-generated notes and key topics, or into a
//! question-answering session over its transcript.
//!
//! # Overview
//!
//! - Picks the best transcript track of a video: manual English, then other
//!   manual tracks, then generated English, then other generated tracks
//! - Translates non-English transcripts to English
//! - Extracts key topics and writes structured notes
//! - Chunks and embeds the transcript and answers questions from it
//!
//! # Architecture
//!
//! - `config` - Configuration and prompt templates
//! - `video` - Video ID extraction
//! - `transcript` - Transcript providers and track selection
//! - `llm` - Text generation
//! - `content` - Translation, topics and notes
//! - `chunking` - Recursive character chunking
//! - `embedding` - Embedding generation
//! - `vector_store` - Vector store abstraction
//! - `rag` - Indexing and question answering
//! - `session` - Per-user session state
//! - `orchestrator` - Pipeline coordination
//!
//! # Example
//!
//! ```rust,no_run
//! use vidnote::config::Settings;
//! use vidnote::orchestrator::Orchestrator;
//! use vidnote::session::Session;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     let orchestrator = Orchestrator::new(settings)?;
//!     let mut session = Session::new();
//!
//!     let notes = orchestrator
//!         .generate_notes(&mut session, "https://www.youtube.com/watch?v=pBRSZBtirAk")
//!         .await?;
//!     println!("{}", notes.topics);
//!
//!     orchestrator
//!         .prepare_chat(&mut session, "https://www.youtube.com/watch?v=pBRSZBtirAk")
//!         .await?;
//!     let response = orchestrator.ask(&mut session, "What is the video about?").await?;
//!     println!("{}", response.answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chunking;
pub mod cli;
pub mod config;
pub mod content;
pub mod embedding;
pub mod error;
pub mod llm;
pub mod openai;
pub mod orchestrator;
pub mod rag;
pub mod session;
pub mod transcript;
pub mod vector_store;
pub mod video;

#[cfg(test)]
mod testing;

pub use error::{Result, VidnoteError};
