//! Configuration module for vidnote.
//!
//! Handles loading and managing application settings and prompt templates.

mod prompts;
mod settings;

pub use prompts::{NotesPrompts, Prompts, RagPrompts, TopicPrompts, TranslationPrompts};
pub use settings::{
    ChunkingSettings, EmbeddingSettings, GeneralSettings, LlmSettings, PromptSettings,
    RagSettings, ServerSettings, Settings, YoutubeSettings,
};
