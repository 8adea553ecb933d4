//! Configuration settings for vidnote.

use crate::error::{Result, VidnoteError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub youtube: YoutubeSettings,
    pub llm: LlmSettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub rag: RagSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
        }
    }
}

/// Settings for talking to YouTube.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YoutubeSettings {
    /// Timeout for each request to YouTube, in seconds.
    pub request_timeout_secs: u64,
    /// Accept-Language header sent with watch page requests.
    pub accept_language: String,
}

impl Default for YoutubeSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            accept_language: "en-US".to_string(),
        }
    }
}

/// Text generation model settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// Chat model used for translation, topics, notes and answers.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Base URL of an OpenAI-compatible API (defaults to OpenAI).
    pub api_base: Option<String>,
    /// Timeout for each model request, in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.2,
            api_base: None,
            request_timeout_secs: 300, // 5 minutes
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Embedding dimensions.
    pub dimensions: u32,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

/// Transcript chunking settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk length in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 10_000,
            chunk_overlap: 1_000,
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// HTTP API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Sessions unused for this long are dropped, in seconds.
    pub session_idle_secs: u64,
    /// How often idle sessions are swept, in seconds.
    pub sweep_interval_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            session_idle_secs: 3600,
            sweep_interval_secs: 60,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_config_path(),
        };

        let settings = if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            toml::from_str::<Settings>(&content)?
        } else {
            Settings::default()
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| VidnoteError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.chunking.chunk_size == 0 {
            return Err(VidnoteError::Config(
                "chunking.chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(VidnoteError::Config(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        if self.rag.top_k == 0 {
            return Err(VidnoteError::Config(
                "rag.top_k must be greater than zero".to_string(),
            ));
        }
        if self.server.session_idle_secs == 0 || self.server.sweep_interval_secs == 0 {
            return Err(VidnoteError::Config(
                "server.session_idle_secs and server.sweep_interval_secs must be greater than zero"
                    .to_string(),
            ));
        }
        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(VidnoteError::Config(format!(
                "llm.temperature must be between 0 and 2, got {}",
                self.llm.temperature
            )));
        }
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vidnote")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 10_000);
        assert_eq!(settings.chunking.chunk_overlap, 1_000);
        assert_eq!(settings.rag.top_k, 4);
        assert!((settings.llm.temperature - 0.2).abs() < f32::EPSILON);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings::load_from(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.llm.model, "gpt-4o-mini");
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[rag]\ntop_k = 6\n\n[llm]\nmodel = \"gemini-2.5-flash-lite\"\n")
            .unwrap();

        let settings = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(settings.rag.top_k, 6);
        assert_eq!(settings.llm.model, "gemini-2.5-flash-lite");
        assert_eq!(settings.chunking.chunk_size, 10_000);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.chunking.chunk_size = 2_000;
        settings.chunking.chunk_overlap = 200;
        settings.save_to(&path).unwrap();

        let reloaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(reloaded.chunking.chunk_size, 2_000);
        assert_eq!(reloaded.chunking.chunk_overlap, 200);
    }

    #[test]
    fn test_overlap_must_be_smaller_than_chunk() {
        let mut settings = Settings::default();
        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert!(matches!(settings.validate(), Err(VidnoteError::Config(_))));
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut settings = Settings::default();
        settings.rag.top_k = 0;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_zero_sweep_interval_rejected() {
        let mut settings = Settings::default();
        settings.server.sweep_interval_secs = 0;
        assert!(matches!(settings.validate(), Err(VidnoteError::Config(_))));
    }
}
