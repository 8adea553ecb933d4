//! OpenAI client construction shared by the generator and the embedder.

use crate::config::LlmSettings;
use crate::error::{Result, VidnoteError};
use async_openai::{config::OpenAIConfig, Client};
use std::time::Duration;

/// Create an OpenAI-compatible client from the LLM settings.
///
/// The API key is read from `OPENAI_API_KEY`. When `api_base` is set the client
/// talks to that endpoint instead, which lets any OpenAI-compatible provider
/// stand in.
pub fn create_client(settings: &LlmSettings) -> Result<Client<OpenAIConfig>> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .build()
        .map_err(|e| VidnoteError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let mut config = OpenAIConfig::default();
    if let Some(base) = settings.api_base.as_deref().filter(|b| !b.is_empty()) {
        config = config.with_api_base(base);
    }

    Ok(Client::with_config(config).with_http_client(http_client))
}
