//! OpenAI chat completions implementation.

use super::{GenerationRequest, TextGenerator};
use crate::config::LlmSettings;
use crate::error::{Result, VidnoteError};
use crate::openai::create_client;
use async_openai::types::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Text generator backed by an OpenAI-compatible chat completions API.
pub struct OpenAIGenerator {
    client: async_openai::Client<async_openai::config::OpenAIConfig>,
    model: String,
}

impl OpenAIGenerator {
    /// Create a generator from the LLM settings.
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        Ok(Self {
            client: create_client(settings)?,
            model: settings.model.clone(),
        })
    }

    fn build_messages(request: &GenerationRequest) -> Result<Vec<ChatCompletionRequestMessage>> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::with_capacity(2);

        if let Some(system) = &request.system {
            messages.push(
                ChatCompletionRequestSystemMessageArgs::default()
                    .content(system.as_str())
                    .build()
                    .map_err(|e| VidnoteError::Generation(e.to_string()))?
                    .into(),
            );
        }

        messages.push(
            ChatCompletionRequestUserMessageArgs::default()
                .content(request.prompt.as_str())
                .build()
                .map_err(|e| VidnoteError::Generation(e.to_string()))?
                .into(),
        );

        Ok(messages)
    }
}

#[async_trait]
impl TextGenerator for OpenAIGenerator {
    #[instrument(skip(self, request), fields(model = %self.model, prompt_chars = request.prompt.chars().count()))]
    async fn generate(&self, request: &GenerationRequest) -> Result<String> {
        let chat_request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(Self::build_messages(request)?)
            .temperature(request.temperature)
            .build()
            .map_err(|e| VidnoteError::Generation(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(chat_request)
            .await
            .map_err(|e| VidnoteError::OpenAI(format!("Chat completion failed: {}", e)))?;

        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.as_ref())
            .ok_or_else(|| VidnoteError::Generation("Empty response from model".to_string()))?
            .clone();

        debug!("Model returned {} chars", content.chars().count());
        Ok(content)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_include_system_when_set() {
        let request = GenerationRequest::new("question", 0.2).with_system("rules");
        let messages = OpenAIGenerator::build_messages(&request).unwrap();
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ChatCompletionRequestMessage::System(_)));
        assert!(matches!(messages[1], ChatCompletionRequestMessage::User(_)));
    }

    #[test]
    fn test_messages_without_system() {
        let messages =
            OpenAIGenerator::build_messages(&GenerationRequest::new("question", 0.2)).unwrap();
        assert_eq!(messages.len(), 1);
    }
}
