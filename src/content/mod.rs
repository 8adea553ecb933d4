//! Translation, topic extraction and note generation.

use crate::config::Prompts;
use crate::error::{Result, VidnoteError};
use crate::llm::{as_generation_error, GenerationRequest, TextGenerator};
use crate::transcript::{ResolvedTranscript, VideoTranscript, WORKING_LANGUAGE};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument};

/// Key topics and notes generated for a video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoNotes {
    pub video_id: String,
    /// Numbered list of the main topics.
    pub topics: String,
    /// Sectioned, bulleted notes.
    pub notes: String,
}

impl VideoNotes {
    /// Render as a Markdown document.
    pub fn to_markdown(&self) -> String {
        format!(
            "# Notes for {}\n\n## Key Topics\n\n{}\n\n## Notes\n\n{}\n",
            crate::video::watch_url(&self.video_id),
            self.topics.trim(),
            self.notes.trim()
        )
    }
}

/// Runs the prompt-driven transformations of transcript text.
pub struct ContentGenerator {
    generator: Arc<dyn TextGenerator>,
    prompts: Prompts,
    temperature: f32,
}

impl ContentGenerator {
    pub fn new(generator: Arc<dyn TextGenerator>, prompts: Prompts, temperature: f32) -> Self {
        Self {
            generator,
            prompts,
            temperature,
        }
    }

    /// Translate text into English.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn translate(&self, text: &str) -> Result<String> {
        let template = &self.prompts.translation;
        self.run(&template.system, &template.user, text)
            .await
            .map_err(|e| VidnoteError::Translation(e.to_string()))
    }

    /// Extract the five main topics of a transcript.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn extract_topics(&self, text: &str) -> Result<String> {
        let template = &self.prompts.topics;
        self.run(&template.system, &template.user, text)
            .await
            .map_err(as_generation_error)
    }

    /// Generate structured notes for a transcript.
    #[instrument(skip(self, text), fields(chars = text.chars().count()))]
    pub async fn generate_notes(&self, text: &str) -> Result<String> {
        let template = &self.prompts.notes;
        self.run(&template.system, &template.user, text)
            .await
            .map_err(as_generation_error)
    }

    /// Turn a resolved transcript into English working text, translating when needed.
    pub async fn ensure_english(&self, resolved: ResolvedTranscript) -> Result<VideoTranscript> {
        if resolved.is_english() {
            return Ok(VideoTranscript {
                video_id: resolved.video_id,
                source_language: resolved.language_code,
                text: resolved.full_text,
                translated: false,
            });
        }

        info!(
            "Translating {} transcript of {} into {}",
            resolved.language_code, resolved.video_id, WORKING_LANGUAGE
        );
        let text = self.translate(&resolved.full_text).await?;

        Ok(VideoTranscript {
            video_id: resolved.video_id,
            source_language: resolved.language_code,
            text,
            translated: true,
        })
    }

    /// Extract topics, then generate notes.
    pub async fn notes_for(&self, transcript: &VideoTranscript) -> Result<VideoNotes> {
        let topics = self.extract_topics(&transcript.text).await?;
        let notes = self.generate_notes(&transcript.text).await?;
        Ok(VideoNotes {
            video_id: transcript.video_id.clone(),
            topics,
            notes,
        })
    }

    async fn run(&self, system: &str, user: &str, text: &str) -> Result<String> {
        let mut vars = HashMap::new();
        vars.insert("transcript".to_string(), text.to_string());

        let request = GenerationRequest::new(
            self.prompts.render_with_custom(user, &vars),
            self.temperature,
        )
        .with_system(self.prompts.render_with_custom(system, &vars));

        let output = self.generator.generate(&request).await?;
        if output.trim().is_empty() {
            return Err(VidnoteError::Generation(
                "model returned an empty response".to_string(),
            ));
        }
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockGenerator;

    fn resolved(code: &str, text: &str) -> ResolvedTranscript {
        ResolvedTranscript {
            video_id: "abc".to_string(),
            full_text: text.to_string(),
            language_code: code.to_string(),
            is_generated: false,
        }
    }

    fn content(generator: Arc<MockGenerator>) -> ContentGenerator {
        ContentGenerator::new(generator, Prompts::default(), 0.2)
    }

    #[tokio::test]
    async fn test_english_is_not_translated() {
        let generator = Arc::new(MockGenerator::replying("unused"));
        let transcript = content(generator.clone())
            .ensure_english(resolved("en-GB", "hello there"))
            .await
            .unwrap();

        assert!(!transcript.translated);
        assert_eq!(transcript.text, "hello there");
        assert!(generator.requests().is_empty());
    }

    #[tokio::test]
    async fn test_other_language_is_translated() {
        let generator = Arc::new(MockGenerator::replying("hello world"));
        let transcript = content(generator.clone())
            .ensure_english(resolved("es", "hola mundo"))
            .await
            .unwrap();

        assert!(transcript.translated);
        assert_eq!(transcript.source_language, "es");
        assert_eq!(transcript.text, "hello world");

        let requests = generator.requests();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].prompt.contains("hola mundo"));
        assert_eq!(requests[0].system, Some(Prompts::default().translation.system));
    }

    #[tokio::test]
    async fn test_translation_failure() {
        let generator = Arc::new(MockGenerator::failing("quota exceeded"));
        let err = content(generator)
            .ensure_english(resolved("fr", "bonjour"))
            .await
            .unwrap_err();
        match err {
            VidnoteError::Translation(msg) => assert!(msg.contains("quota exceeded")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_notes_run_topics_then_notes() {
        let generator = Arc::new(MockGenerator::with_fn(|request| {
            let system = request.system.clone().unwrap_or_default();
            Ok(if system.contains("five") {
                "1. Ownership".to_string()
            } else {
                "📌 Overview\n- point".to_string()
            })
        }));
        let transcript = VideoTranscript {
            video_id: "abc".to_string(),
            source_language: "en".to_string(),
            text: "a talk about ownership".to_string(),
            translated: false,
        };

        let notes = content(generator.clone()).notes_for(&transcript).await.unwrap();
        assert_eq!(notes.topics, "1. Ownership");
        assert_eq!(notes.notes, "📌 Overview\n- point");
        assert_eq!(generator.requests().len(), 2);

        let markdown = notes.to_markdown();
        assert!(markdown.contains("## Key Topics\n\n1. Ownership"));
        assert!(markdown.contains("https://www.youtube.com/watch?v=abc"));
    }

    #[tokio::test]
    async fn test_generation_failure_and_blank_output() {
        let failing = content(Arc::new(MockGenerator::failing("boom")));
        assert!(matches!(
            failing.extract_topics("text").await,
            Err(VidnoteError::Generation(_))
        ));

        let blank = content(Arc::new(MockGenerator::replying("  \n")));
        assert!(matches!(
            blank.generate_notes("text").await,
            Err(VidnoteError::Generation(_))
        ));
    }
}
