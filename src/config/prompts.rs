//! Prompt templates for vidnote.
//!
//! Prompts can be customized by placing TOML files in the custom prompts directory.

use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern is valid"));

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Prompts {
    pub translation: TranslationPrompts,
    pub topics: TopicPrompts,
    pub notes: NotesPrompts,
    pub rag: RagPrompts,
    /// Custom variables from config, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}

/// Prompts for translating a transcript into English.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationPrompts {
    pub system: String,
    pub user: String,
}

impl Default for TranslationPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a professional translator.

Translate the text you are given into English. Keep all of its meaning, intent, nuance, tone and style. Do not change, shorten or omit anything.

Do not add commentary, explanations or interpretations. Reply with the English translation and nothing else."#
                .to_string(),

            user: r#"Text to translate:
'''
{{transcript}}
'''"#
                .to_string(),
        }
    }
}

/// Prompts for extracting the key topics of a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TopicPrompts {
    pub system: String,
    pub user: String,
}

impl Default for TopicPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert summarization assistant analyzing a video transcript.

Your assignment:
- Identify the five most important topics or concepts discussed in the transcript.
- Each topic must be a major theme or idea, not a minor detail, quote or side point.
- Return a numbered list from 1 to 5.
- Use clear, concise wording focused on the substance of the video.
- State each item as a factual key topic, never as a question or an opinion.
- Only include topics that are actually discussed in the transcript. Do not add or infer unrelated ones."#
                .to_string(),

            user: r#"Transcript:
'''
{{transcript}}
'''"#
                .to_string(),
        }
    }
}

/// Prompts for generating structured notes from a transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotesPrompts {
    pub system: String,
    pub user: String,
}

impl Default for NotesPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are an expert note-taking assistant. Turn the YouTube video transcript you are given into clear, well-structured, concise notes.

Requirements:
- Write **bulleted points** grouped into logical **sections**, each with a **subheading**.
- Every subheading starts with exactly one relevant emoji and has no emoji at the end.
  Allowed: 📌 Childhood Reading Habits
  Not allowed: 📌 Childhood Reading Habits 📚
- Capture all key points, important facts and examples. Never add information that is not in the transcript.
- Use short, clear sentences. Avoid long paragraphs, filler and repetition.
- Highlight critical insights with bold labels such as **Key takeaway:**, **Fact:** or **Example:**.
- Keep the notes easy to scan for quick review.

Suggested subheadings (emoji at the start only):
- 📌 Overview
- 💡 Key Ideas
- 📝 Examples / Case Studies
- 🎯 Takeaways
- ❓ Questions / Unclear Points"#
                .to_string(),

            user: r#"Transcript:
'''
{{transcript}}
'''"#
                .to_string(),
        }
    }
}

/// Prompts for answering questions over retrieved transcript chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagPrompts {
    pub system: String,
    pub user: String,
    /// Appended to the user message on the first turn of a conversation.
    pub first_turn: String,
    /// Appended to the user message on every later turn.
    pub follow_up: String,
}

impl Default for RagPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are a kind, polite and precise assistant answering questions about a video.

Guidelines:
- Understand the user's intent even when the question has typos or grammar mistakes.
- Answer strictly from the retrieved context provided with the question.
- If the answer is not in the context, reply with exactly:
  "{{fallback}}"
- Keep answers clear, concise and approachable.
- Keep a helpful and empathetic tone at all times."#
                .to_string(),

            user: r#"Context:
{{context}}

User Question:
{{question}}

{{greeting}}

Answer:"#
                .to_string(),

            first_turn: "This is the first message of the conversation: open your answer with a short, friendly greeting."
                .to_string(),

            follow_up: "This is a follow-up in an ongoing conversation: do not greet the user again."
                .to_string(),
        }
    }
}

impl Prompts {
    /// Load prompts from the default location, with optional custom directory and variables.
    pub fn load(
        custom_dir: Option<&str>,
        custom_variables: Option<&HashMap<String, String>>,
    ) -> crate::error::Result<Self> {
        let mut prompts = Prompts::default();

        if let Some(vars) = custom_variables {
            prompts.variables = vars.clone();
        }

        if let Some(dir) = custom_dir {
            let custom_path = crate::config::Settings::expand_path(dir);

            let translation_path = custom_path.join("translation.toml");
            if translation_path.exists() {
                let content = std::fs::read_to_string(&translation_path)?;
                prompts.translation = toml::from_str(&content)?;
            }

            let topics_path = custom_path.join("topics.toml");
            if topics_path.exists() {
                let content = std::fs::read_to_string(&topics_path)?;
                prompts.topics = toml::from_str(&content)?;
            }

            let notes_path = custom_path.join("notes.toml");
            if notes_path.exists() {
                let content = std::fs::read_to_string(&notes_path)?;
                prompts.notes = toml::from_str(&content)?;
            }

            let rag_path = custom_path.join("rag.toml");
            if rag_path.exists() {
                let content = std::fs::read_to_string(&rag_path)?;
                prompts.rag = toml::from_str(&content)?;
            }
        }

        Ok(prompts)
    }

    /// Render a prompt template with the given variables.
    ///
    /// Substitution is a single pass over the template: inserted values are
    /// never scanned for placeholders, and unknown placeholders stay as written.
    pub fn render(template: &str, vars: &HashMap<String, String>) -> String {
        PLACEHOLDER
            .replace_all(template, |caps: &Captures| {
                vars.get(&caps[1])
                    .cloned()
                    .unwrap_or_else(|| caps[0].to_string())
            })
            .into_owned()
    }

    /// Render a prompt template with both provided variables and custom config variables.
    /// Provided variables take precedence over custom config variables.
    pub fn render_with_custom(&self, template: &str, vars: &HashMap<String, String>) -> String {
        let mut merged = self.variables.clone();
        for (key, value) in vars {
            merged.insert(key.clone(), value.clone());
        }
        Self::render(template, &merged)
    }
}
