//! Pre-flight checks before expensive operations.
//!
//! Validates that required configuration is available before starting
//! operations that would otherwise fail midway.

use crate::error::{Result, VidnoteError};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Notes, translation and chat call the model API.
    Generate,
    /// Fetching a transcript only talks to YouTube.
    Transcript,
}

/// Run pre-flight checks for the given operation.
///
/// Returns Ok(()) if all checks pass, or an error describing what's missing.
pub fn check(operation: Operation) -> Result<()> {
    match operation {
        Operation::Generate => check_api_key(std::env::var("OPENAI_API_KEY").ok()),
        Operation::Transcript => Ok(()),
    }
}

/// Check if OpenAI API key is configured.
fn check_api_key(key: Option<String>) -> Result<()> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(()),
        Some(_) => Err(VidnoteError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        None => Err(VidnoteError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}
