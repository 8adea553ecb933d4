//! CLI command implementations.

mod ask;
mod chat;
mod config;
mod notes;
mod serve;
mod transcript;

pub use ask::run_ask;
pub use chat::run_chat;
pub use config::run_config;
pub use notes::run_notes;
pub use serve::run_serve;
pub use transcript::run_transcript;

use crate::cli::preflight::{self, Operation};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::VidnoteError;

/// Apply a `--model` override to the settings.
fn with_model(mut settings: Settings, model: Option<String>) -> Settings {
    if let Some(model) = model {
        settings.llm.model = model;
    }
    settings
}

/// Run pre-flight checks, reporting failures to the user.
fn ensure_ready(operation: Operation) -> anyhow::Result<()> {
    if let Err(e) = preflight::check(operation) {
        Output::error(&format!("{}", e));
        return Err(e.into());
    }
    Ok(())
}

/// Print a pipeline error, with a hint when retrying cannot help.
fn report(error: &VidnoteError) {
    Output::error(&format!("{}", error));
    if error.is_terminal() {
        Output::info("Retrying will not help for this video; try a different one.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_override() {
        let settings = with_model(Settings::default(), Some("gpt-4o".to_string()));
        assert_eq!(settings.llm.model, "gpt-4o");

        let settings = with_model(Settings::default(), None);
        assert_eq!(settings.llm.model, Settings::default().llm.model);
    }
}
