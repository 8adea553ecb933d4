//! Notes command implementation.

use super::{ensure_ready, report, with_model};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;

/// Run the notes command.
pub async fn run_notes(
    url: &str,
    model: Option<String>,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    ensure_ready(Operation::Generate)?;

    let orchestrator = Orchestrator::new(with_model(settings, model))?;
    let mut session = Session::new();

    let spinner = Output::spinner("Fetching transcript...");
    let transcript = match orchestrator.load_transcript(&mut session, url).await {
        Ok(t) => {
            spinner.finish_and_clear();
            t
        }
        Err(e) => {
            spinner.finish_and_clear();
            report(&e);
            return Err(e.into());
        }
    };

    if transcript.translated {
        Output::info(&format!(
            "Transcript translated from '{}' to English",
            transcript.source_language
        ));
    }

    let spinner = Output::spinner("Generating key topics and notes...");
    let notes = match orchestrator.generate_notes(&mut session, url).await {
        Ok(n) => {
            spinner.finish_and_clear();
            n
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate notes: {}", e));
            return Err(e.into());
        }
    };

    Output::header("Key Topics");
    println!("\n{}", notes.topics.trim());

    Output::header("Notes");
    println!("\n{}\n", notes.notes.trim());

    if let Some(path) = output {
        let path = Settings::expand_path(&path);
        std::fs::write(&path, notes.to_markdown())?;
        Output::success(&format!("Notes saved to {}", path.display()));
    }

    Ok(())
}
