//! Ask command implementation.

use super::{ensure_ready, report, with_model};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;

/// Run the ask command.
pub async fn run_ask(
    url: &str,
    question: &str,
    model: Option<String>,
    settings: Settings,
) -> Result<()> {
    ensure_ready(Operation::Generate)?;

    let orchestrator = Orchestrator::new(with_model(settings, model))?;
    let mut session = Session::new();

    let spinner = Output::spinner("Indexing transcript...");
    if let Err(e) = orchestrator.prepare_chat(&mut session, url).await {
        spinner.finish_and_clear();
        report(&e);
        return Err(e.into());
    }

    spinner.set_message("Searching transcript...");

    match orchestrator.ask(&mut session, question).await {
        Ok(response) => {
            spinner.finish_and_clear();

            println!("\n{}\n", response.answer);

            if !response.sources.is_empty() {
                Output::header("Sources");
                for (i, source) in response.sources.iter().enumerate() {
                    Output::source(i + 1, source);
                }
            }
        }
        Err(e) => {
            spinner.finish_and_clear();
            Output::error(&format!("Failed to generate answer: {}", e));
            return Err(e.into());
        }
    }

    Ok(())
}
