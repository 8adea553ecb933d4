//! Interactive chat command.

use super::{ensure_ready, report, with_model};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// Run the interactive chat command.
pub async fn run_chat(url: &str, model: Option<String>, settings: Settings) -> Result<()> {
    ensure_ready(Operation::Generate)?;

    let orchestrator = Orchestrator::new(with_model(settings, model))?;
    let mut session = Session::new();

    let spinner = Output::spinner("Preparing transcript for chat...");
    let chunks = match orchestrator.prepare_chat(&mut session, url).await {
        Ok(count) => {
            spinner.finish_and_clear();
            count
        }
        Err(e) => {
            spinner.finish_and_clear();
            report(&e);
            return Err(e.into());
        }
    };

    println!("\n{}", style("vidnote chat").bold().cyan());
    Output::kv("Video", session.video_id().unwrap_or_default());
    Output::kv("Chunks", &chunks.to_string());
    println!(
        "\n{}\n",
        style("Type your questions, or 'exit' to quit. Use 'clear' to reset conversation.").dim()
    );

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut input = String::new();
        if stdin.lock().read_line(&mut input)? == 0 {
            break;
        }

        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            Output::info("Goodbye!");
            break;
        }

        if input.eq_ignore_ascii_case("clear") {
            session.clear_history();
            Output::info("Conversation history cleared.");
            continue;
        }

        let spinner = Output::spinner("Thinking...");
        let result = orchestrator.ask(&mut session, input).await;
        spinner.finish_and_clear();

        match result {
            Ok(response) => {
                println!("\n{} {}\n", style("vidnote:").cyan().bold(), response.answer);
            }
            Err(e) => {
                Output::error(&format!("Error: {}", e));
            }
        }
    }

    Ok(())
}
