//! vidnote CLI entry point.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use vidnote::cli::{commands, Cli, Commands};
use vidnote::config::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&std::path::PathBuf::from(path)))?,
        None => Settings::load()?,
    };

    // Initialize logging: -v flags win over the configured level
    let log_level = match cli.verbose {
        0 => settings.general.log_level.as_str(),
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("vidnote={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Execute command
    match &cli.command {
        Commands::Notes { url, model, output } => {
            commands::run_notes(url, model.clone(), output.clone(), settings).await?;
        }

        Commands::Chat { url, model } => {
            commands::run_chat(url, model.clone(), settings).await?;
        }

        Commands::Ask { url, question, model } => {
            commands::run_ask(url, question, model.clone(), settings).await?;
        }

        Commands::Transcript {
            url,
            list,
            translate,
            output,
        } => {
            commands::run_transcript(url, *list, *translate, output.clone(), settings).await?;
        }

        Commands::Serve { host, port, model } => {
            commands::run_serve(host, *port, model.clone(), settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(action, cli.config.as_deref(), settings)?;
        }
    }

    Ok(())
}
