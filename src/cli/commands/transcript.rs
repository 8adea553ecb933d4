//! Transcript command implementation.

use super::{ensure_ready, report};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::orchestrator::Orchestrator;
use crate::session::Session;
use crate::transcript::priority_list;
use anyhow::Result;

/// Run the transcript command.
pub async fn run_transcript(
    url: &str,
    list: bool,
    translate: bool,
    output: Option<String>,
    settings: Settings,
) -> Result<()> {
    ensure_ready(if translate {
        Operation::Generate
    } else {
        Operation::Transcript
    })?;

    let orchestrator = Orchestrator::new(settings)?;

    if list {
        let tracks = orchestrator.list_tracks(url).await.map_err(|e| {
            report(&e);
            e
        })?;

        Output::header(&format!("Transcript tracks for {}", tracks.video_id));
        if tracks.is_empty() {
            Output::warning("No transcript tracks available.");
            return Ok(());
        }
        for track in &tracks.tracks {
            Output::track(track);
        }
        println!();
        Output::kv("Priority", &priority_list(&tracks.tracks).join(" > "));
        return Ok(());
    }

    let spinner = Output::spinner("Fetching transcript...");
    let result = if translate {
        let mut session = Session::new();
        orchestrator
            .load_transcript(&mut session, url)
            .await
            .map(|t| (t.source_language, t.text))
    } else {
        orchestrator
            .resolve_transcript(url)
            .await
            .map(|t| (t.language_code, t.full_text))
    };
    spinner.finish_and_clear();

    let (language, text) = match result {
        Ok(r) => r,
        Err(e) => {
            report(&e);
            return Err(e.into());
        }
    };

    match output {
        Some(path) => {
            let path = Settings::expand_path(&path);
            std::fs::write(&path, &text)?;
            Output::success(&format!(
                "Transcript ({}) saved to {}",
                language,
                path.display()
            ));
        }
        None => {
            Output::kv("Language", &language);
            println!("\n{}", text);
        }
    }

    Ok(())
}
