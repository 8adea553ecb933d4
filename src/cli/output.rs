//! CLI output formatting utilities.

use crate::rag::ContextChunk;
use crate::transcript::TranscriptTrack;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output helper for CLI formatting.
pub struct Output;

impl Output {
    /// Print an info message.
    pub fn info(msg: &str) {
        println!("{} {}", style(">>").cyan().bold(), msg);
    }

    /// Print a success message.
    pub fn success(msg: &str) {
        println!("{} {}", style(">>").green().bold(), msg);
    }

    /// Print a warning message.
    pub fn warning(msg: &str) {
        eprintln!("{} {}", style(">>").yellow().bold(), msg);
    }

    /// Print an error message.
    pub fn error(msg: &str) {
        eprintln!("{} {}", style(">>").red().bold(), msg);
    }

    /// Print a header.
    pub fn header(msg: &str) {
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a key-value pair.
    pub fn kv(key: &str, value: &str) {
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a transcript track.
    pub fn track(track: &TranscriptTrack) {
        let kind = if track.is_generated {
            style("generated").yellow()
        } else {
            style("manual").green()
        };
        println!(
            "  {} {} ({}, {})",
            style("*").cyan(),
            style(&track.language_code).bold(),
            track.language,
            kind
        );
    }

    /// Print a retrieved source chunk.
    pub fn source(rank: usize, source: &ContextChunk) {
        println!(
            "\n{} chunk #{} (score: {:.2})",
            style(format!("[{}]", rank)).green(),
            style(source.chunk_order + 1).bold(),
            source.score
        );
        println!("   {}", content_preview(&source.content, 200));
    }

    /// Create a spinner.
    pub fn spinner(msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

/// Truncate content with ellipsis.
fn content_preview(content: &str, max_chars: usize) -> String {
    let content = content.replace('\n', " ");
    if content.chars().count() <= max_chars {
        content
    } else {
        let cut: String = content.chars().take(max_chars).collect();
        format!("{}...", cut)
    }
}
