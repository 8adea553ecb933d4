//! CLI module for vidnote.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// vidnote - notes and chat for YouTube videos
///
/// Fetches the best available transcript of a video, translates it to English
/// when needed, and either writes notes and key topics or answers questions
/// about it.
#[derive(Parser, Debug)]
#[command(name = "vidnote")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate key topics and notes for a video
    Notes {
        /// YouTube URL or video ID
        url: String,

        /// LLM model to use
        #[arg(short, long, env = "VIDNOTE_MODEL")]
        model: Option<String>,

        /// Also write the notes to a Markdown file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start an interactive chat about a video
    Chat {
        /// YouTube URL or video ID
        url: String,

        /// LLM model to use
        #[arg(short, long, env = "VIDNOTE_MODEL")]
        model: Option<String>,
    },

    /// Ask a single question about a video
    Ask {
        /// YouTube URL or video ID
        url: String,

        /// The question to ask
        question: String,

        /// LLM model to use
        #[arg(short, long, env = "VIDNOTE_MODEL")]
        model: Option<String>,
    },

    /// Print the transcript selected for a video
    Transcript {
        /// YouTube URL or video ID
        url: String,

        /// List the available tracks and the order they are tried in
        #[arg(short, long)]
        list: bool,

        /// Translate the transcript to English if it is in another language
        #[arg(short, long)]
        translate: bool,

        /// Write the transcript to a file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Start HTTP API server for integration with other systems
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// LLM model to use
        #[arg(short, long, env = "VIDNOTE_MODEL")]
        model: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ask() {
        let cli = Cli::try_parse_from([
            "vidnote",
            "-vv",
            "ask",
            "https://youtu.be/pBRSZBtirAk",
            "What is it about?",
            "--model",
            "gpt-4o",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ask { url, question, model } => {
                assert_eq!(url, "https://youtu.be/pBRSZBtirAk");
                assert_eq!(question, "What is it about?");
                assert_eq!(model.as_deref(), Some("gpt-4o"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_parse_transcript_flags() {
        let cli = Cli::try_parse_from(["vidnote", "transcript", "pBRSZBtirAk", "--list"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Transcript { list: true, translate: false, .. }
        ));
    }
}
