//! Command-line interface definition for Tutora
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for interactive chat and one-shot PDF extraction.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tutora - interactive AI tutoring chat
///
/// Converse with a tutoring model, upload a PDF textbook excerpt, and
/// practice with multiple-choice questions generated from its text.
#[derive(Parser, Debug, Clone)]
#[command(name = "tutora")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/config.yaml")]
    pub config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Tutora
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive tutoring session
    Chat {
        /// Override the provider from config (gemini, ollama)
        #[arg(short, long)]
        provider: Option<String>,

        /// Override the context window capacity in exchange pairs
        #[arg(short, long)]
        window_pairs: Option<usize>,

        /// Path to a file replacing the built-in tutor instruction text
        #[arg(long)]
        prompt_file: Option<PathBuf>,
    },

    /// Extract the plain text of a PDF and print it
    Extract {
        /// Path to the PDF file
        file: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    ///
    /// # Returns
    ///
    /// Returns the parsed CLI structure
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_command_parses() {
        let cli = Cli::parse_from(["tutora", "chat", "--provider", "ollama"]);
        match cli.command {
            Commands::Chat { provider, .. } => assert_eq!(provider.as_deref(), Some("ollama")),
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_chat_window_pairs_override() {
        let cli = Cli::parse_from(["tutora", "chat", "--window-pairs", "3"]);
        match cli.command {
            Commands::Chat { window_pairs, .. } => assert_eq!(window_pairs, Some(3)),
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_extract_command_parses() {
        let cli = Cli::parse_from(["tutora", "extract", "notes.pdf"]);
        match cli.command {
            Commands::Extract { file } => assert_eq!(file, PathBuf::from("notes.pdf")),
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::parse_from(["tutora", "chat"]);
        assert_eq!(cli.config, "config/config.yaml");
        assert!(!cli.verbose);
    }
}
