//! Command-line interface definition for copilot-bridge
//!
//! This module defines the CLI structure using clap's derive API,
//! providing commands for one-shot execution, interactive chat, model
//! discovery, and installation checks.

use clap::{Parser, Subcommand};

/// copilot-bridge - Session-aware command bridge for the GitHub Copilot CLI
///
/// Runs prompts through the external Copilot CLI with timeout salvage,
/// failure classification, and per-session history.
#[derive(Parser, Debug, Clone)]
#[command(name = "copilot-bridge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for copilot-bridge
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Execute a single prompt
    Run {
        /// Prompt text to send
        prompt: String,

        /// Additional context appended to the prompt
        #[arg(long)]
        context: Option<String>,

        /// Model to use (overrides the configured default)
        #[arg(short, long)]
        model: Option<String>,

        /// Pass --allow-all-tools to the Copilot CLI
        #[arg(long)]
        allow_all_tools: bool,

        /// Resume an existing Copilot CLI session id
        #[arg(long)]
        resume: Option<String>,

        /// Extra arguments passed to the Copilot CLI verbatim (repeatable)
        #[arg(long = "extra-arg", allow_hyphen_values = true)]
        extra_args: Vec<String>,

        /// Print the full result as JSON instead of plain text
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive chat session
    Chat {
        /// Model to use (overrides the configured default)
        #[arg(short, long)]
        model: Option<String>,

        /// Pass --allow-all-tools to the Copilot CLI
        #[arg(long)]
        allow_all_tools: bool,
    },

    /// List model identifiers discovered from the Copilot CLI
    Models {
        /// Print the catalog as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the Copilot CLI is installed and responding
    Doctor,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            verbose: false,
            command: Commands::Doctor,
        }
    }
}
