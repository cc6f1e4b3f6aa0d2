//! CLI definitions for promptlift.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// promptlift CLI.
#[derive(Parser)]
#[command(name = "promptlift")]
#[command(about = "Import, enhance and re-insert chat prompts on ChatGPT and Gemini")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path (default: ~/.promptlift/config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Substring of the tab URL to drive (default: first ChatGPT or Gemini tab)
    #[arg(short, long, global = true)]
    pub tab: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Manage the Gemini API key
    Key {
        #[command(subcommand)]
        action: KeyAction,
    },

    /// Read the prompt currently typed in the chat tab
    Import,

    /// Enhance a prompt and print the result
    Enhance {
        /// Prompt to enhance instead of importing it from the tab
        #[arg(long)]
        text: Option<String>,
    },

    /// Import, enhance and write the result back into the tab
    Polish {
        /// Print the enhanced prompt without inserting it
        #[arg(long)]
        dry_run: bool,

        /// Also copy the enhanced prompt to the clipboard
        #[arg(long)]
        copy: bool,
    },

    /// Write text into the chat tab's prompt input
    Insert {
        #[arg(long)]
        text: String,
    },

    /// Copy text to the system clipboard
    Copy {
        #[arg(long)]
        text: String,
    },
}

#[derive(Subcommand)]
pub(crate) enum KeyAction {
    /// Save the API key
    Set {
        /// Gemini API key
        key: String,
    },

    /// Show which key is in effect (masked)
    Show,

    /// Remove the saved key
    Clear,
}
