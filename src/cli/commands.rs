//! Command definitions and structures for the CLI
//!
//! All clap-based argument definitions: the main CLI structure and its
//! subcommands.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use nootify::env::ActivePolicy;

/// Main CLI structure
#[derive(Parser)]
#[command(name = "nootify")]
#[command(about = "Send notifications through the Nootify API")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Settings file (default: ~/.nootify/config.toml)
    #[arg(long, global = true, env = "NOOTIFY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the notification endpoint
    #[arg(long, global = true, env = "NOOTIFY_ENDPOINT")]
    pub endpoint: Option<String>,

    /// How an unset active flag is treated: default-active or default-inactive
    #[arg(long, global = true, env = "NOOTIFY_ACTIVE_POLICY")]
    pub active_policy: Option<ActivePolicy>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Send a notification
    Send {
        /// Message to send
        #[arg(required_unless_present = "stdin")]
        message: Option<String>,

        /// Optional title
        #[arg(short, long)]
        title: Option<String>,

        /// Set the silent/broadcast flag on the notification
        #[arg(short, long)]
        flag: bool,

        /// Read the notification from stdin (plain text or JSON)
        #[arg(long, conflicts_with_all = ["message", "title", "flag"])]
        stdin: bool,
    },

    /// Write a default settings file
    Init {
        /// Overwrite an existing settings file
        #[arg(short, long)]
        force: bool,
    },

    /// Inspect settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Show which environment variables are recognized and set
    Env,
}

/// Configuration actions
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the settings file contents
    Show,
}
