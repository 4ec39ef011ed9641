//! CLI module providing command-line interface functionality
//!
//! Argument parsing and routing to handlers.

pub mod commands;
pub mod context;
pub mod handlers;

use anyhow::Result;
use clap::Parser;

pub use commands::{Cli, Commands, ConfigAction};
pub use context::CliContext;
pub use handlers::CommandHandler;

/// Main CLI application
pub struct CliApp;

impl CliApp {
    /// Parse command line arguments and execute the requested command
    pub async fn run() -> Result<()> {
        let cli = Cli::parse();

        // init overwrites the settings file, so it must not depend on parsing it
        let context = match cli.command {
            Commands::Init { .. } => CliContext::without_settings_file(
                cli.config,
                cli.endpoint,
                cli.active_policy,
                cli.verbose,
            )?,
            _ => CliContext::new(cli.config, cli.endpoint, cli.active_policy, cli.verbose)?,
        };
        context.init_logging()?;

        let handler = CommandHandler::new(context);
        handler.handle_command(cli.command).await
    }
}
