//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod job;
mod list;

pub use job::JobCommands;
pub use list::ListArgs;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use serde::Serialize;
use uws_core::domain::Phase;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List jobs, optionally filtered
    List(ListArgs),
    /// Job management
    Job {
        #[command(subcommand)]
        command: JobCommands,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::List(args) => list::handle_list_command(args, config).await,
        Commands::Job { command } => job::handle_job_command(command, config).await,
    }
}

/// Colorize a phase name; unknown phases are printed as-is
pub(crate) fn colorize_phase(phase: &str) -> ColoredString {
    match phase.parse::<Phase>() {
        Ok(Phase::Pending | Phase::Held) => phase.yellow(),
        Ok(Phase::Queued | Phase::Suspended) => phase.blue(),
        Ok(Phase::Executing) => phase.cyan(),
        Ok(Phase::Completed) => phase.green(),
        Ok(Phase::Error) => phase.red(),
        Ok(Phase::Aborted) => phase.magenta(),
        Ok(Phase::Unknown | Phase::Archived) => phase.dimmed(),
        Err(_) => phase.normal(),
    }
}

/// Print a value as pretty JSON on stdout
pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
