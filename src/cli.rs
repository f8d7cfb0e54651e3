//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Playbook Converge - Generate publication artifacts and synchronize them
/// to destination repositories
#[derive(Parser, Debug)]
#[command(name = "playbook-converge")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate one project's publication artifacts, optionally pushing them
    Prepare(commands::prepare::PrepareArgs),

    /// Regenerate every project's artifacts and mirror them to all destinations
    Publish(commands::publish::PublishArgs),

    /// Converge all projects and open a merge request against the catalog
    Propose(commands::propose::ProposeArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        env_logger::Builder::from_env(
            env_logger::Env::default().default_filter_or(&self.log_level),
        )
        .init();

        match self.command {
            Commands::Prepare(args) => commands::prepare::execute(args, &self.color),
            Commands::Publish(args) => commands::publish::execute(args, &self.color),
            Commands::Propose(args) => commands::propose::execute(args, &self.color),
        }
    }
}
