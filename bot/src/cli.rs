//! CLI argument definitions for the bot.

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};

/// Keep the Bedrock version database in sync with the store.
#[derive(Parser, Debug, Default)]
#[command(name = "bedrock-db-bot")]
#[command(version, about)]
#[command(long_about = concat!(
    "Keep the Bedrock version database in sync with the store.\n\n",
    "Each cycle asks the Windows Update client web service for the current ",
    "Minecraft packages, appends unseen identifiers to the release and preview ",
    "sequences, rebuilds versions.json, and commits the result to the database ",
    "repository.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Run the configured number of cycles:\n",
    "    $ bedrock-db-bot\n\n",
    "  Run once without publishing:\n",
    "    $ bedrock-db-bot --cycles 1 --dry-run\n\n",
    "  Recompute versions.json from the stored sequences:\n",
    "    $ bedrock-db-bot rebuild",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Configuration file [default: <config dir>/config.toml].
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<Utf8PathBuf>,

    /// Number of cycles to run (overrides schedule.cycles).
    #[arg(long, value_name = "N")]
    pub cycles: Option<u32>,

    /// Seconds to sleep between cycles (overrides schedule.interval_secs).
    #[arg(long, value_name = "SECS")]
    pub interval: Option<u64>,

    /// Compute everything but write nothing to the repository.
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet",
        global = true
    )]
    pub verbosity: u8,

    /// Only log warnings and errors.
    #[arg(short, long, conflicts_with = "verbosity", global = true)]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Run polling cycles (default when no subcommand given).
    Run,

    /// Recompute the version catalog from the stored sequences.
    Rebuild,
}

impl Cli {
    /// Returns the effective subcommand.
    #[must_use]
    pub fn command(&self) -> Command {
        self.command.unwrap_or(Command::Run)
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
