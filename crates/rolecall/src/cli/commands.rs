//! CLI command definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Rolecall - Discord reaction role selector
#[derive(Parser, Debug)]
#[command(name = "rolecall")]
#[command(about = "Discord reaction role selector", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./rolecall.toml if present)
    #[arg(short, long, global = true, env = "ROLECALL_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON log lines
    #[arg(long, global = true)]
    pub json_logs: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect to Discord and serve the role selector
    Run {
        /// Apply pending database migrations before starting
        #[arg(long)]
        migrate: bool,
    },

    /// Apply pending database migrations and exit
    Migrate,

    /// Load every selector config and report entries that no longer resolve
    HydrateCheck,
}
