//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Compose and submit therapy sessions against the practice API
#[derive(Parser, Debug)]
#[command(name = "session-draft")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default: ~/.session-draft/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List clients
    Clients,

    /// Show what can be selected for a client: goals, milestones, allies,
    /// products and strategies
    Context {
        /// Client ID
        client_id: i64,
    },

    /// List recorded sessions
    Sessions,

    /// Build a draft from a JSON plan and submit it
    Submit {
        /// Path to the plan file
        plan: PathBuf,

        /// Build and validate the draft without sending anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Print the effective configuration
    Config,
}
