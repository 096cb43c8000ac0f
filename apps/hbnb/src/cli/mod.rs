//! # hbnb CLI Module
//!
//! This module implements the CLI interface for hbnb.
//!
//! ## Available Commands
//!
//! - *(none)* - Start the interactive interpreter
//! - `exec` - Run one command line and exit
//! - `status` - Show per-kind object counts
//! - `init` - Write an empty store

mod commands;
pub mod config;
pub mod repl;

use clap::{Parser, Subcommand};
use hbnb_core::StoreError;
use std::path::PathBuf;

pub use commands::*;
pub use config::Config;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// hbnb - object console
///
/// A line-oriented interpreter over a small persistent object store.
#[derive(Parser, Debug)]
#[command(name = "hbnb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the JSON store (overrides HBNB_FILE and the config file)
    #[arg(short, long, global = true)]
    pub file: Option<PathBuf>,

    /// Path to a TOML config file (default: hbnb.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one console command and exit
    Exec {
        /// The command line, e.g. `create User` or `User.count()`
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        words: Vec<String>,
    },

    /// Show per-kind object counts
    Status,

    /// Initialize a new empty store
    Init {
        /// Overwrite an existing store
        #[arg(long)]
        force: bool,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub fn execute(cli: Cli) -> Result<(), StoreError> {
    let config = Config::load(cli.config.as_deref())?
        .with_overrides(config::file_from_env(), cli.file);
    tracing::debug!(?config, "configuration resolved");

    match cli.command {
        Some(Commands::Exec { words }) => cmd_exec(&config, &words),
        Some(Commands::Status) => cmd_status(&config, cli.json_mode),
        Some(Commands::Init { force }) => cmd_init(&config, force),
        None => cmd_repl(&config, cli.quiet),
    }
}
