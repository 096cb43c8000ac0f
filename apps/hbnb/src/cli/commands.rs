//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use super::config::Config;
use super::repl;
use crate::console::Console;
use hbnb_core::{Kind, Registry, StoreError};
use std::io::{IsTerminal, Write};
use std::path::Path;

// =============================================================================
// REPL COMMAND
// =============================================================================

/// Run the interactive interpreter (the default when no subcommand is given).
pub fn cmd_repl(config: &Config, quiet: bool) -> Result<(), StoreError> {
    let mut console = load_console(&config.file_path)?;

    if !quiet && std::io::stdin().is_terminal() {
        print_banner(&config.file_path, console.registry().len());
    }

    repl::run(&mut console, config)
}

/// Print the interactive startup banner.
fn print_banner(path: &Path, objects: usize) {
    println!("hbnb console v{}", env!("CARGO_PKG_VERSION"));
    println!("Store: {} ({} objects)", path.display(), objects);
    println!("Type help to list commands, quit to exit.");
    println!();
}

// =============================================================================
// EXEC COMMAND
// =============================================================================

/// Run a single command line and exit.
///
/// Mutating commands save as they go, so a read-only line leaves the store
/// file untouched (or absent).
pub fn cmd_exec(config: &Config, words: &[String]) -> Result<(), StoreError> {
    let mut stdout = std::io::stdout();
    exec_line(config, &words.join(" "), &mut stdout)?;
    stdout
        .flush()
        .map_err(|e| StoreError::Io(format!("flush stdout: {}", e)))
}

fn exec_line(config: &Config, line: &str, out: &mut impl Write) -> Result<(), StoreError> {
    let mut console = load_console(&config.file_path)?;
    repl::handle_line(&mut console, line, out)?;
    Ok(())
}

// =============================================================================
// STATUS COMMAND
// =============================================================================

/// Show per-kind object counts.
pub fn cmd_status(config: &Config, json_mode: bool) -> Result<(), StoreError> {
    let registry = Registry::open(&config.file_path)?;

    if json_mode {
        let counts: serde_json::Map<String, serde_json::Value> = Kind::ALL
            .iter()
            .map(|kind| (kind.name().to_string(), registry.count(*kind).into()))
            .collect();
        let output = serde_json::json!({
            "file": config.file_path.to_string_lossy(),
            "total": registry.len(),
            "counts": counts,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("hbnb Store Status");
    println!("=================");
    println!("File:  {}", config.file_path.display());
    println!("Total: {}", registry.len());
    println!();
    for kind in Kind::ALL {
        println!("{:<10} {}", kind.name(), registry.count(kind));
    }

    Ok(())
}

// =============================================================================
// INIT COMMAND
// =============================================================================

/// Write an empty store.
pub fn cmd_init(config: &Config, force: bool) -> Result<(), StoreError> {
    let path = &config.file_path;
    if path.exists() && !force {
        return Err(StoreError::Io(format!(
            "store '{}' already exists. Use --force to overwrite.",
            path.display()
        )));
    }

    Registry::new(path.clone()).save()?;
    tracing::info!(path = %path.display(), "initialized empty store");
    println!("Initialized empty store at {}", path.display());
    Ok(())
}

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Open the console on the store at `path`.
///
/// A corrupt store is fatal here: the session never starts on top of it.
pub fn load_console(path: &Path) -> Result<Console, StoreError> {
    Console::open(path).inspect_err(|e| {
        tracing::error!(path = %path.display(), error = %e, "cannot load store");
    })
}
