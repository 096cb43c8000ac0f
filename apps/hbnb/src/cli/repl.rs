//! # REPL
//!
//! The read-eval-print loop around the console. Handles the words the
//! dispatcher does not know about: empty lines, `quit`, `EOF` and `help`.
//!
//! On a terminal the loop uses `rustyline` for line editing; piped input is
//! read line by line without a prompt. Either way the store is saved once more
//! when the loop ends.

use super::config::Config;
use crate::console::Console;
use hbnb_core::StoreError;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{BufRead, IsTerminal, Write};

/// One-line help for each documented command.
pub const HELP_TOPICS: &[(&str, &str)] = &[
    ("EOF", "EOF command to exit the program"),
    ("all", "Prints all string representation of all instances"),
    ("count", "Counts the number of instances of a class"),
    ("create", "Creates a new instance of a class and prints its id"),
    ("destroy", "Deletes an instance based on the class name and id"),
    ("help", "List available commands or show help for one command"),
    ("quit", "Quit command to exit the program"),
    ("show", "Prints the string representation of an instance"),
    ("update", "Updates an instance based on the class name and id"),
];

/// What the loop should do after a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Handle one line, writing any output to `out`.
///
/// Store failures are reported and logged but do not stop the loop.
pub fn handle_line(console: &mut Console, line: &str, out: &mut impl Write) -> Result<Flow, StoreError> {
    let trimmed = line.trim();
    match trimmed {
        "" => return Ok(Flow::Continue),
        "quit" | "EOF" => return Ok(Flow::Quit),
        _ => {}
    }

    if let Some(topic) = help_topic(trimmed) {
        write_help(topic, out)?;
        return Ok(Flow::Continue);
    }

    match console.execute(trimmed) {
        Ok(reply) => {
            for text in &reply.lines {
                writeln!(out, "{}", text).map_err(io_error)?;
            }
        }
        Err(e) => {
            tracing::error!(error = %e, line = trimmed, "command failed");
            writeln!(out, "** {} **", e).map_err(io_error)?;
        }
    }
    Ok(Flow::Continue)
}

/// Run the loop until `quit`, `EOF` or end of input, then save.
pub fn run(console: &mut Console, config: &Config) -> Result<(), StoreError> {
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        run_interactive(console, config)?;
    } else {
        run_piped(console, stdin.lock(), &mut std::io::stdout())?;
    }
    console.shutdown()
}

fn run_interactive(console: &mut Console, config: &Config) -> Result<(), StoreError> {
    let mut editor = DefaultEditor::new().map_err(|e| StoreError::Io(e.to_string()))?;
    let mut stdout = std::io::stdout();

    loop {
        match editor.readline(&config.prompt) {
            Ok(line) => {
                if config.history && !line.trim().is_empty() {
                    if let Err(e) = editor.add_history_entry(line.as_str()) {
                        tracing::debug!(error = %e, "history entry dropped");
                    }
                }
                if handle_line(console, &line, &mut stdout)? == Flow::Quit {
                    break;
                }
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                writeln!(stdout).map_err(io_error)?;
                break;
            }
            Err(e) => return Err(StoreError::Io(e.to_string())),
        }
    }
    Ok(())
}

/// Read commands from any buffered reader (piped stdin, tests).
pub fn run_piped(console: &mut Console, input: impl BufRead, out: &mut impl Write) -> Result<(), StoreError> {
    for line in input.lines() {
        let line = line.map_err(io_error)?;
        if handle_line(console, &line, out)? == Flow::Quit {
            break;
        }
    }
    Ok(())
}

/// `help` -> Some(""), `help show` -> Some("show"), anything else -> None.
fn help_topic(line: &str) -> Option<&str> {
    let rest = line.strip_prefix("help")?;
    if rest.is_empty() {
        return Some("");
    }
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some(rest.trim())
}

fn write_help(topic: &str, out: &mut impl Write) -> Result<(), StoreError> {
    if topic.is_empty() {
        let names: Vec<&str> = HELP_TOPICS.iter().map(|(name, _)| *name).collect();
        writeln!(out).map_err(io_error)?;
        writeln!(out, "Documented commands (type help <topic>):").map_err(io_error)?;
        writeln!(out, "========================================").map_err(io_error)?;
        writeln!(out, "{}", names.join("  ")).map_err(io_error)?;
        writeln!(out).map_err(io_error)?;
        return Ok(());
    }

    match HELP_TOPICS.iter().find(|(name, _)| *name == topic) {
        Some((_, text)) => writeln!(out, "{}", text).map_err(io_error)?,
        None => writeln!(out, "*** No help on {}", topic).map_err(io_error)?,
    }
    Ok(())
}

fn io_error(e: std::io::Error) -> StoreError {
    StoreError::Io(e.to_string())
}
