//! # hbnb
//!
//! Command interpreter over the `hbnb-core` object store.
//!
//! - [`console`] turns one input line into a store operation and its output.
//! - [`cli`] wraps the console in a REPL and a handful of subcommands.

pub mod cli;
pub mod console;
