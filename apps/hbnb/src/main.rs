//! # hbnb - Object Console
//!
//! The main binary for the hbnb command interpreter.
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │              apps/hbnb (THE BINARY)           │
//! │                                               │
//! │  ┌─────────────┐         ┌────────────────┐   │
//! │  │  CLI/REPL   │ ──────▶ │    Console     │   │
//! │  │ (clap,      │         │ (syntax,       │   │
//! │  │  rustyline) │         │  ladder)       │   │
//! │  └─────────────┘         └───────┬────────┘   │
//! │                                  ▼            │
//! │                          ┌───────────────┐    │
//! │                          │   hbnb-core   │    │
//! │                          │  (THE STORE)  │    │
//! │                          └───────────────┘    │
//! └───────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Interactive session
//! hbnb
//!
//! # One-shot commands
//! hbnb exec create User
//! hbnb -f data.json exec 'User.update("1234", "first_name", "Betty")'
//! echo "all User" | hbnb
//! ```

use clap::Parser;
use hbnb::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    let cli = cli::Cli::parse();

    // HBNB_LOG_FORMAT=json enables machine-parseable output. Logs go to stderr.
    let log_format = std::env::var("HBNB_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let default_filter = if cli.verbose { "hbnb=debug" } else { "hbnb=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    if let Err(e) = cli::execute(cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
