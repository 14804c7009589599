//! Sidebar CLI - navigation tree state for rendered documentation pages.
//!
//! Provides commands for:
//! - `inspect`: Load a page and print the restored navigation tree
//! - `toggle`: Expand or collapse groups and persist the result
//! - `scroll`: Save the navigation panel scroll offset
//! - `reset`: Forget all persisted state

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{InspectArgs, ResetArgs, ScrollArgs, ToggleArgs};
use output::Output;

/// Sidebar - expandable navigation tree with session persistence.
#[derive(Parser)]
#[command(name = "sidebar", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a page and print its navigation tree.
    Inspect(InspectArgs),
    /// Toggle groups on a page.
    Toggle(ToggleArgs),
    /// Save the navigation panel scroll offset.
    Scroll(ScrollArgs),
    /// Clear the persisted session.
    Reset(ResetArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Inspect(args) => args.common.verbose,
            Self::Toggle(args) => args.common.verbose,
            Self::Scroll(args) => args.common.verbose,
            Self::Reset(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Inspect(args) => args.execute(),
        Commands::Toggle(args) => args.execute(),
        Commands::Scroll(args) => args.execute(),
        Commands::Reset(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
