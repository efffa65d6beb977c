//! Strictly Referee - terminal entry point.

#![warn(missing_docs)]

use std::io::{self, BufWriter};

use anyhow::Result;
use clap::Parser;
use strictly_referee::cli::{Cli, Command, PlayArgs};
use strictly_referee::{InMemoryStore, run_console, tool_schemas};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Play(args) => run_play(args),
        Command::Schemas => print_schemas(),
    }
}

/// Logs go to stderr so they never interleave with the game on stdout.
fn init_tracing(default_filter: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Play a game in the terminal
#[instrument(skip(args))]
fn run_play(args: PlayArgs) -> Result<()> {
    let config = args.resolve_config()?;
    init_tracing(if *config.debug() { "debug" } else { "warn" });

    info!(
        bot = %config.bot(),
        penalty_history = %config.penalty_history(),
        "Starting console game"
    );

    let store = InMemoryStore::new();
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_console(&config, &store, stdin.lock(), BufWriter::new(stdout.lock()))
}

/// Print the tool schemas as JSON
fn print_schemas() -> Result<()> {
    init_tracing("warn");
    let schemas = tool_schemas();
    println!("{}", serde_json::to_string_pretty(&schemas)?);
    Ok(())
}
