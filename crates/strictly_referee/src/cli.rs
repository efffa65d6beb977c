//! Command-line interface for strictly_referee.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use strictly_rps::PenaltyHistory;
use tracing::instrument;

use crate::config::{BotKind, ConfigError, RefereeConfig};

/// Strictly Referee - best-of-three rock-paper-scissors-bomb against a bot
#[derive(Parser, Debug)]
#[command(name = "strictly_referee")]
#[command(about = "Referee for rock-paper-scissors-bomb", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play(PlayArgs),

    /// Print the JSON schemas of the game tools
    Schemas,
}

/// Options for an interactive game
#[derive(Args, Debug, Clone, Default)]
pub struct PlayArgs {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Verbose logging and log history on exit
    #[arg(short, long)]
    pub debug: bool,

    /// Seed for the random bot
    #[arg(long)]
    pub seed: Option<u64>,

    /// Bot move selector
    #[arg(long, value_enum)]
    pub bot: Option<BotKind>,

    /// Record penalty rounds in the round history
    #[arg(long)]
    pub record_penalties: bool,
}

impl PlayArgs {
    /// Loads the configuration file, if any, and applies the flags over it.
    #[instrument(skip(self))]
    pub fn resolve_config(&self) -> Result<RefereeConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RefereeConfig::from_file(path)?,
            None => RefereeConfig::default(),
        };
        if self.debug {
            config = config.with_debug(true);
        }
        if let Some(seed) = self.seed {
            config = config.with_seed(seed);
        }
        if let Some(bot) = self.bot {
            config = config.with_bot(bot);
        }
        if self.record_penalties {
            config = config.with_penalty_history(PenaltyHistory::Record);
        }
        Ok(config)
    }
}
