//! Referee configuration.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use strictly_rps::{BotMoveSelector, CyclingBot, PenaltyHistory, RandomBot};
use tracing::{debug, info, instrument};

/// Which bot move selector to use.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BotKind {
    /// Uniform random choice over the available moves.
    #[default]
    Random,
    /// Cycles through the available moves by round.
    Cycle,
}

/// Configuration for a referee session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct RefereeConfig {
    /// Whether penalty rounds are written to the round history.
    #[serde(default)]
    penalty_history: PenaltyHistory,

    /// Bot move selector.
    #[serde(default)]
    bot: BotKind,

    /// Seed for the random bot; entropy when absent.
    #[serde(default)]
    #[setters(strip_option)]
    seed: Option<u64>,

    /// Verbose logging and history dump on exit.
    #[serde(default)]
    debug: bool,

    /// Session key used with the state store.
    #[serde(default = "default_session_id")]
    #[setters(into)]
    session_id: String,
}

#[instrument]
fn default_session_id() -> String {
    "demo_session".to_string()
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            penalty_history: PenaltyHistory::default(),
            bot: BotKind::default(),
            seed: None,
            debug: false,
            session_id: default_session_id(),
        }
    }
}

impl RefereeConfig {
    /// Loads configuration from a TOML file. Absent keys take their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(
            bot = %config.bot,
            penalty_history = %config.penalty_history,
            session_id = %config.session_id,
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Builds the configured bot move selector.
    #[instrument(skip(self), fields(bot = %self.bot, seed = ?self.seed))]
    pub fn build_bot(&self) -> Box<dyn BotMoveSelector> {
        match (self.bot, self.seed) {
            (BotKind::Random, Some(seed)) => Box::new(RandomBot::seeded(seed)),
            (BotKind::Random, None) => Box::new(RandomBot::from_entropy()),
            (BotKind::Cycle, _) => Box::new(CyclingBot),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = RefereeConfig::default();
        assert_eq!(config.penalty_history(), &PenaltyHistory::Skip);
        assert_eq!(config.bot(), &BotKind::Random);
        assert_eq!(config.seed(), &None);
        assert!(!*config.debug());
        assert_eq!(config.session_id(), "demo_session");
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let file = write_config("");
        assert_eq!(RefereeConfig::from_file(file.path()).unwrap(), RefereeConfig::default());
    }

    #[test]
    fn test_file_values_loaded() {
        let file = write_config(
            r#"
penalty_history = "record"
bot = "cycle"
seed = 42
debug = true
session_id = "table_7"
"#,
        );
        let config = RefereeConfig::from_file(file.path()).unwrap();
        assert_eq!(config.penalty_history(), &PenaltyHistory::Record);
        assert_eq!(config.bot(), &BotKind::Cycle);
        assert_eq!(config.seed(), &Some(42));
        assert!(*config.debug());
        assert_eq!(config.session_id(), "table_7");
    }

    #[test]
    fn test_bad_value_rejected() {
        let file = write_config(r#"bot = "oracle""#);
        let err = RefereeConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.starts_with("Failed to parse config"));
    }

    #[test]
    fn test_missing_file_rejected() {
        let err = RefereeConfig::from_file("/nonexistent/referee.toml").unwrap_err();
        assert!(err.message.starts_with("Failed to read config file"));
    }

    #[test]
    fn test_build_bot_matches_kind() {
        let config = RefereeConfig::default().with_seed(3);
        assert_eq!(config.build_bot().name(), "random");
        assert_eq!(config.with_bot(BotKind::Cycle).build_bot().name(), "cycle");
    }
}
