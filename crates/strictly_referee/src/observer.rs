//! Observer capability for game events.
//!
//! The referee receives an observer at construction and reports every tool
//! call, parsed intent and round milestone to it. Nothing is global: swapping
//! the observer means building a referee with a different one.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use strictly_rps::{Intent, Move, Winner};
use tracing::{debug, error, info, instrument, warn};

/// Severity of an observed event, lowest first.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogLevel {
    /// Tool results and internal detail.
    Debug,
    /// Round milestones and tool calls.
    Info,
    /// Recoverable oddities.
    Warn,
    /// Contract violations and unknown operations.
    Error,
}

/// What part of the referee an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum LogCategory {
    /// A tool call or result.
    Tool,
    /// A state transition returned by `update_game_state`.
    State,
    /// Intent parsing.
    Intent,
    /// Round and game milestones.
    Game,
    /// Failures.
    Error,
}

/// Receives referee events. Every method defaults to doing nothing.
pub trait GameObserver: Send {
    /// A tool is about to run with the given arguments.
    fn tool_call(&self, _name: &str, _args: &Value) {}

    /// A tool returned.
    fn tool_result(&self, _name: &str, _result: &Value) {}

    /// User text was classified.
    fn intent_parsed(&self, _raw: &str, _intent: Intent) {}

    /// A round is about to be processed.
    fn round_start(&self, _round: u8) {}

    /// A round finished. `user_move` is `None` for a penalty round.
    fn round_end(&self, _round: u8, _winner: Winner, _user_move: Option<Move>, _bot_move: Move) {}

    /// The game ended.
    fn game_over(&self, _winner: Winner, _user_score: u8, _bot_score: u8) {}

    /// Something went wrong.
    fn error(&self, _message: &str) {}

    /// Free-form note at the given level.
    fn note(&self, _level: LogLevel, _message: &str) {}
}

/// Observer that ignores everything. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl GameObserver for NoopObserver {}

/// Forwards every event to `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl GameObserver for TracingObserver {
    fn tool_call(&self, name: &str, args: &Value) {
        info!(tool = name, %args, "Calling tool");
    }

    fn tool_result(&self, name: &str, result: &Value) {
        debug!(tool = name, %result, "Tool returned");
    }

    fn intent_parsed(&self, raw: &str, intent: Intent) {
        info!(raw, candidate = intent.candidate(), "Parsed intent");
    }

    fn round_start(&self, round: u8) {
        info!(round, "Round started");
    }

    fn round_end(&self, round: u8, winner: Winner, user_move: Option<Move>, bot_move: Move) {
        info!(round, %winner, ?user_move, %bot_move, "Round ended");
    }

    fn game_over(&self, winner: Winner, user_score: u8, bot_score: u8) {
        info!(%winner, user_score, bot_score, "Game over");
    }

    fn error(&self, message: &str) {
        error!(error = message, "Referee error");
    }

    fn note(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => debug!("{}", message),
            LogLevel::Info => info!("{}", message),
            LogLevel::Warn => warn!("{}", message),
            LogLevel::Error => error!("{}", message),
        }
    }
}

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    /// When the event was recorded.
    pub timestamp: DateTime<Utc>,
    /// Severity.
    pub level: LogLevel,
    /// Source area.
    pub category: LogCategory,
    /// Human-readable summary.
    pub message: String,
    /// Structured payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Records events in memory for later inspection.
///
/// Clones share the same history, so a caller can keep one handle and give
/// another to the referee.
#[derive(Debug, Clone)]
pub struct HistoryObserver {
    min_level: LogLevel,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl HistoryObserver {
    /// Creates an observer that keeps events at `min_level` and above.
    #[instrument]
    pub fn new(min_level: LogLevel) -> Self {
        Self {
            min_level,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a copy of the recorded entries.
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Returns the recorded entries as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[instrument(skip(self))]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries())
    }

    /// Drops every recorded entry.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, level: LogLevel, category: LogCategory, message: String, data: Option<Value>) {
        if level < self.min_level {
            return;
        }
        let entry = LogEntry {
            timestamp: Utc::now(),
            level,
            category,
            message,
            data,
        };
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(entry);
    }
}

impl Default for HistoryObserver {
    fn default() -> Self {
        Self::new(LogLevel::Info)
    }
}

impl GameObserver for HistoryObserver {
    fn tool_call(&self, name: &str, args: &Value) {
        self.record(
            LogLevel::Info,
            LogCategory::Tool,
            format!("Calling {}", name),
            Some(json!({ "args": args })),
        );
    }

    fn tool_result(&self, name: &str, result: &Value) {
        let category = if name == "update_game_state" {
            LogCategory::State
        } else {
            LogCategory::Tool
        };
        self.record(
            LogLevel::Debug,
            category,
            format!("{} returned", name),
            Some(json!({ "result": result })),
        );
    }

    fn intent_parsed(&self, raw: &str, intent: Intent) {
        let extracted = match intent {
            Intent::Rules => "none (rules request)",
            other => other.candidate(),
        };
        self.record(
            LogLevel::Info,
            LogCategory::Intent,
            format!("Parsed intent: '{}' → {}", raw, extracted),
            None,
        );
    }

    fn round_start(&self, round: u8) {
        self.record(
            LogLevel::Info,
            LogCategory::Game,
            format!("Round {} started", round),
            None,
        );
    }

    fn round_end(&self, round: u8, winner: Winner, user_move: Option<Move>, bot_move: Move) {
        let user_move = user_move.map_or("invalid", Move::as_str);
        self.record(
            LogLevel::Info,
            LogCategory::Game,
            format!("Round {} ended: {} wins", round, winner),
            Some(json!({ "user_move": user_move, "bot_move": bot_move })),
        );
    }

    fn game_over(&self, winner: Winner, user_score: u8, bot_score: u8) {
        self.record(
            LogLevel::Info,
            LogCategory::Game,
            format!("Game over: {} wins ({}-{})", winner, user_score, bot_score),
            None,
        );
    }

    fn error(&self, message: &str) {
        self.record(LogLevel::Error, LogCategory::Error, message.to_string(), None);
    }

    fn note(&self, level: LogLevel, message: &str) {
        self.record(level, LogCategory::Game, message.to_string(), None);
    }
}

/// Fans every event out to several observers in order.
#[derive(Default)]
pub struct ObserverSet {
    observers: Vec<Box<dyn GameObserver>>,
}

impl ObserverSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an observer to the end of the set.
    pub fn with(mut self, observer: impl GameObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Number of observers in the set.
    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Returns true if the set has no observers.
    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }
}

impl std::fmt::Debug for ObserverSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObserverSet")
            .field("len", &self.observers.len())
            .finish()
    }
}

impl GameObserver for ObserverSet {
    fn tool_call(&self, name: &str, args: &Value) {
        self.observers.iter().for_each(|o| o.tool_call(name, args));
    }

    fn tool_result(&self, name: &str, result: &Value) {
        self.observers.iter().for_each(|o| o.tool_result(name, result));
    }

    fn intent_parsed(&self, raw: &str, intent: Intent) {
        self.observers.iter().for_each(|o| o.intent_parsed(raw, intent));
    }

    fn round_start(&self, round: u8) {
        self.observers.iter().for_each(|o| o.round_start(round));
    }

    fn round_end(&self, round: u8, winner: Winner, user_move: Option<Move>, bot_move: Move) {
        self.observers
            .iter()
            .for_each(|o| o.round_end(round, winner, user_move, bot_move));
    }

    fn game_over(&self, winner: Winner, user_score: u8, bot_score: u8) {
        self.observers
            .iter()
            .for_each(|o| o.game_over(winner, user_score, bot_score));
    }

    fn error(&self, message: &str) {
        self.observers.iter().for_each(|o| o.error(message));
    }

    fn note(&self, level: LogLevel, message: &str) {
        self.observers.iter().for_each(|o| o.note(level, message));
    }
}
