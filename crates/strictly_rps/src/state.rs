//! The game state snapshot and its per-round records.

use derive_new::new;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::StateError;
use crate::invariants::{GameStateInvariants, InvariantSet};
use crate::types::{Move, Side, Winner};

/// Number of rounds in a full game.
pub const MAX_ROUNDS: u8 = 3;

/// Score that ends the game early.
pub const WINNING_SCORE: u8 = 2;

/// Record of a single completed round. Immutable once created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, new)]
pub struct RoundResult {
    /// Round the result belongs to (1-indexed).
    pub round_number: u8,
    /// The user's move.
    pub user_move: Move,
    /// The bot's move.
    pub bot_move: Move,
    /// Who won the round.
    pub winner: Winner,
}

impl RoundResult {
    /// Returns the move the given side played.
    pub fn move_of(&self, side: Side) -> Move {
        match side {
            Side::User => self.user_move,
            Side::Bot => self.bot_move,
        }
    }
}

fn first_round() -> u8 {
    1
}

/// Complete state of one best-of-three game.
///
/// The snapshot is flat and JSON-compatible; only `round_history` nests.
/// Absent fields default to a fresh game's values when deserializing, but the
/// result is always checked against the state invariants, so a snapshot with
/// out-of-range values is rejected rather than coerced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "RawGameState")]
pub struct GameState {
    pub(crate) current_round: u8,
    pub(crate) user_score: u8,
    pub(crate) bot_score: u8,
    pub(crate) user_bomb_used: bool,
    pub(crate) bot_bomb_used: bool,
    pub(crate) round_history: Vec<RoundResult>,
    pub(crate) game_over: bool,
    pub(crate) final_winner: Option<Winner>,
}

/// Wire form of [`GameState`] before the invariants are checked.
#[derive(Deserialize, JsonSchema)]
#[schemars(rename = "GameState")]
struct RawGameState {
    #[serde(default = "first_round")]
    current_round: u8,
    #[serde(default)]
    user_score: u8,
    #[serde(default)]
    bot_score: u8,
    #[serde(default)]
    user_bomb_used: bool,
    #[serde(default)]
    bot_bomb_used: bool,
    #[serde(default)]
    round_history: Vec<RoundResult>,
    #[serde(default)]
    game_over: bool,
    #[serde(default)]
    final_winner: Option<Winner>,
}

impl TryFrom<RawGameState> for GameState {
    type Error = StateError;

    fn try_from(raw: RawGameState) -> Result<Self, Self::Error> {
        let state = Self {
            current_round: raw.current_round,
            user_score: raw.user_score,
            bot_score: raw.bot_score,
            user_bomb_used: raw.user_bomb_used,
            bot_bomb_used: raw.bot_bomb_used,
            round_history: raw.round_history,
            game_over: raw.game_over,
            final_winner: raw.final_winner,
        };
        state.check()?;
        Ok(state)
    }
}

impl GameState {
    /// Creates a fresh game: round 1, no score, no bombs spent.
    #[instrument]
    pub fn new() -> Self {
        Self {
            current_round: first_round(),
            user_score: 0,
            bot_score: 0,
            user_bomb_used: false,
            bot_bomb_used: false,
            round_history: Vec::new(),
            game_over: false,
            final_winner: None,
        }
    }

    /// Returns the round about to be played (or the last one, once over).
    pub fn current_round(&self) -> u8 {
        self.current_round
    }

    /// Returns the user's score.
    pub fn user_score(&self) -> u8 {
        self.user_score
    }

    /// Returns the bot's score.
    pub fn bot_score(&self) -> u8 {
        self.bot_score
    }

    /// Returns true once the user has played their bomb.
    pub fn user_bomb_used(&self) -> bool {
        self.user_bomb_used
    }

    /// Returns true once the bot has played its bomb.
    pub fn bot_bomb_used(&self) -> bool {
        self.bot_bomb_used
    }

    /// Returns true once the given side has played its bomb.
    pub fn bomb_used(&self, side: Side) -> bool {
        match side {
            Side::User => self.user_bomb_used,
            Side::Bot => self.bot_bomb_used,
        }
    }

    /// Returns the recorded rounds, oldest first.
    pub fn round_history(&self) -> &[RoundResult] {
        &self.round_history
    }

    /// Returns true once the game has ended.
    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// Returns the game's winner; present exactly when the game is over.
    pub fn final_winner(&self) -> Option<Winner> {
        self.final_winner
    }

    /// Number of rounds consumed so far, scored or wasted.
    pub fn rounds_played(&self) -> u8 {
        if self.game_over {
            self.current_round
        } else {
            self.current_round.saturating_sub(1)
        }
    }

    /// Checks every state invariant.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] listing each violated invariant.
    #[instrument(skip(self), fields(round = self.current_round, game_over = self.game_over))]
    pub fn check(&self) -> Result<(), StateError> {
        GameStateInvariants::check_all(self).map_err(|violations| {
            debug!(count = violations.len(), "State invariants violated");
            StateError::from_violations(&violations)
        })
    }

    /// Serializes the snapshot as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if serialization fails.
    #[instrument(skip(self))]
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a JSON snapshot. Decoding checks the invariants.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the JSON is malformed, a field has the wrong
    /// type or range, or the decoded state violates an invariant.
    #[instrument(skip(json))]
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
