//! The three game tools and their name-based dispatcher.
//!
//! Each tool takes typed, JSON-schema-described arguments carrying the full
//! game state snapshot and returns a structured result. The tools hold no
//! state of their own; [`ToolBox::update_game_state`] is the only one that
//! produces a new snapshot.

use std::str::FromStr;

use derive_more::{Display, From};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strictly_rps::{
    GameState, Move, MoveValidation, PenaltyHistory, Resolution, Side, StateError, StateUpdater,
    Winner, resolve_round, validate_move,
};
use tracing::{debug, instrument, warn};

/// Names of the available tools.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ToolName {
    /// Checks a move against the move set and bomb usage.
    ValidateMove,
    /// Decides a round between two validated moves.
    ResolveRound,
    /// Applies a round outcome to the state.
    UpdateGameState,
}

impl ToolName {
    /// One-line description advertised with the tool's schema.
    pub fn description(self) -> &'static str {
        match self {
            ToolName::ValidateMove => {
                "Validates a player's move in Rock-Paper-Scissors-Bomb. \
                 Checks move validity and bomb usage rules."
            }
            ToolName::ResolveRound => {
                "Determines the winner of a Rock-Paper-Scissors-Bomb round \
                 based on both players' validated moves."
            }
            ToolName::UpdateGameState => {
                "Applies a round outcome to the game state. Updates scores, \
                 tracks bomb usage, records history, and checks for game completion."
            }
        }
    }

    /// JSON schema for the tool's arguments.
    #[instrument]
    pub fn parameters_schema(self) -> Value {
        match self {
            ToolName::ValidateMove => schemars::schema_for!(ValidateMoveRequest).to_value(),
            ToolName::ResolveRound => schemars::schema_for!(ResolveRoundRequest).to_value(),
            ToolName::UpdateGameState => schemars::schema_for!(UpdateGameStateRequest).to_value(),
        }
    }
}

/// Advertised description of one tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSchema {
    /// Tool name used for dispatch.
    pub name: ToolName,
    /// What the tool does.
    pub description: &'static str,
    /// JSON schema of the arguments object.
    pub parameters: Value,
}

/// Schemas of every tool, in dispatch order.
#[instrument]
pub fn tool_schemas() -> Vec<ToolSchema> {
    use strum::IntoEnumIterator;

    ToolName::iter()
        .map(|name| ToolSchema {
            name,
            description: name.description(),
            parameters: name.parameters_schema(),
        })
        .collect()
}

/// Arguments for `validate_move`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ValidateMoveRequest {
    /// The move to validate (rock, paper, scissors, or bomb).
    #[serde(rename = "move")]
    pub candidate: String,
    /// Which player is making the move.
    pub player: Side,
    /// The current game state object.
    pub game_state: GameState,
}

/// Arguments for `resolve_round`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ResolveRoundRequest {
    /// The user's validated move.
    pub user_move: Move,
    /// The bot's validated move.
    pub bot_move: Move,
    /// The current game state object.
    pub game_state: GameState,
}

/// Which update to apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "path", rename_all = "snake_case")]
pub enum UpdatePath {
    /// A normally resolved round.
    Round {
        /// The user's validated move.
        user_move: Move,
        /// The bot's validated move.
        bot_move: Move,
        /// The winner from `resolve_round`.
        round_winner: Winner,
    },
    /// An invalid user move, charged as a bot win.
    Penalty {
        /// The move the bot selected for the wasted round.
        bot_move: Move,
    },
}

/// Arguments for `update_game_state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct UpdateGameStateRequest {
    /// The current game state object.
    pub game_state: GameState,
    /// The update to apply.
    #[serde(flatten)]
    pub path: UpdatePath,
}

/// Result of `validate_move`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidateMoveOutput {
    /// Whether the move may be played.
    pub is_valid: bool,
    /// The canonical move when valid.
    pub normalized_move: Option<Move>,
    /// Human-readable reason.
    pub reason: String,
}

impl From<&MoveValidation> for ValidateMoveOutput {
    fn from(validation: &MoveValidation) -> Self {
        Self {
            is_valid: validation.is_valid(),
            normalized_move: validation.normalized_move(),
            reason: validation.reason(),
        }
    }
}

/// Result of `update_game_state`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateGameStateOutput {
    /// The next state snapshot.
    pub updated_game_state: GameState,
}

/// Errors from tool dispatch. Game outcomes are never errors.
#[derive(Debug, Clone, Display, From)]
pub enum ToolError {
    /// No tool has this name.
    #[display("Unknown tool: {}", name)]
    UnknownOperation {
        /// The requested name.
        name: String,
    },
    /// The arguments did not match the tool's schema.
    #[display("Invalid arguments for {}: {}", tool, message)]
    InvalidArguments {
        /// The tool that was called.
        tool: ToolName,
        /// What was wrong.
        message: String,
    },
    /// The tool's output could not be encoded.
    #[display("Failed to encode {} output: {}", tool, message)]
    Encoding {
        /// The tool that was called.
        tool: ToolName,
        /// What was wrong.
        message: String,
    },
    /// The state snapshot broke the model's contract.
    #[display("{}", _0)]
    #[from]
    State(StateError),
}

impl std::error::Error for ToolError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ToolError::State(err) => Some(err),
            _ => None,
        }
    }
}

/// Runs the game tools against caller-supplied snapshots.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToolBox {
    updater: StateUpdater,
}

impl ToolBox {
    /// Creates a tool box whose updater uses the given penalty policy.
    #[instrument]
    pub fn new(penalty_history: PenaltyHistory) -> Self {
        Self {
            updater: StateUpdater::new(penalty_history),
        }
    }

    /// Validates a candidate move.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::State`] if the snapshot is malformed.
    #[instrument(skip(self, req), fields(candidate = %req.candidate, player = %req.player))]
    pub fn validate_move(&self, req: &ValidateMoveRequest) -> Result<MoveValidation, ToolError> {
        req.game_state.check()?;
        Ok(validate_move(&req.candidate, req.player, &req.game_state))
    }

    /// Resolves a round.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::State`] if the snapshot is malformed.
    #[instrument(skip(self, req), fields(user_move = %req.user_move, bot_move = %req.bot_move))]
    pub fn resolve_round(&self, req: &ResolveRoundRequest) -> Result<Resolution, ToolError> {
        req.game_state.check()?;
        Ok(resolve_round(req.user_move, req.bot_move, &req.game_state))
    }

    /// Applies a round outcome and returns the next snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::State`] if the snapshot is malformed.
    #[instrument(skip(self, req), fields(path = ?req.path))]
    pub fn update_game_state(&self, req: &UpdateGameStateRequest) -> Result<GameState, ToolError> {
        let next = match req.path {
            UpdatePath::Round {
                user_move,
                bot_move,
                round_winner,
            } => self
                .updater
                .apply_round(&req.game_state, user_move, bot_move, round_winner)?,
            UpdatePath::Penalty { bot_move } => {
                self.updater.apply_penalty(&req.game_state, bot_move)?
            }
        };
        Ok(next)
    }

    /// Runs a tool by name with JSON arguments and returns its JSON result.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::UnknownOperation`] for an unknown name,
    /// [`ToolError::InvalidArguments`] if `args` does not fit the tool, and
    /// [`ToolError::State`] if the snapshot is malformed.
    #[instrument(skip(self, args))]
    pub fn dispatch(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let tool = ToolName::from_str(name).map_err(|_| {
            warn!(name, "Unknown tool requested");
            ToolError::UnknownOperation {
                name: name.to_string(),
            }
        })?;
        debug!(%tool, "Dispatching tool");

        match tool {
            ToolName::ValidateMove => {
                let req: ValidateMoveRequest = decode(tool, args)?;
                let validation = self.validate_move(&req)?;
                encode(tool, &ValidateMoveOutput::from(&validation))
            }
            ToolName::ResolveRound => {
                let req: ResolveRoundRequest = decode(tool, args)?;
                encode(tool, &self.resolve_round(&req)?)
            }
            ToolName::UpdateGameState => {
                let req: UpdateGameStateRequest = decode(tool, args)?;
                let updated_game_state = self.update_game_state(&req)?;
                encode(tool, &UpdateGameStateOutput { updated_game_state })
            }
        }
    }
}

/// Decodes tool arguments. A snapshot that fails to decode is a malformed
/// state, not a bad argument.
fn decode<T: DeserializeOwned>(tool: ToolName, args: Value) -> Result<T, ToolError> {
    if let Some(snapshot) = args.get("game_state") {
        GameState::deserialize(snapshot).map_err(StateError::from)?;
    }
    serde_json::from_value(args).map_err(|e| ToolError::InvalidArguments {
        tool,
        message: e.to_string(),
    })
}

pub(crate) fn encode<T: Serialize>(tool: ToolName, output: &T) -> Result<Value, ToolError> {
    serde_json::to_value(output).map_err(|e| ToolError::Encoding {
        tool,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fresh() -> Value {
        serde_json::to_value(GameState::new()).unwrap()
    }

    #[test]
    fn test_tool_names_parse() {
        assert_eq!(ToolName::from_str("validate_move"), Ok(ToolName::ValidateMove));
        assert_eq!(ToolName::UpdateGameState.to_string(), "update_game_state");
        assert!(ToolName::from_str("waste_round").is_err());
    }

    #[test]
    fn test_schemas_cover_every_tool() {
        let schemas = tool_schemas();
        let names: Vec<&str> = schemas.iter().map(|s| s.name.as_ref()).collect();
        assert_eq!(names, ["validate_move", "resolve_round", "update_game_state"]);
        for schema in &schemas {
            assert!(schema.parameters.is_object());
            assert!(!schema.description.is_empty());
        }
    }

    #[test]
    fn test_validate_schema_names_move_field() {
        let schema = ToolName::ValidateMove.parameters_schema();
        assert!(schema["properties"].get("move").is_some());
        assert!(schema["properties"].get("game_state").is_some());
    }

    #[test]
    fn test_dispatch_validate_move() {
        let out = ToolBox::default()
            .dispatch(
                "validate_move",
                json!({ "move": "Rock", "player": "user", "game_state": fresh() }),
            )
            .unwrap();
        assert_eq!(
            out,
            json!({ "is_valid": true, "normalized_move": "rock", "reason": "Valid move." })
        );
    }

    #[test]
    fn test_dispatch_resolve_round() {
        let out = ToolBox::default()
            .dispatch(
                "resolve_round",
                json!({ "user_move": "bomb", "bot_move": "rock", "game_state": fresh() }),
            )
            .unwrap();
        assert_eq!(out["winner"], "user");
        assert_eq!(out["explanation"], "User's bomb destroys bot's rock.");
    }

    #[test]
    fn test_dispatch_update_round_path() {
        let out = ToolBox::default()
            .dispatch(
                "update_game_state",
                json!({
                    "game_state": fresh(),
                    "path": "round",
                    "user_move": "paper",
                    "bot_move": "rock",
                    "round_winner": "user",
                }),
            )
            .unwrap();
        let state: GameState = serde_json::from_value(out["updated_game_state"].clone()).unwrap();
        assert_eq!(state.user_score(), 1);
        assert_eq!(state.current_round(), 2);
    }

    #[test]
    fn test_dispatch_update_penalty_path() {
        let out = ToolBox::new(PenaltyHistory::Record)
            .dispatch(
                "update_game_state",
                json!({ "game_state": fresh(), "path": "penalty", "bot_move": "scissors" }),
            )
            .unwrap();
        assert_eq!(out["updated_game_state"]["bot_score"], 1);
        assert_eq!(
            out["updated_game_state"]["round_history"][0]["user_move"],
            "rock"
        );
    }

    #[test]
    fn test_dispatch_unknown_tool() {
        let err = ToolBox::default()
            .dispatch("waste_round", json!({ "game_state": fresh() }))
            .unwrap_err();
        assert!(matches!(err, ToolError::UnknownOperation { ref name } if name == "waste_round"));
        assert_eq!(err.to_string(), "Unknown tool: waste_round");
    }

    #[test]
    fn test_dispatch_bad_arguments() {
        let err = ToolBox::default()
            .dispatch("resolve_round", json!({ "user_move": "lizard" }))
            .unwrap_err();
        assert!(matches!(
            err,
            ToolError::InvalidArguments { tool: ToolName::ResolveRound, .. }
        ));
    }

    #[test]
    fn test_dispatch_malformed_state() {
        let err = ToolBox::default()
            .dispatch(
                "validate_move",
                json!({ "move": "rock", "player": "user", "game_state": { "current_round": 7 } }),
            )
            .unwrap_err();
        assert!(matches!(err, ToolError::State(_)));
    }

    #[test]
    fn test_dispatch_rejects_inconsistent_snapshot() {
        let err = ToolBox::default()
            .dispatch(
                "update_game_state",
                json!({
                    "game_state": { "current_round": 2, "user_score": 2, "bot_score": 1 },
                    "path": "penalty",
                    "bot_move": "rock",
                }),
            )
            .unwrap_err();
        assert!(matches!(err, ToolError::State(_)));
    }

    #[test]
    fn test_missing_snapshot_is_an_argument_error() {
        let err = ToolBox::default()
            .dispatch("resolve_round", json!({ "user_move": "rock", "bot_move": "paper" }))
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments { .. }));
    }
}
