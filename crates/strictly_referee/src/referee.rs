//! Round orchestration.
//!
//! The referee turns one line of user text into one round: it classifies the
//! text, drives the tools through the dispatcher, asks the bot for its move,
//! and renders a reply from the tool results.

use derive_getters::Getters;
use derive_new::new;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use strictly_rps::{
    BotMoveSelector, GameState, Intent, Move, PenaltyHistory, Resolution, Side, Winner,
    parse_intent,
};
use tracing::{debug, info, instrument, warn};

use crate::config::RefereeConfig;
use crate::observer::{GameObserver, LogLevel, NoopObserver};
use crate::render::{RULES_TEXT, render_game_over, render_invalid, render_round};
use crate::tools::{
    ResolveRoundRequest, ToolBox, ToolError, ToolName, UpdateGameStateOutput,
    UpdateGameStateRequest, UpdatePath, ValidateMoveOutput, ValidateMoveRequest, encode,
};

/// What happened in a call to [`Referee::play_round`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// The game had already ended; nothing changed.
    AlreadyOver,
    /// The user asked for the rules; no round was consumed.
    Rules,
    /// The user's move was refused and the bot took the round.
    Penalty {
        /// Why the move was refused.
        reason: String,
        /// The bot's move.
        bot_move: Move,
    },
    /// Both moves were valid and the round was resolved.
    Resolved {
        /// The user's move.
        user_move: Move,
        /// The bot's move.
        bot_move: Move,
        /// Who won the round.
        winner: Winner,
    },
}

impl RoundOutcome {
    /// Returns true if the round changed the state.
    pub fn consumed_round(&self) -> bool {
        matches!(self, RoundOutcome::Penalty { .. } | RoundOutcome::Resolved { .. })
    }
}

/// The next state and the message to show the player.
#[derive(Debug, Clone, Getters, new)]
pub struct RoundReply {
    /// State after the round.
    state: GameState,
    /// Rendered reply.
    message: String,
    /// What the round did.
    outcome: RoundOutcome,
}

impl RoundReply {
    /// Splits the reply into the next state and the message.
    pub fn into_parts(self) -> (GameState, String) {
        (self.state, self.message)
    }
}

/// Referee for best-of-three rock-paper-scissors-bomb.
///
/// Holds no game state. Every round takes the current snapshot and returns
/// the next one, so callers decide where state lives.
pub struct Referee {
    tools: ToolBox,
    bot: Box<dyn BotMoveSelector>,
    observer: Box<dyn GameObserver>,
}

impl std::fmt::Debug for Referee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Referee")
            .field("tools", &self.tools)
            .field("bot", &self.bot.name())
            .finish()
    }
}

impl Referee {
    /// Creates a referee with the given bot and penalty policy, and no observer.
    #[instrument(skip(bot), fields(bot = bot.name()))]
    pub fn new(bot: Box<dyn BotMoveSelector>, penalty_history: PenaltyHistory) -> Self {
        Self {
            tools: ToolBox::new(penalty_history),
            bot,
            observer: Box::new(NoopObserver),
        }
    }

    /// Builds a referee from configuration.
    #[instrument(skip(config))]
    pub fn from_config(config: &RefereeConfig) -> Self {
        Self::new(config.build_bot(), *config.penalty_history())
    }

    /// Replaces the observer.
    pub fn with_observer(mut self, observer: impl GameObserver + 'static) -> Self {
        self.observer = Box::new(observer);
        self
    }

    /// Creates a fresh game and returns it with the welcome message.
    #[instrument(skip(self))]
    pub fn start_game(&self) -> (GameState, &'static str) {
        info!(bot = self.bot.name(), "Starting new game");
        self.observer.note(LogLevel::Info, "New game started");
        (GameState::new(), RULES_TEXT)
    }

    /// Runs a tool by name, reporting the call and its result to the observer.
    ///
    /// # Errors
    ///
    /// Returns the tool's [`ToolError`]; the observer sees it first.
    #[instrument(skip(self, args))]
    pub fn dispatch(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        self.observer.tool_call(name, &args);
        match self.tools.dispatch(name, args) {
            Ok(result) => {
                self.observer.tool_result(name, &result);
                Ok(result)
            }
            Err(err) => {
                warn!(tool = name, error = %err, "Tool failed");
                self.observer.error(&err.to_string());
                Err(err)
            }
        }
    }

    fn call<Req, Out>(&self, tool: ToolName, req: &Req) -> Result<Out, ToolError>
    where
        Req: Serialize,
        Out: DeserializeOwned,
    {
        let result = self.dispatch(tool.as_ref(), encode(tool, req)?)?;
        serde_json::from_value(result).map_err(|e| ToolError::Encoding {
            tool,
            message: e.to_string(),
        })
    }

    /// Plays one round from the current snapshot and raw user text.
    ///
    /// A finished game is returned unchanged with the game-over line. A rules
    /// request returns the state unchanged with the rules text. Otherwise the
    /// round is consumed: a refused move becomes a bot win, a valid one is
    /// resolved against the bot's move.
    ///
    /// # Errors
    ///
    /// Returns [`ToolError::State`] if `state` is malformed.
    #[instrument(skip(self, state), fields(round = state.current_round()))]
    pub fn play_round(&mut self, state: &GameState, input: &str) -> Result<RoundReply, ToolError> {
        let round = state.current_round();
        self.observer.round_start(round);

        if let Err(err) = state.check() {
            self.observer.error(&err.to_string());
            return Err(err.into());
        }

        if state.game_over() {
            self.observer
                .note(LogLevel::Debug, "Game already over, returning final state");
            return Ok(RoundReply::new(
                state.clone(),
                render_game_over(state.final_winner()).to_string(),
                RoundOutcome::AlreadyOver,
            ));
        }

        let intent = parse_intent(input);
        self.observer.intent_parsed(input, intent);
        if intent == Intent::Rules {
            self.observer
                .note(LogLevel::Debug, "Non-move request, returning rules");
            return Ok(RoundReply::new(
                state.clone(),
                RULES_TEXT.to_string(),
                RoundOutcome::Rules,
            ));
        }

        let validation: ValidateMoveOutput = self.call(
            ToolName::ValidateMove,
            &ValidateMoveRequest {
                candidate: intent.candidate().to_string(),
                player: Side::User,
                game_state: state.clone(),
            },
        )?;

        let reply = match validation.normalized_move.filter(|_| validation.is_valid) {
            None => self.play_penalty(state, validation.reason)?,
            Some(user_move) => self.play_resolved(state, user_move)?,
        };

        if reply.state.game_over() {
            let winner = reply.state.final_winner().unwrap_or(Winner::Draw);
            self.observer
                .game_over(winner, reply.state.user_score(), reply.state.bot_score());
        }
        Ok(reply)
    }

    fn play_penalty(
        &mut self,
        state: &GameState,
        reason: String,
    ) -> Result<RoundReply, ToolError> {
        self.observer
            .note(LogLevel::Info, &format!("Invalid move: {}", reason));
        let bot_move = self.bot.select(state);

        let UpdateGameStateOutput { updated_game_state } = self.call(
            ToolName::UpdateGameState,
            &UpdateGameStateRequest {
                game_state: state.clone(),
                path: UpdatePath::Penalty { bot_move },
            },
        )?;
        self.observer
            .round_end(state.current_round(), Winner::Bot, None, bot_move);

        let message = render_invalid(&reason, bot_move, &updated_game_state);
        Ok(RoundReply::new(
            updated_game_state,
            message,
            RoundOutcome::Penalty { reason, bot_move },
        ))
    }

    fn play_resolved(
        &mut self,
        state: &GameState,
        user_move: Move,
    ) -> Result<RoundReply, ToolError> {
        let bot_move = self.bot.select(state);
        debug!(%user_move, %bot_move, "Moves locked in");
        self.observer
            .note(LogLevel::Debug, &format!("Bot selected move: {}", bot_move));

        let resolution: Resolution = self.call(
            ToolName::ResolveRound,
            &ResolveRoundRequest {
                user_move,
                bot_move,
                game_state: state.clone(),
            },
        )?;

        let UpdateGameStateOutput { updated_game_state } = self.call(
            ToolName::UpdateGameState,
            &UpdateGameStateRequest {
                game_state: state.clone(),
                path: UpdatePath::Round {
                    user_move,
                    bot_move,
                    round_winner: resolution.winner,
                },
            },
        )?;
        self.observer.round_end(
            state.current_round(),
            resolution.winner,
            Some(user_move),
            bot_move,
        );

        let message = render_round(user_move, bot_move, &resolution, &updated_game_state);
        Ok(RoundReply::new(
            updated_game_state,
            message,
            RoundOutcome::Resolved {
                user_move,
                bot_move,
                winner: resolution.winner,
            },
        ))
    }
}
