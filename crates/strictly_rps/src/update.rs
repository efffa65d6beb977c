//! The state updater: the only place a game state changes.
//!
//! Two call shapes share one finishing routine. [`StateUpdater::apply_round`]
//! records a normally resolved round; [`StateUpdater::apply_penalty`] charges
//! an invalid user move as a bot win. Both then run the same
//! advance-and-check-game-over step.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::error::StateError;
use crate::state::{GameState, MAX_ROUNDS, RoundResult, WINNING_SCORE};
use crate::types::{Move, Side, Winner};

/// Move recorded for the user on a penalty round.
pub const PENALTY_PLACEHOLDER: Move = Move::Rock;

/// Whether penalty rounds are written to `round_history`.
///
/// Defaults to [`PenaltyHistory::Skip`], so the history holds exactly the
/// normally resolved rounds.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PenaltyHistory {
    /// Penalty rounds change scores and the round counter only.
    #[default]
    Skip,
    /// Penalty rounds are also recorded, with the placeholder user move.
    Record,
}

/// Applies round outcomes to game state snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StateUpdater {
    penalty_history: PenaltyHistory,
}

impl StateUpdater {
    /// Creates an updater with the given penalty history policy.
    #[instrument]
    pub fn new(penalty_history: PenaltyHistory) -> Self {
        Self { penalty_history }
    }

    /// Applies a normally resolved round and returns the next state.
    ///
    /// Appends the round to the history, scores the winner, marks each side's
    /// bomb as spent if it was played (draws included), then advances or ends
    /// the game. A finished game is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the input snapshot is malformed.
    #[instrument(skip(self, state), fields(round = state.current_round()))]
    pub fn apply_round(
        &self,
        state: &GameState,
        user_move: Move,
        bot_move: Move,
        winner: Winner,
    ) -> Result<GameState, StateError> {
        state.check()?;
        if state.game_over() {
            debug!("Game already over, state unchanged");
            return Ok(state.clone());
        }

        let mut next = state.clone();
        next.round_history
            .push(RoundResult::new(next.current_round, user_move, bot_move, winner));
        score_round(&mut next, user_move, bot_move, winner);
        finish_round(&mut next);
        Ok(next)
    }

    /// Charges an invalid user move as a round won by the bot.
    ///
    /// The bot's actually selected move still counts for its bomb flag. The
    /// round is recorded in the history only under [`PenaltyHistory::Record`].
    /// A finished game is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`StateError`] if the input snapshot is malformed.
    #[instrument(
        skip(self, state),
        fields(round = state.current_round(), policy = %self.penalty_history)
    )]
    pub fn apply_penalty(
        &self,
        state: &GameState,
        bot_move: Move,
    ) -> Result<GameState, StateError> {
        state.check()?;
        if state.game_over() {
            debug!("Game already over, state unchanged");
            return Ok(state.clone());
        }

        let mut next = state.clone();
        if self.penalty_history == PenaltyHistory::Record {
            next.round_history.push(RoundResult::new(
                next.current_round,
                PENALTY_PLACEHOLDER,
                bot_move,
                Winner::Bot,
            ));
        }
        score_round(&mut next, PENALTY_PLACEHOLDER, bot_move, Winner::Bot);
        finish_round(&mut next);
        Ok(next)
    }
}

fn score_round(state: &mut GameState, user_move: Move, bot_move: Move, winner: Winner) {
    match winner.side() {
        Some(Side::User) => state.user_score += 1,
        Some(Side::Bot) => state.bot_score += 1,
        None => {}
    }
    if user_move.is_bomb() {
        state.user_bomb_used = true;
    }
    if bot_move.is_bomb() {
        state.bot_bomb_used = true;
    }
}

/// Ends the game if a termination rule fired, otherwise moves to the next round.
fn finish_round(state: &mut GameState) {
    let final_winner = if state.user_score >= WINNING_SCORE {
        Some(Winner::User)
    } else if state.bot_score >= WINNING_SCORE {
        Some(Winner::Bot)
    } else if state.current_round >= MAX_ROUNDS {
        Some(Winner::by_score(state.user_score, state.bot_score))
    } else {
        None
    };

    match final_winner {
        Some(winner) => {
            info!(
                %winner,
                user_score = state.user_score,
                bot_score = state.bot_score,
                "Game over"
            );
            state.game_over = true;
            state.final_winner = Some(winner);
        }
        None => {
            state.current_round += 1;
            debug!(round = state.current_round, "Advanced to next round");
        }
    }
}
