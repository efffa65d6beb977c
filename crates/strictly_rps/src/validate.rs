//! Move validation against the canonical move set and bomb usage.

use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::state::GameState;
use crate::types::{Move, Side};

/// Why a candidate move was refused.
///
/// The display text is the human-readable reason shown to the player.
#[derive(Debug, Clone, PartialEq, Eq, Display, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum InvalidMove {
    /// The candidate is not one of the four canonical tokens.
    #[display("Invalid move '{}'. Must be one of: rock, paper, scissors, bomb.", input)]
    Unrecognized {
        /// The candidate as given.
        input: String,
    },
    /// The player already spent their bomb this game.
    #[display("{}", bomb_reason(*side))]
    BombAlreadyUsed {
        /// Who tried to bomb twice.
        side: Side,
    },
}

fn bomb_reason(side: Side) -> &'static str {
    match side {
        Side::User => "Bomb already used. You can only use bomb once per game.",
        Side::Bot => "Bot has already used bomb this game.",
    }
}

/// Outcome of validating a candidate move. Never an error: an invalid move is
/// an ordinary result that leads to a penalty round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValidation {
    /// The candidate is a playable canonical move.
    Valid(Move),
    /// The candidate was refused.
    Invalid(InvalidMove),
}

impl MoveValidation {
    /// Returns true for [`MoveValidation::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, MoveValidation::Valid(_))
    }

    /// Returns the accepted move, if any.
    pub fn normalized_move(&self) -> Option<Move> {
        match self {
            MoveValidation::Valid(mv) => Some(*mv),
            MoveValidation::Invalid(_) => None,
        }
    }

    /// Human-readable reason for the verdict.
    pub fn reason(&self) -> String {
        match self {
            MoveValidation::Valid(_) => "Valid move.".to_string(),
            MoveValidation::Invalid(invalid) => invalid.to_string(),
        }
    }
}

/// Validates a candidate move for `side` against the current state.
///
/// The candidate is trimmed and lowercased, then must name a canonical move;
/// a bomb is refused once the side's bomb flag is set. Reads the state only.
#[instrument(skip(state), fields(bomb_used = state.bomb_used(side)))]
pub fn validate_move(candidate: &str, side: Side, state: &GameState) -> MoveValidation {
    let normalized = candidate.trim().to_lowercase();

    let Ok(mv) = Move::from_str(&normalized) else {
        debug!(candidate, "Candidate is not a canonical move");
        return MoveValidation::Invalid(InvalidMove::Unrecognized {
            input: candidate.to_string(),
        });
    };

    if mv.is_bomb() && state.bomb_used(side) {
        debug!(%side, "Bomb already spent");
        return MoveValidation::Invalid(InvalidMove::BombAlreadyUsed { side });
    }

    MoveValidation::Valid(mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_moves_valid() {
        let state = GameState::new();
        for mv in Move::ALL {
            assert_eq!(validate_move(mv.as_str(), Side::User, &state), MoveValidation::Valid(mv));
        }
    }

    #[test]
    fn test_candidate_is_normalized() {
        let state = GameState::new();
        let result = validate_move("  PaPeR ", Side::Bot, &state);
        assert_eq!(result.normalized_move(), Some(Move::Paper));
        assert_eq!(result.reason(), "Valid move.");
    }

    #[test]
    fn test_unknown_candidate_rejected() {
        let state = GameState::new();
        let result = validate_move("unknown", Side::User, &state);
        assert!(!result.is_valid());
        assert_eq!(result.normalized_move(), None);
        assert_eq!(
            result.reason(),
            "Invalid move 'unknown'. Must be one of: rock, paper, scissors, bomb."
        );
    }

    #[test]
    fn test_synonyms_are_not_canonical() {
        let state = GameState::new();
        assert!(!validate_move("stone", Side::User, &state).is_valid());
    }

    #[test]
    fn test_second_bomb_rejected_per_side() {
        let mut state = GameState::new();
        state.user_bomb_used = true;

        let user = validate_move("bomb", Side::User, &state);
        assert_eq!(
            user,
            MoveValidation::Invalid(InvalidMove::BombAlreadyUsed { side: Side::User })
        );
        assert_eq!(user.reason(), "Bomb already used. You can only use bomb once per game.");

        assert!(validate_move("bomb", Side::Bot, &state).is_valid());

        state.bot_bomb_used = true;
        let bot = validate_move("bomb", Side::Bot, &state);
        assert_eq!(bot.reason(), "Bot has already used bomb this game.");
    }

    #[test]
    fn test_spent_bomb_leaves_other_moves_valid() {
        let mut state = GameState::new();
        state.user_bomb_used = true;
        for mv in Move::BASE {
            assert!(validate_move(mv.as_str(), Side::User, &state).is_valid());
        }
    }
}
