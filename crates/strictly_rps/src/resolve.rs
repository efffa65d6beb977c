//! Round resolution: a fixed beats-relation over canonical moves.

use derive_new::new;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::state::GameState;
use crate::types::{Move, Winner};

/// Winner of a round with a human-readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, new)]
pub struct Resolution {
    /// Who won the round.
    pub winner: Winner,
    /// Which move beat which.
    pub explanation: String,
}

/// Resolves a round between two validated moves.
///
/// The state is not consulted; it is accepted so every round step shares the
/// same shape.
#[instrument(skip(_state))]
pub fn resolve_round(user_move: Move, bot_move: Move, _state: &GameState) -> Resolution {
    if user_move == bot_move {
        return Resolution::new(
            Winner::Draw,
            format!("Both played {}. It's a draw.", user_move),
        );
    }

    if user_move.beats(bot_move) {
        let explanation = if user_move.is_bomb() {
            format!("User's bomb destroys bot's {}.", bot_move)
        } else {
            format!("User's {} beats bot's {}.", user_move, bot_move)
        };
        return Resolution::new(Winner::User, explanation);
    }

    let explanation = if bot_move.is_bomb() {
        format!("Bot's bomb destroys user's {}.", user_move)
    } else {
        format!("Bot's {} beats user's {}.", bot_move, user_move)
    };
    Resolution::new(Winner::Bot, explanation)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(user: Move, bot: Move) -> Resolution {
        resolve_round(user, bot, &GameState::new())
    }

    #[test]
    fn test_identical_moves_draw() {
        for mv in Move::ALL {
            assert_eq!(resolve(mv, mv).winner, Winner::Draw);
        }
        assert_eq!(resolve(Move::Bomb, Move::Bomb).explanation, "Both played bomb. It's a draw.");
    }

    #[test]
    fn test_classic_explanations() {
        let r = resolve(Move::Rock, Move::Scissors);
        assert_eq!(r.winner, Winner::User);
        assert_eq!(r.explanation, "User's rock beats bot's scissors.");

        let r = resolve(Move::Rock, Move::Paper);
        assert_eq!(r.winner, Winner::Bot);
        assert_eq!(r.explanation, "Bot's paper beats user's rock.");
    }

    #[test]
    fn test_bomb_explanations() {
        let r = resolve(Move::Bomb, Move::Paper);
        assert_eq!(r.winner, Winner::User);
        assert_eq!(r.explanation, "User's bomb destroys bot's paper.");

        let r = resolve(Move::Scissors, Move::Bomb);
        assert_eq!(r.winner, Winner::Bot);
        assert_eq!(r.explanation, "Bot's bomb destroys user's scissors.");
    }

    #[test]
    fn test_antisymmetric_over_all_pairs() {
        for a in Move::ALL {
            for b in Move::ALL {
                let forward = resolve(a, b).winner;
                let backward = resolve(b, a).winner;
                match forward {
                    Winner::User => assert_eq!(backward, Winner::Bot),
                    Winner::Bot => assert_eq!(backward, Winner::User),
                    Winner::Draw => assert_eq!(a, b),
                }
            }
        }
    }
}
