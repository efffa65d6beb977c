//! Bot move selection.
//!
//! Every selector honours the same contract: once the bot's bomb is spent it
//! picks only from rock, paper and scissors.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, instrument};

use crate::state::GameState;
use crate::types::Move;

/// Moves the bot may still play in the given state.
pub fn available_moves(state: &GameState) -> &'static [Move] {
    if state.bot_bomb_used() {
        &Move::BASE
    } else {
        &Move::ALL
    }
}

/// Something that picks the bot's move for a round.
pub trait BotMoveSelector: Send {
    /// Picks a move that is legal for the bot in `state`.
    fn select(&mut self, state: &GameState) -> Move;

    /// Returns the selector's display name.
    fn name(&self) -> &str;
}

/// Uniform random choice over the available moves.
///
/// Backed by ChaCha8 so a seed reproduces a whole game.
#[derive(Debug, Clone)]
pub struct RandomBot {
    rng: ChaCha8Rng,
}

impl RandomBot {
    /// Creates a selector with a fixed seed.
    #[instrument]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a selector seeded from system entropy.
    #[instrument]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
        }
    }
}

impl BotMoveSelector for RandomBot {
    fn select(&mut self, state: &GameState) -> Move {
        let moves = available_moves(state);
        let mv = moves[self.rng.gen_range(0..moves.len())];
        debug!(%mv, bomb_available = !state.bot_bomb_used(), "Random bot chose move");
        mv
    }

    fn name(&self) -> &str {
        "random"
    }
}

/// Deterministic fallback: cycles through the available moves by round.
///
/// Picks index `(round - 1) mod count` of [`available_moves`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CyclingBot;

impl CyclingBot {
    /// Selects for an explicit round number instead of the state's current one.
    #[instrument(skip(state))]
    pub fn select_for_round(state: &GameState, round: u8) -> Move {
        let moves = available_moves(state);
        let index = usize::from(round.saturating_sub(1)) % moves.len();
        moves[index]
    }
}

impl BotMoveSelector for CyclingBot {
    fn select(&mut self, state: &GameState) -> Move {
        Self::select_for_round(state, state.current_round())
    }

    fn name(&self) -> &str {
        "cycle"
    }
}

/// Plays a fixed script of moves, then falls back to cycling.
///
/// A scripted bomb the bot can no longer play is replaced by the cycling
/// choice, so the script can never break the selector contract.
#[derive(Debug, Clone, Default)]
pub struct ScriptedBot {
    script: VecDeque<Move>,
}

impl ScriptedBot {
    /// Creates a selector that plays `moves` in order.
    pub fn new(moves: impl IntoIterator<Item = Move>) -> Self {
        Self {
            script: moves.into_iter().collect(),
        }
    }
}

impl BotMoveSelector for ScriptedBot {
    fn select(&mut self, state: &GameState) -> Move {
        match self.script.pop_front() {
            Some(mv) if available_moves(state).contains(&mv) => mv,
            _ => CyclingBot::select_for_round(state, state.current_round()),
        }
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
