//! Pure game logic for best-of-three rock-paper-scissors with a one-time bomb.
//!
//! Every operation is state-in, state-out: callers hand over a full
//! [`GameState`] snapshot and get the next one back. Nothing here performs
//! I/O or keeps state between calls.
//!
//! # Round pipeline
//!
//! - [`parse_intent`] turns free text into a move, an unreadable attempt, or a
//!   rules request
//! - [`validate_move`] checks a candidate against the move set and bomb usage
//! - [`resolve_round`] applies the beats-relation
//! - [`StateUpdater`] is the single mutation point and owns game termination
//! - [`BotMoveSelector`] implementations pick the opponent's move
//!
//! # Example
//!
//! ```
//! use strictly_rps::{GameState, Move, StateUpdater, Side, resolve_round, validate_move};
//!
//! let state = GameState::new();
//! let user = validate_move("rock", Side::User, &state).normalized_move().unwrap();
//! let resolution = resolve_round(user, Move::Scissors, &state);
//! let next = StateUpdater::default()
//!     .apply_round(&state, user, Move::Scissors, resolution.winner)
//!     .unwrap();
//! assert_eq!(next.user_score(), 1);
//! assert_eq!(next.current_round(), 2);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod bot;
mod error;
mod intent;
pub mod invariants;
mod resolve;
mod state;
mod types;
mod update;
mod validate;

pub use bot::{BotMoveSelector, CyclingBot, RandomBot, ScriptedBot, available_moves};
pub use error::StateError;
pub use intent::{
    FILLERS, Intent, MOVE_SYNONYMS, RULES_KEYWORDS, extract_move, is_rules_request,
    normalize_input, parse_intent,
};
pub use resolve::{Resolution, resolve_round};
pub use state::{GameState, MAX_ROUNDS, RoundResult, WINNING_SCORE};
pub use types::{Move, Side, Winner};
pub use update::{PENALTY_PLACEHOLDER, PenaltyHistory, StateUpdater};
pub use validate::{InvalidMove, MoveValidation, validate_move};
