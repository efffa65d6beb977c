//! First-class invariants for the game state.
//!
//! Invariants are logical properties every snapshot must satisfy. They are
//! checked whenever a snapshot enters the engine and can be tested on their
//! own.

use crate::state::{GameState, MAX_ROUNDS, WINNING_SCORE};
use crate::types::{Side, Winner};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set.
    ///
    /// Returns Ok(()) if all invariants hold, or Err with a list of
    /// violations if any invariant fails.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

fn check_one<S, I: Invariant<S>>(state: &S, violations: &mut Vec<InvariantViolation>) {
    if !I::holds(state) {
        violations.push(InvariantViolation::new(I::description()));
    }
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        check_one::<S, I2>(state, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

impl<S, I1, I2, I3, I4> InvariantSet<S> for (I1, I2, I3, I4)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
    I4: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();
        check_one::<S, I1>(state, &mut violations);
        check_one::<S, I2>(state, &mut violations);
        check_one::<S, I3>(state, &mut violations);
        check_one::<S, I4>(state, &mut violations);

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: the round counter stays within `1..=3`.
pub struct RoundInRangeInvariant;

impl Invariant<GameState> for RoundInRangeInvariant {
    fn holds(state: &GameState) -> bool {
        (1..=MAX_ROUNDS).contains(&state.current_round)
    }

    fn description() -> &'static str {
        "Current round is between 1 and 3"
    }
}

/// Invariant: scores fit in the rounds played and stop at the winning score.
///
/// An ongoing game has nobody at the winning score; a finished game has at
/// most one player there.
pub struct ScoreBoundsInvariant;

impl Invariant<GameState> for ScoreBoundsInvariant {
    fn holds(state: &GameState) -> bool {
        let (user, bot) = (state.user_score, state.bot_score);
        let scored = u16::from(user) + u16::from(bot);

        if scored > u16::from(state.rounds_played()) {
            return false;
        }
        if user > WINNING_SCORE || bot > WINNING_SCORE {
            return false;
        }
        if state.game_over {
            !(user == WINNING_SCORE && bot == WINNING_SCORE)
        } else {
            user < WINNING_SCORE && bot < WINNING_SCORE
        }
    }

    fn description() -> &'static str {
        "Scores never exceed rounds played and stop at the winning score"
    }
}

/// Invariant: the game is over exactly when a termination rule fired, and
/// the final winner is present exactly then and agrees with the scores.
pub struct TerminationInvariant;

impl Invariant<GameState> for TerminationInvariant {
    fn holds(state: &GameState) -> bool {
        match (state.game_over, state.final_winner) {
            (false, None) => true,
            (false, Some(_)) | (true, None) => false,
            (true, Some(winner)) => {
                let ended_by_score =
                    state.user_score >= WINNING_SCORE || state.bot_score >= WINNING_SCORE;
                let ended_by_rounds = state.current_round == MAX_ROUNDS;
                (ended_by_score || ended_by_rounds)
                    && winner == Winner::by_score(state.user_score, state.bot_score)
            }
        }
    }

    fn description() -> &'static str {
        "Final winner is set exactly when the game is over and matches the scores"
    }
}

/// Invariant: the history agrees with the counters it summarizes.
///
/// Entries are in strictly increasing round order within the rounds played,
/// each side appears with a bomb at most once and only with its flag set, and
/// every user point is backed by a recorded user win (penalty rounds only
/// ever award the bot).
pub struct HistoryConsistentInvariant;

impl Invariant<GameState> for HistoryConsistentInvariant {
    fn holds(state: &GameState) -> bool {
        let history = &state.round_history;
        let played = state.rounds_played();

        if history.len() > usize::from(played) {
            return false;
        }

        let mut last_round = 0;
        for result in history {
            if result.round_number <= last_round || result.round_number > played {
                return false;
            }
            last_round = result.round_number;
        }

        for side in [Side::User, Side::Bot] {
            let bombs = history.iter().filter(|r| r.move_of(side).is_bomb()).count();
            if bombs > 1 || (bombs == 1 && !state.bomb_used(side)) {
                return false;
            }
        }

        let user_wins = history.iter().filter(|r| r.winner == Winner::User).count();
        let bot_wins = history.iter().filter(|r| r.winner == Winner::Bot).count();
        user_wins == usize::from(state.user_score) && bot_wins <= usize::from(state.bot_score)
    }

    fn description() -> &'static str {
        "History is ordered, within rounds played, and consistent with scores and bomb flags"
    }
}

/// All game state invariants as a composable set.
pub type GameStateInvariants = (
    RoundInRangeInvariant,
    ScoreBoundsInvariant,
    TerminationInvariant,
    HistoryConsistentInvariant,
);
