//! Core domain types for rock-paper-scissors-bomb.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A canonical move.
///
/// Serialized as its lowercase name (`"rock"`, `"paper"`, `"scissors"`,
/// `"bomb"`), which is also the form accepted by [`std::str::FromStr`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Move {
    /// Beats scissors.
    Rock,
    /// Beats rock.
    Paper,
    /// Beats paper.
    Scissors,
    /// Beats every other move. One use per player per game.
    Bomb,
}

impl Move {
    /// Every canonical move, in the fixed order used for cycling selection.
    pub const ALL: [Move; 4] = [Move::Rock, Move::Paper, Move::Scissors, Move::Bomb];

    /// The moves that stay available after a player's bomb is spent.
    pub const BASE: [Move; 3] = [Move::Rock, Move::Paper, Move::Scissors];

    /// Returns the canonical lowercase token.
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Returns true for [`Move::Bomb`].
    pub fn is_bomb(self) -> bool {
        matches!(self, Move::Bomb)
    }

    /// Returns true if `self` strictly beats `other`.
    ///
    /// Total over all sixteen pairs: identical moves never beat each other,
    /// and bomb beats every non-bomb move.
    #[instrument]
    pub fn beats(self, other: Move) -> bool {
        match (self, other) {
            (Move::Bomb, Move::Bomb) => false,
            (Move::Bomb, _) => true,
            (_, Move::Bomb) => false,
            (Move::Rock, Move::Scissors) => true,
            (Move::Paper, Move::Rock) => true,
            (Move::Scissors, Move::Paper) => true,
            (Move::Rock, Move::Rock | Move::Paper)
            | (Move::Paper, Move::Paper | Move::Scissors)
            | (Move::Scissors, Move::Scissors | Move::Rock) => false,
        }
    }
}

/// One of the two players at the table.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    /// The human player typing free text.
    User,
    /// The automated opponent.
    Bot,
}

/// Result of a round or of a whole game.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Winner {
    /// The user won.
    User,
    /// The bot won.
    Bot,
    /// Nobody won.
    Draw,
}

impl Winner {
    /// Returns the winning side, or `None` for a draw.
    pub fn side(self) -> Option<Side> {
        match self {
            Winner::User => Some(Side::User),
            Winner::Bot => Some(Side::Bot),
            Winner::Draw => None,
        }
    }

    /// Decides a winner by comparing two scores.
    pub fn by_score(user_score: u8, bot_score: u8) -> Self {
        match user_score.cmp(&bot_score) {
            std::cmp::Ordering::Greater => Winner::User,
            std::cmp::Ordering::Less => Winner::Bot,
            std::cmp::Ordering::Equal => Winner::Draw,
        }
    }
}

impl From<Side> for Winner {
    fn from(side: Side) -> Self {
        match side {
            Side::User => Winner::User,
            Side::Bot => Winner::Bot,
        }
    }
}
