//! Dictionary-based move intent parsing.
//!
//! Maps free text to a canonical move with a fixed synonym table. Matching is
//! exact first, then by substring in table order. Single-letter shortcuts
//! (`r`, `p`, `s`, `b`) also take part in the substring pass, so they can fire
//! inside unrelated words ("xs" reads as scissors). That is a known limitation
//! of the matcher and is kept deliberately.

use tracing::{debug, instrument};

use crate::types::Move;

/// Synonym table. Order is significant for the substring pass.
pub const MOVE_SYNONYMS: &[(&str, Move)] = &[
    ("rock", Move::Rock),
    ("stone", Move::Rock),
    ("boulder", Move::Rock),
    ("fist", Move::Rock),
    ("r", Move::Rock),
    ("\u{1FAA8}", Move::Rock),
    ("paper", Move::Paper),
    ("sheet", Move::Paper),
    ("page", Move::Paper),
    ("wrap", Move::Paper),
    ("p", Move::Paper),
    ("\u{1F4C4}", Move::Paper),
    ("\u{1F4C3}", Move::Paper),
    ("scissors", Move::Scissors),
    ("scissor", Move::Scissors),
    ("cut", Move::Scissors),
    ("snip", Move::Scissors),
    ("s", Move::Scissors),
    ("\u{2702}\u{FE0F}", Move::Scissors),
    ("\u{2702}", Move::Scissors),
    ("bomb", Move::Bomb),
    ("boom", Move::Bomb),
    ("explode", Move::Bomb),
    ("blast", Move::Bomb),
    ("nuke", Move::Bomb),
    ("b", Move::Bomb),
    ("\u{1F4A3}", Move::Bomb),
    ("\u{1F9E8}", Move::Bomb),
];

/// Leading filler phrases. Only the first match in this order is stripped.
pub const FILLERS: &[&str] = &[
    "i pick ",
    "i choose ",
    "i go with ",
    "i'll go with ",
    "my move is ",
    "let's go ",
    "going with ",
    "i say ",
    "i want ",
    "give me ",
    "let's do ",
    "i play ",
];

/// Keywords that mark a rules or help request.
pub const RULES_KEYWORDS: &[&str] = &["rules", "help", "how", "what", "explain", "?"];

const TRAILING_PUNCTUATION: &[char] = &['!', '.', ',', '?'];

/// What a line of user text asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The text names a canonical move.
    Move(Move),
    /// The text is a move attempt nobody can read.
    Unknown,
    /// The text asks for the rules; no round should be played.
    Rules,
}

impl Intent {
    /// Token handed to the move validator: the canonical move name, or
    /// `"unknown"` for an unreadable attempt and `"none"` for a rules request.
    pub fn candidate(self) -> &'static str {
        match self {
            Intent::Move(mv) => mv.as_str(),
            Intent::Unknown => "unknown",
            Intent::Rules => "none",
        }
    }
}

/// Lowercases, trims, strips one leading filler and trailing punctuation.
#[instrument]
pub fn normalize_input(text: &str) -> String {
    let mut normalized = text.to_lowercase().trim().to_string();

    if let Some(rest) = FILLERS
        .iter()
        .find_map(|filler| normalized.strip_prefix(filler))
    {
        normalized = rest.trim().to_string();
    }

    normalized
        .trim_end_matches(TRAILING_PUNCTUATION)
        .to_string()
}

/// Extracts a canonical move, or `None` when nothing in the table matches.
#[instrument]
pub fn extract_move(text: &str) -> Option<Move> {
    let normalized = normalize_input(text);

    if let Some(&(_, mv)) = MOVE_SYNONYMS.iter().find(|(key, _)| *key == normalized) {
        debug!(%normalized, %mv, "Exact synonym match");
        return Some(mv);
    }

    let found = MOVE_SYNONYMS
        .iter()
        .find(|(key, _)| normalized.contains(key))
        .map(|&(_, mv)| mv);
    debug!(%normalized, ?found, "Substring synonym match");
    found
}

/// Returns true if the text reads as a request for the rules.
#[instrument]
pub fn is_rules_request(text: &str) -> bool {
    let normalized = normalize_input(text);
    RULES_KEYWORDS.iter().any(|kw| normalized.contains(kw))
}

/// Classifies user text. Rules requests win over move extraction.
#[instrument]
pub fn parse_intent(text: &str) -> Intent {
    if is_rules_request(text) {
        return Intent::Rules;
    }
    extract_move(text).map_or(Intent::Unknown, Intent::Move)
}
