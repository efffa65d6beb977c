//! Malformed state errors.

use derive_more::{Display, Error};
use tracing::instrument;

use crate::invariants::InvariantViolation;

/// A game state snapshot that breaks the model's contract.
///
/// Raised when a snapshot is missing fields, carries out-of-range values, or
/// violates a state invariant. Ordinary game outcomes never produce this.
#[derive(Debug, Clone, Display, Error)]
#[display("Malformed game state: {} at {}:{}", message, file, line)]
pub struct StateError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl StateError {
    /// Creates a new state error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Builds an error listing every violated invariant.
    #[track_caller]
    pub fn from_violations(violations: &[InvariantViolation]) -> Self {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        Self::new(descriptions)
    }
}

impl From<serde_json::Error> for StateError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(format!("JSON error: {}", err))
    }
}
