//! Strictly Referee - a turn-based referee for rock-paper-scissors-bomb
//!
//! Plays best-of-three games between a user typing free text and a bot,
//! built on the pure game logic in `strictly_rps`.
//!
//! # Architecture
//!
//! - **Referee**: orchestrates one round at a time from a state snapshot
//! - **Tools**: `validate_move`, `resolve_round` and `update_game_state`,
//!   dispatched by name with JSON arguments and schemas
//! - **Observer**: receives tool calls, parsed intents and round milestones
//! - **Store**: keeps snapshots between rounds, keyed by session
//! - **Console**: line-oriented game loop for the terminal
//!
//! # Example
//!
//! ```
//! use strictly_referee::{PenaltyHistory, Referee, ScriptedBot, Move};
//!
//! let mut referee = Referee::new(
//!     Box::new(ScriptedBot::new([Move::Scissors])),
//!     PenaltyHistory::Skip,
//! );
//! let (state, _rules) = referee.start_game();
//! let reply = referee.play_round(&state, "rock").unwrap();
//! assert_eq!(reply.state().user_score(), 1);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod console;
mod observer;
mod referee;
mod render;
mod store;
mod tools;

pub mod cli;

// Crate-level exports - Configuration
pub use config::{BotKind, ConfigError, RefereeConfig};

// Crate-level exports - Console loop
pub use console::run_console;

// Crate-level exports - Observers
pub use observer::{
    GameObserver, HistoryObserver, LogCategory, LogEntry, LogLevel, NoopObserver, ObserverSet,
    TracingObserver,
};

// Crate-level exports - Orchestration
pub use referee::{Referee, RoundOutcome, RoundReply};

// Crate-level exports - Rendering
pub use render::{RULES_TEXT, emoji, render_game_over, render_invalid, render_round};

// Crate-level exports - State storage
pub use store::{InMemoryStore, SessionId, StateStore};

// Crate-level exports - Tools
pub use tools::{
    ResolveRoundRequest, ToolBox, ToolError, ToolName, ToolSchema, UpdateGameStateOutput,
    UpdateGameStateRequest, UpdatePath, ValidateMoveOutput, ValidateMoveRequest, tool_schemas,
};

// Crate-level exports - Game types
pub use strictly_rps::{
    BotMoveSelector, CyclingBot, GameState, Intent, Move, PenaltyHistory, RandomBot, Resolution,
    RoundResult, ScriptedBot, Side, StateError, Winner,
};
