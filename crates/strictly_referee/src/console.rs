//! Line-oriented game loop.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::{info, instrument};

use crate::config::RefereeConfig;
use crate::observer::{HistoryObserver, LogLevel, ObserverSet, TracingObserver};
use crate::referee::Referee;
use crate::store::StateStore;

/// Plays one game over `input` and `output`.
///
/// The snapshot lives in `store` under the configured session ID between
/// rounds and is deleted when the loop ends. The loop ends on `quit`,
/// `exit`, end of input, or game over. In debug mode the recorded event
/// history is printed as JSON at the end.
#[instrument(skip_all, fields(session_id = %config.session_id(), debug = config.debug()))]
pub fn run_console(
    config: &RefereeConfig,
    store: &dyn StateStore,
    mut input: impl BufRead,
    mut output: impl Write,
) -> Result<()> {
    let debug = *config.debug();
    let session_id = config.session_id().as_str();

    let history = HistoryObserver::new(if debug { LogLevel::Debug } else { LogLevel::Info });
    let observers = ObserverSet::new()
        .with(TracingObserver)
        .with(history.clone());
    let mut referee = Referee::from_config(config).with_observer(observers);

    if debug {
        writeln!(output, "Running RPSB in DEBUG mode (verbose logging)")?;
    } else {
        writeln!(output, "Welcome to Rock-Paper-Scissors-Bomb game!")?;
    }
    writeln!(output)?;

    let (state, welcome) = referee.start_game();
    store.save(session_id, state);
    writeln!(output, "{}", welcome)?;
    writeln!(output)?;

    let mut line = String::new();
    loop {
        write!(output, "Your move: ")?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            info!("Input closed");
            break;
        }
        let text = line.trim();
        if matches!(text.to_lowercase().as_str(), "quit" | "exit") {
            info!("Player quit");
            break;
        }

        let state = store
            .load(session_id)
            .with_context(|| format!("Session '{}' disappeared from the store", session_id))?;
        let reply = referee.play_round(&state, text)?;
        let game_over = reply.state().game_over();
        let (next, message) = reply.into_parts();
        store.save(session_id, next);

        writeln!(output)?;
        writeln!(output, "{}", message)?;
        writeln!(output)?;

        if game_over {
            break;
        }
    }

    store.delete(session_id);
    writeln!(output, "Thanks for playing!")?;

    if debug {
        writeln!(output, "\n--- Log History ---")?;
        writeln!(output, "{}", history.to_json()?)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BotKind;
    use crate::store::InMemoryStore;

    fn play(config: &RefereeConfig, script: &str) -> (String, InMemoryStore) {
        let store = InMemoryStore::new();
        let mut output = Vec::new();
        run_console(config, &store, script.as_bytes(), &mut output).unwrap();
        (String::from_utf8(output).unwrap(), store)
    }

    #[test]
    fn test_quit_ends_loop_and_deletes_session() {
        let (output, store) = play(&RefereeConfig::default(), "QUIT\nrock\n");
        assert!(output.starts_with("Welcome to Rock-Paper-Scissors-Bomb game!\n\n🎮"));
        assert!(output.ends_with("Your move: Thanks for playing!\n"));
        assert!(store.list_sessions().is_empty());
    }

    #[test]
    fn test_game_runs_to_completion() {
        // Cycling bot plays rock, then paper.
        let config = RefereeConfig::default().with_bot(BotKind::Cycle);
        let (output, _) = play(&config, "paper\nscissors\nrock\n");

        assert!(output.contains("**Round 1**\nYou: 📄 PAPER\nBot: 🪨 ROCK"));
        assert!(output.contains("**Score:** You 2 - 0 Bot\n\n🎉 **YOU WON THE GAME!** 🎉"));
        assert_eq!(output.matches("Your move: ").count(), 2);
    }

    #[test]
    fn test_end_of_input_ends_loop() {
        let (output, store) = play(&RefereeConfig::default(), "");
        assert!(output.ends_with("Thanks for playing!\n"));
        assert!(store.load("demo_session").is_none());
    }

    #[test]
    fn test_debug_prints_history() {
        let config = RefereeConfig::default()
            .with_debug(true)
            .with_bot(BotKind::Cycle);
        let (output, _) = play(&config, "rock\nexit\n");

        assert!(output.starts_with("Running RPSB in DEBUG mode (verbose logging)"));
        let (_, history) = output.split_once("--- Log History ---\n").unwrap();
        let entries: serde_json::Value = serde_json::from_str(history).unwrap();
        assert!(
            entries
                .as_array()
                .unwrap()
                .iter()
                .any(|e| e["message"] == "Round 1 ended: draw wins")
        );
    }
}
