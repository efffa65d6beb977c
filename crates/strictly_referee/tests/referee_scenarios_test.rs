//! End-to-end rounds through the referee with a scripted bot.

use serde_json::json;
use strictly_referee::{
    GameState, HistoryObserver, LogLevel, Move, PenaltyHistory, Referee, RoundOutcome,
    ScriptedBot, ToolError, Winner,
};

fn referee(bot_moves: impl IntoIterator<Item = Move>) -> Referee {
    Referee::new(Box::new(ScriptedBot::new(bot_moves)), PenaltyHistory::Skip)
}

/// Plays each input in turn and returns the final state.
fn play_all(referee: &mut Referee, inputs: &[&str]) -> GameState {
    inputs.iter().fold(GameState::new(), |state, input| {
        referee
            .play_round(&state, input)
            .expect("well-formed state")
            .into_parts()
            .0
    })
}

#[test]
fn test_straight_win() {
    let mut referee = referee([Move::Scissors, Move::Rock]);

    let first = referee.play_round(&GameState::new(), "stone").unwrap();
    assert_eq!(
        first.outcome(),
        &RoundOutcome::Resolved {
            user_move: Move::Rock,
            bot_move: Move::Scissors,
            winner: Winner::User,
        }
    );
    assert_eq!(first.state().current_round(), 2);

    let second = referee.play_round(first.state(), "paper").unwrap();
    let state = second.state();
    assert_eq!((state.user_score(), state.bot_score()), (2, 0));
    assert!(state.game_over());
    assert_eq!(state.final_winner(), Some(Winner::User));
    assert_eq!(state.round_history().len(), 2);
    assert!(second.message().starts_with("**Round 2**\nYou: 📄 PAPER\nBot: 🪨 ROCK"));
    assert!(second.message().ends_with("🎉 **YOU WON THE GAME!** 🎉"));
}

#[test]
fn test_bomb_clash_spends_both_bombs() {
    let mut referee = referee([Move::Bomb, Move::Rock]);

    let clash = referee.play_round(&GameState::new(), "boom").unwrap();
    let state = clash.state();
    assert_eq!(
        clash.outcome(),
        &RoundOutcome::Resolved {
            user_move: Move::Bomb,
            bot_move: Move::Bomb,
            winner: Winner::Draw,
        }
    );
    assert!(state.user_bomb_used());
    assert!(state.bot_bomb_used());
    assert_eq!((state.user_score(), state.bot_score()), (0, 0));
    assert_eq!(state.current_round(), 2);
    assert!(clash.message().contains("→ Both played bomb. It's a draw."));

    let again = referee.play_round(state, "bomb").unwrap();
    assert_eq!(
        again.outcome(),
        &RoundOutcome::Penalty {
            reason: "Bomb already used. You can only use bomb once per game.".to_string(),
            bot_move: Move::Rock,
        }
    );
    assert_eq!(again.state().bot_score(), 1);
}

#[test]
fn test_invalid_move_penalty() {
    let mut referee = referee([Move::Paper]);
    let reply = referee.play_round(&GameState::new(), "xyz").unwrap();

    assert!(matches!(reply.outcome(), RoundOutcome::Penalty { .. }));
    assert_eq!(reply.state().bot_score(), 1);
    assert_eq!(reply.state().user_score(), 0);
    assert_eq!(reply.state().current_round(), 2);
    assert!(reply.state().round_history().is_empty());
    assert!(
        reply
            .message()
            .contains("Bot played 📄 PAPER and wins this round.")
    );
}

#[test]
fn test_penalty_recorded_when_configured() {
    let mut referee = Referee::new(
        Box::new(ScriptedBot::new([Move::Bomb])),
        PenaltyHistory::Record,
    );
    let reply = referee.play_round(&GameState::new(), "xyz").unwrap();
    let history = reply.state().round_history();

    assert_eq!(history.len(), 1);
    assert_eq!(history[0].user_move, Move::Rock);
    assert_eq!(history[0].bot_move, Move::Bomb);
    assert_eq!(history[0].winner, Winner::Bot);
    assert!(reply.state().bot_bomb_used());
    assert!(!reply.state().user_bomb_used());
}

#[test]
fn test_tie_at_round_three() {
    let mut referee = referee([Move::Scissors, Move::Paper, Move::Rock]);
    let state = play_all(&mut referee, &["rock", "rock", "rock"]);

    assert!(state.game_over());
    assert_eq!(state.final_winner(), Some(Winner::Draw));
    assert_eq!((state.user_score(), state.bot_score()), (1, 1));
    assert_eq!(state.current_round(), 3);
}

#[test]
fn test_tie_message() {
    let mut referee = referee([Move::Scissors, Move::Paper, Move::Rock]);
    let state = play_all(&mut referee, &["rock", "rock"]);
    let last = referee.play_round(&state, "rock").unwrap();
    assert!(last.message().ends_with("🤝 **It's a tie!** Well played."));
}

#[test]
fn test_two_penalties_end_game() {
    let mut referee = referee([Move::Rock, Move::Rock]);
    let state = play_all(&mut referee, &["xyz", "hmm"]);

    assert!(state.game_over());
    assert_eq!(state.final_winner(), Some(Winner::Bot));
    assert_eq!(state.current_round(), 2);
}

#[test]
fn test_rules_request_leaves_state_unchanged() {
    let history = HistoryObserver::new(LogLevel::Debug);
    let mut referee = referee([Move::Rock]).with_observer(history.clone());
    let state = play_all(&mut referee, &["paper"]);

    history.clear();
    let reply = referee.play_round(&state, "what are the rules?").unwrap();

    assert_eq!(reply.outcome(), &RoundOutcome::Rules);
    assert_eq!(reply.state(), &state);
    assert!(
        history
            .entries()
            .iter()
            .all(|entry| !entry.message.starts_with("Calling"))
    );
}

#[test]
fn test_finished_game_is_frozen() {
    let mut referee = referee([Move::Scissors, Move::Scissors]);
    let state = play_all(&mut referee, &["rock", "rock"]);
    assert!(state.game_over());

    for input in ["paper", "bomb", "xyz", "rules"] {
        let reply = referee.play_round(&state, input).unwrap();
        assert_eq!(reply.outcome(), &RoundOutcome::AlreadyOver);
        assert_eq!(reply.state(), &state);
        assert_eq!(reply.message(), "🎉 **YOU WON THE GAME!** 🎉");
    }
}

#[test]
fn test_malformed_state_is_rejected() {
    let snapshot = json!({ "current_round": 2, "user_score": 2, "bot_score": 1 });
    assert!(serde_json::from_value::<GameState>(snapshot.clone()).is_err());

    let history = HistoryObserver::default();
    let referee = referee([]).with_observer(history.clone());

    let err = referee
        .dispatch(
            "validate_move",
            json!({ "move": "rock", "player": "user", "game_state": snapshot }),
        )
        .unwrap_err();
    assert!(matches!(err, ToolError::State(_)));
    assert!(
        history
            .entries()
            .iter()
            .any(|entry| entry.level == LogLevel::Error)
    );
}

#[test]
fn test_round_header_follows_wasted_round() {
    let mut referee = referee([Move::Rock, Move::Scissors]);

    let penalty = referee.play_round(&GameState::new(), "xyz").unwrap();
    assert!(matches!(penalty.outcome(), RoundOutcome::Penalty { .. }));
    assert!(penalty.state().round_history().is_empty());

    let resolved = referee.play_round(penalty.state(), "rock").unwrap();
    assert!(matches!(resolved.outcome(), RoundOutcome::Resolved { .. }));
    assert!(resolved.message().starts_with("**Round 2**\nYou: 🪨 ROCK\nBot: ✂️ SCISSORS"));
}

#[test]
fn test_bot_never_bombs_twice() {
    let mut referee = referee([Move::Bomb, Move::Bomb, Move::Bomb]);
    let state = play_all(&mut referee, &["rock", "paper", "scissors"]);

    let bot_bombs = state
        .round_history()
        .iter()
        .filter(|round| round.bot_move == Move::Bomb)
        .count();
    assert_eq!(bot_bombs, 1);
}
