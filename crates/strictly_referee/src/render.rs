//! Player-facing text, rendered from tool outputs only.

use strictly_rps::{GameState, Move, Resolution, Winner};

/// Welcome and rules message.
pub const RULES_TEXT: &str = "🎮 **Rock-Paper-Scissors-Bomb** (Best of 3)

• Rock beats Scissors, Scissors beats Paper, Paper beats Rock
• 💣 Bomb beats everything (Only one-time use per player)
• Bomb vs Bomb = Draw
• Invalid moves waste your turn
• Type \"quit\" or \"exit\" to end the game

Ready? Type your move: rock, paper, scissors or bomb";

/// Emoji shown next to a move.
pub fn emoji(mv: Move) -> &'static str {
    match mv {
        Move::Rock => "🪨",
        Move::Paper => "📄",
        Move::Scissors => "✂️",
        Move::Bomb => "💣",
    }
}

fn label(mv: Move) -> String {
    format!("{} {}", emoji(mv), mv.as_str().to_uppercase())
}

/// Final line announcing the game's winner.
pub fn render_game_over(winner: Option<Winner>) -> &'static str {
    match winner {
        Some(Winner::User) => "🎉 **YOU WON THE GAME!** 🎉",
        Some(Winner::Bot) => "🤖 Bot wins the game. Better luck next time!",
        Some(Winner::Draw) | None => "🤝 **It's a tie!** Well played.",
    }
}

/// Score line followed by either the game-over line or the next prompt.
fn push_trailer(lines: &mut Vec<String>, state: &GameState) {
    lines.push(format!(
        "**Score:** You {} - {} Bot",
        state.user_score(),
        state.bot_score()
    ));
    if state.game_over() {
        lines.push(String::new());
        lines.push(render_game_over(state.final_winner()).to_string());
    } else {
        lines.push(format!("\n*Round {} ready. Your move?*", state.current_round()));
    }
}

/// Message for a normally resolved round. `state` is the updated snapshot.
pub fn render_round(
    user_move: Move,
    bot_move: Move,
    resolution: &Resolution,
    state: &GameState,
) -> String {
    let round = state
        .round_history()
        .last()
        .map_or_else(|| state.rounds_played(), |result| result.round_number);
    let mut lines = vec![
        format!("**Round {}**", round),
        format!("You: {}", label(user_move)),
        format!("Bot: {}", label(bot_move)),
        format!("→ {}", resolution.explanation),
        String::new(),
    ];
    push_trailer(&mut lines, state);
    lines.join("\n")
}

/// Message for a wasted round. `state` is the updated snapshot.
pub fn render_invalid(reason: &str, bot_move: Move, state: &GameState) -> String {
    let mut lines = vec![
        format!("❌ **Invalid Move!** {}", reason),
        format!("Bot played {} and wins this round.", label(bot_move)),
        String::new(),
    ];
    push_trailer(&mut lines, state);
    lines.join("\n")
}
