//! Plain-text rendering of a game snapshot for terminal hosts.
//!
//! One line per row, goal at the top. Token lanes on the left, the row's
//! action tile on the right (`[?]` face-down, `[♠]` fired, `*` marks a
//! tile that can be activated).

use std::fmt::Write;

use crate::core::{ActionTile, Face, GameState, ProceedingCard, Suit, TurnRecord};

// ANSI codes
pub const RED: &str = "\x1b[91m";
pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";

/// A suit symbol, red for hearts and diamonds when `color` is set.
pub fn suit_glyph(suit: Suit, color: bool) -> String {
    if color && suit.is_red() {
        format!("{RED}{}{RESET}", suit.symbol())
    } else {
        suit.symbol().to_string()
    }
}

fn tile_cell(tile: &ActionTile, color: bool) -> String {
    let face = match (tile.face, tile.suit) {
        (Face::FaceUp, Some(suit)) => suit_glyph(suit, color),
        _ => "?".to_string(),
    };
    let mark = if tile.clickable { "*" } else { "" };
    format!("[{face}]{mark}")
}

fn proceeding_cell(card: &ProceedingCard, color: bool) -> String {
    match (card.face, card.suit) {
        (Face::FaceUp, Some(suit)) => format!("[{}]", suit_glyph(suit, color)),
        _ => "[ ]".to_string(),
    }
}

/// Render the whole board.
pub fn render_board(state: &GameState, color: bool) -> String {
    let mut out = String::new();

    for row in state.goal_row()..=state.start_row() {
        let _ = write!(out, "R{row:<2} |");
        for token in state.tokens().values() {
            let cell = if token.row() == row {
                suit_glyph(token.suit, color)
            } else {
                ".".to_string()
            };
            let _ = write!(out, " {cell} ");
        }
        out.push('|');

        if let Some(tile) = state.tile(row) {
            let _ = write!(out, " {}", tile_cell(tile, color));
        } else if row == state.goal_row() {
            out.push_str(" GOAL");
        } else if row == state.start_row() {
            out.push_str(" START");
        }
        out.push('\n');
    }

    let _ = write!(
        out,
        "Draw {}  turn {}",
        proceeding_cell(state.proceeding_card(), color),
        state.turn()
    );
    if let Some(winner) = state.winner() {
        let (bold, reset) = if color { (BOLD, RESET) } else { ("", "") };
        let _ = write!(out, "  {bold}winner: {winner}{reset}");
    }
    out.push('\n');

    out
}

/// Describe a log entry in one line.
pub fn describe_record(record: &TurnRecord) -> String {
    let mut line = format!("#{} {}", record.turn, record.intent);
    if let Some(suit) = record.drawn {
        let _ = write!(line, ": drew {suit}");
    }
    if let Some((row, suit)) = record.penalty {
        let _ = write!(line, ", row {row} sent {suit} back");
    }
    line
}
