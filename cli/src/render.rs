//! Plain-text board and event rendering for the terminal.

use std::fmt::Write;

use gambit_core::{GameState, ResultEntry};
use gambit_types::{Board, GameEvent, MoveKind, Side, Square};

/// The board as text, drawn from `perspective`'s side of the table.
///
/// White pieces are upper case, Black lower case, empty squares `.`.
pub fn board(board: &Board, perspective: Side) -> String {
    let ranks: Vec<u8> = match perspective {
        Side::White => (0..8).rev().collect(),
        Side::Black => (0..8).collect(),
    };
    let files: Vec<u8> = match perspective {
        Side::White => (0..8).collect(),
        Side::Black => (0..8).rev().collect(),
    };

    let mut out = String::new();
    out.push_str("  +-----------------+\n");
    for &rank in &ranks {
        let _ = write!(out, "{} |", rank + 1);
        for &file in &files {
            let cell = Square::new(file, rank)
                .and_then(|sq| board.piece_at(sq))
                .map_or('.', |piece| piece.letter());
            let _ = write!(out, " {cell}");
        }
        out.push_str(" |\n");
    }
    out.push_str("  +-----------------+\n   ");
    for &file in &files {
        let _ = write!(out, " {}", char::from(b'a' + file));
    }
    out.push('\n');
    out
}

pub fn event(event: &GameEvent) -> String {
    match event {
        GameEvent::Move(mv) => {
            let note = match mv.kind() {
                MoveKind::Plain => "",
                MoveKind::Capture => " (capture)",
                MoveKind::Castle => " (castle)",
                MoveKind::Promotion => " (promotion)",
            };
            format!("{} plays {}{note}", mv.side(), mv.token())
        }
        GameEvent::GameOver(outcome) => format!("Game over: {outcome}"),
    }
}

/// One-line prompt describing what the game is waiting for.
pub fn prompt(state: GameState, human: Side) -> String {
    match state {
        GameState::ToMove(side) if side == human => format!("{side} to move"),
        GameState::ToMove(side) => format!("{side} (engine) to move; type `go` to retry"),
        GameState::AwaitingPromotionChoice { square, .. } => {
            format!("Promote on {square}: q, r, b or n")
        }
        GameState::Terminal(outcome) => format!("{outcome}. Type `restart` or `quit`"),
    }
}

pub fn results(entries: &[ResultEntry]) -> String {
    if entries.is_empty() {
        return "No games recorded yet.\n".to_string();
    }
    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{}. {}", entry.number(), entry.outcome());
    }
    out
}
