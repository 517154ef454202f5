//! Game outcomes and the classified events a presentation layer reacts to.

use std::fmt;

use crate::notation::MoveToken;
use crate::piece::Side;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    WhiteWins,
    BlackWins,
    Draw,
}

impl Outcome {
    #[must_use]
    pub const fn win_for(side: Side) -> Self {
        match side {
            Side::White => Outcome::WhiteWins,
            Side::Black => Outcome::BlackWins,
        }
    }

    #[must_use]
    pub const fn winner(self) -> Option<Side> {
        match self {
            Outcome::WhiteWins => Some(Side::White),
            Outcome::BlackWins => Some(Side::Black),
            Outcome::Draw => None,
        }
    }

    /// Label written to the result log.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Outcome::WhiteWins => "White wins",
            Outcome::BlackWins => "Black wins",
            Outcome::Draw => "Draw",
        }
    }

    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            "White wins" => Some(Outcome::WhiteWins),
            "Black wins" => Some(Outcome::BlackWins),
            "Draw" => Some(Outcome::Draw),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classification of a committed move, one per move.
///
/// Precedence when several apply: promotion, castle, capture, plain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Plain,
    Capture,
    Castle,
    Promotion,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveEvent {
    side: Side,
    token: MoveToken,
    kind: MoveKind,
}

impl MoveEvent {
    #[must_use]
    pub const fn new(side: Side, token: MoveToken, kind: MoveKind) -> Self {
        Self { side, token, kind }
    }

    #[must_use]
    pub const fn side(self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn token(self) -> MoveToken {
        self.token
    }

    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Move(MoveEvent),
    GameOver(Outcome),
}
