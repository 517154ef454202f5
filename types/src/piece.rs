//! Sides, piece kinds and the signed piece-code mapping.
//!
//! A square holds a signed code: the sign is the side (positive = White,
//! negative = Black), the magnitude is the kind. `0` is an empty square.
//! This mapping is the only one in the workspace; promotion uses it too.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    White,
    Black,
}

impl Side {
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Side::White => Side::Black,
            Side::Black => Side::White,
        }
    }

    /// Sign carried by this side's piece codes.
    #[must_use]
    pub const fn sign(self) -> i8 {
        match self {
            Side::White => 1,
            Side::Black => -1,
        }
    }

    /// Rank a pawn of this side promotes on.
    #[must_use]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Side::White => 7,
            Side::Black => 0,
        }
    }

    /// Rank direction a pawn of this side advances in.
    #[must_use]
    pub const fn pawn_step(self) -> i8 {
        self.sign()
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Side::White => "White",
            Side::Black => "Black",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn = 1,
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    Queen = 5,
    King = 6,
}

impl PieceKind {
    /// Kinds a pawn may promote to, strongest first.
    pub const PROMOTION_CHOICES: [PieceKind; 4] = [
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
    ];

    #[must_use]
    pub const fn magnitude(self) -> i8 {
        self as i8
    }

    #[must_use]
    pub const fn from_magnitude(value: i8) -> Option<Self> {
        match value {
            1 => Some(Self::Pawn),
            2 => Some(Self::Knight),
            3 => Some(Self::Bishop),
            4 => Some(Self::Rook),
            5 => Some(Self::Queen),
            6 => Some(Self::King),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_promotion_choice(self) -> bool {
        matches!(
            self,
            PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen
        )
    }

    /// Fifth character of a promotion move token, `None` for pawn and king.
    #[must_use]
    pub const fn promotion_char(self) -> Option<char> {
        match self {
            PieceKind::Knight => Some('n'),
            PieceKind::Bishop => Some('b'),
            PieceKind::Rook => Some('r'),
            PieceKind::Queen => Some('q'),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    /// Inverse of [`PieceKind::promotion_char`]; accepts either case.
    #[must_use]
    pub const fn from_promotion_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            _ => None,
        }
    }

    /// Upper-case letter used in text renderings of the board.
    #[must_use]
    pub const fn letter(self) -> char {
        match self {
            PieceKind::Pawn => 'P',
            PieceKind::Knight => 'N',
            PieceKind::Bishop => 'B',
            PieceKind::Rook => 'R',
            PieceKind::Queen => 'Q',
            PieceKind::King => 'K',
        }
    }
}

/// A coloured piece, the decoded form of a non-zero piece code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    side: Side,
    kind: PieceKind,
}

impl Piece {
    #[must_use]
    pub const fn new(side: Side, kind: PieceKind) -> Self {
        Self { side, kind }
    }

    #[must_use]
    pub const fn side(self) -> Side {
        self.side
    }

    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub const fn code(self) -> i8 {
        self.side.sign() * self.kind.magnitude()
    }

    /// Decode a signed piece code. `0` and out-of-range magnitudes are `None`.
    #[must_use]
    pub const fn from_code(code: i8) -> Option<Self> {
        let side = if code > 0 { Side::White } else { Side::Black };
        match PieceKind::from_magnitude(code.saturating_abs()) {
            Some(kind) => Some(Self { side, kind }),
            None => None,
        }
    }

    /// Same side, different kind. Used when a pawn is promoted.
    #[must_use]
    pub const fn promoted_to(self, kind: PieceKind) -> Self {
        Self {
            side: self.side,
            kind,
        }
    }

    /// Letter for text renderings: upper case for White, lower case for Black.
    #[must_use]
    pub const fn letter(self) -> char {
        let upper = self.kind.letter();
        match self.side {
            Side::White => upper,
            Side::Black => upper.to_ascii_lowercase(),
        }
    }
}
