//! Coordinate-notation move tokens, the wire vocabulary shared by the board
//! model, the move history and the engine protocol.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::piece::PieceKind;
use crate::square::Square;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("expected 4 or 5 characters, got {0}")]
    Length(usize),
    #[error("invalid file '{0}'")]
    InvalidFile(char),
    #[error("invalid rank '{0}'")]
    InvalidRank(char),
    #[error("invalid promotion piece '{0}'")]
    InvalidPromotion(char),
    #[error("move does not change square")]
    NullMove,
}

/// `<from><to>[promotion]`, e.g. `e2e4` or `e7e8q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveToken {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl MoveToken {
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Attach a promotion kind. Kinds that cannot be promoted to are ignored.
    #[must_use]
    pub const fn with_promotion(mut self, kind: PieceKind) -> Self {
        if kind.is_promotion_choice() {
            self.promotion = Some(kind);
        }
        self
    }

    #[must_use]
    pub const fn from(self) -> Square {
        self.from
    }

    #[must_use]
    pub const fn to(self) -> Square {
        self.to
    }

    #[must_use]
    pub const fn promotion(self) -> Option<PieceKind> {
        self.promotion
    }
}

impl fmt::Display for MoveToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(c) = self.promotion.and_then(PieceKind::promotion_char) {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl FromStr for MoveToken {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.trim().chars().collect();
        if !(4..=5).contains(&chars.len()) {
            return Err(NotationError::Length(chars.len()));
        }
        let from = Square::from_chars(chars[0], chars[1])?;
        let to = Square::from_chars(chars[2], chars[3])?;
        if from == to {
            return Err(NotationError::NullMove);
        }
        let mut token = Self::new(from, to);
        if let Some(&c) = chars.get(4) {
            let kind = PieceKind::from_promotion_char(c).ok_or(NotationError::InvalidPromotion(c))?;
            token = token.with_promotion(kind);
        }
        Ok(token)
    }
}
