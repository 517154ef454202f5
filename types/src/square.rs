//! Board coordinates and their coordinate-notation spelling.

use std::fmt;

use crate::notation::NotationError;

/// Whether raw signed coordinates fall on the board.
///
/// UI layers compute coordinates from pointer positions and may land anywhere,
/// so this takes signed values rather than a [`Square`].
#[must_use]
pub const fn is_valid_coordinate(file: i32, rank: i32) -> bool {
    file >= 0 && file < 8 && rank >= 0 && rank < 8
}

/// A square on the 8×8 board.
///
/// `file` 0 is the a-file, `rank` 0 is the first rank (White's back rank).
/// Construction validates the range; a `Square` is always on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    #[must_use]
    pub const fn new(file: u8, rank: u8) -> Option<Self> {
        if file < 8 && rank < 8 {
            Some(Self { file, rank })
        } else {
            None
        }
    }

    /// Build a square from raw signed coordinates, `None` when off the board.
    #[must_use]
    pub fn from_coords(file: i32, rank: i32) -> Option<Self> {
        if is_valid_coordinate(file, rank) {
            Self::new(file as u8, rank as u8)
        } else {
            None
        }
    }

    #[must_use]
    pub const fn file(self) -> u8 {
        self.file
    }

    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    /// Same rank, different file. `None` if that file is off the board.
    #[must_use]
    pub const fn with_file(self, file: u8) -> Option<Self> {
        Self::new(file, self.rank)
    }

    /// Same file, different rank. `None` if that rank is off the board.
    #[must_use]
    pub const fn with_rank(self, rank: u8) -> Option<Self> {
        Self::new(self.file, rank)
    }

    #[must_use]
    pub const fn file_char(self) -> char {
        (b'a' + self.file) as char
    }

    #[must_use]
    pub const fn rank_char(self) -> char {
        (b'1' + self.rank) as char
    }

    /// Parse a square from its two notation characters (`'e'`, `'4'`).
    pub fn from_chars(file: char, rank: char) -> Result<Self, NotationError> {
        let file_idx = match file {
            'a'..='h' => file as u8 - b'a',
            other => return Err(NotationError::InvalidFile(other)),
        };
        let rank_idx = match rank {
            '1'..='8' => rank as u8 - b'1',
            other => return Err(NotationError::InvalidRank(other)),
        };
        Ok(Self {
            file: file_idx,
            rank: rank_idx,
        })
    }

    /// All 64 squares, rank by rank starting at a1.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..8u8).flat_map(|rank| (0..8u8).map(move |file| Square { file, rank }))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl std::str::FromStr for Square {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::from_chars(file, rank),
            _ => Err(NotationError::Length(s.chars().count())),
        }
    }
}
