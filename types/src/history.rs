//! Append-only move history and its rendering to the engine's `position`
//! command grammar.
//!
//! The engine is only ever told "the game from the start plus this list";
//! it never receives a board snapshot. Callers append a token only after the
//! engine acknowledged the position it leads to.

use std::fmt;

use crate::notation::MoveToken;

const POSITION_PREFIX: &str = "position startpos";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveHistory {
    moves: Vec<MoveToken>,
}

impl MoveHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: MoveToken) {
        self.moves.push(token);
    }

    #[must_use]
    pub fn moves(&self) -> &[MoveToken] {
        &self.moves
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn last(&self) -> Option<&MoveToken> {
        self.moves.last()
    }

    /// Space-joined tokens, e.g. `"e2e4 e7e5"`.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// `position startpos moves …` for the recorded moves.
    #[must_use]
    pub fn position_command(&self) -> String {
        Self::position_for(self.moves.iter())
    }

    /// `position startpos moves …` for the recorded moves followed by
    /// `candidate`, without recording it.
    #[must_use]
    pub fn position_command_with(&self, candidate: &MoveToken) -> String {
        Self::position_for(self.moves.iter().chain(std::iter::once(candidate)))
    }

    fn position_for<'a>(mut moves: impl Iterator<Item = &'a MoveToken>) -> String {
        let Some(first) = moves.next() else {
            return POSITION_PREFIX.to_string();
        };
        let mut command = format!("{POSITION_PREFIX} moves {first}");
        for token in moves {
            command.push(' ');
            command.push_str(&token.to_string());
        }
        command
    }
}

impl fmt::Display for MoveHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, token) in self.moves.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{token}")?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a MoveHistory {
    type Item = &'a MoveToken;
    type IntoIter = std::slice::Iter<'a, MoveToken>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}
