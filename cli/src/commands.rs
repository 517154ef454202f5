//! Input line parsing for the terminal front end.

use gambit_types::{MoveToken, NotationError, PieceKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// A move in coordinate notation; a fifth letter completes a promotion.
    Move(MoveToken),
    /// `q`, `r`, `b` or `n` while a promotion is pending.
    Promote(PieceKind),
    /// Retry a stalled engine turn.
    Go,
    Restart,
    History,
    Board,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub const HELP: &str = "\
Commands:
  e2e4     move a piece (coordinate notation; e7e8q promotes directly)
  q r b n  choose the promotion piece when asked
  go       ask the engine to retry its move
  board    show the board
  history  list finished games
  restart  start a new game
  help     show this help
  quit     leave";

impl Command {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        match input.to_ascii_lowercase().as_str() {
            "" => return Command::Empty,
            "go" => return Command::Go,
            "restart" | "new" => return Command::Restart,
            "history" => return Command::History,
            "board" => return Command::Board,
            "help" | "?" => return Command::Help,
            "quit" | "exit" => return Command::Quit,
            _ => {}
        }

        let mut chars = input.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return PieceKind::from_promotion_char(c).map_or_else(
                || Command::Invalid(format!("unknown command `{input}`")),
                Command::Promote,
            );
        }

        match input.parse::<MoveToken>() {
            Ok(token) => Command::Move(token),
            Err(NotationError::Length(_)) => {
                Command::Invalid(format!("unknown command `{input}`; type `help`"))
            }
            Err(e) => Command::Invalid(format!("`{input}`: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keywords() {
        assert_eq!(Command::parse("  quit "), Command::Quit);
        assert_eq!(Command::parse("RESTART"), Command::Restart);
        assert_eq!(Command::parse("go"), Command::Go);
        assert_eq!(Command::parse(""), Command::Empty);
    }

    #[test]
    fn parses_moves() {
        assert_eq!(
            Command::parse("e2e4"),
            Command::Move("e2e4".parse().unwrap())
        );
        let Command::Move(token) = Command::parse("e7e8Q") else {
            panic!("expected a move");
        };
        assert_eq!(token.promotion(), Some(PieceKind::Queen));
    }

    #[test]
    fn parses_promotion_letters() {
        assert_eq!(Command::parse("n"), Command::Promote(PieceKind::Knight));
        assert_eq!(Command::parse("Q"), Command::Promote(PieceKind::Queen));
        assert!(matches!(Command::parse("k"), Command::Invalid(_)));
    }

    #[test]
    fn rejects_bad_notation() {
        assert!(matches!(Command::parse("e9e4"), Command::Invalid(m) if m.contains("e9e4")));
        assert!(matches!(Command::parse("castle"), Command::Invalid(_)));
    }
}
