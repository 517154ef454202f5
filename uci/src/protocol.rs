//! UCI vocabulary: outbound command lines, completion sentinels and the
//! substring classification of engine responses.
//!
//! Responses are matched by substring only. Nothing here claims protocol
//! conformance beyond recognising the handful of tokens the game needs.

use std::fmt;

pub const UCI: &str = "uci";
pub const IS_READY: &str = "isready";
pub const UCI_NEW_GAME: &str = "ucinewgame";
pub const STOP: &str = "stop";
pub const QUIT: &str = "quit";

const READY_OK: &str = "readyok";
const BEST_MOVE: &str = "bestmove";
const BEST_MOVE_PREFIX: &str = "bestmove ";
const NO_MOVE: &str = "(none)";
const MATE_ZERO: &str = "mate 0";
const STALEMATE: &str = "stalemate";
const ID_NAME: &str = "id name ";

/// `go depth <n>`
#[must_use]
pub fn go_depth(depth: u32) -> String {
    format!("go depth {depth}")
}

/// `setoption name <name> value <value>`
#[must_use]
pub fn set_option(name: &str, value: &str) -> String {
    format!("setoption name {name} value {value}")
}

/// A substring in engine output that marks a pending request as complete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// `readyok`, answer to `isready`.
    ReadyOk,
    /// `bestmove …`, end of a search.
    BestMove,
    /// A mate-in-zero score or a stalemate marker.
    GameEnd,
}

impl Sentinel {
    /// Every sentinel the bridge knows about.
    pub const ALL: [Sentinel; 3] = [Sentinel::ReadyOk, Sentinel::BestMove, Sentinel::GameEnd];

    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        match self {
            Sentinel::ReadyOk => text.contains(READY_OK),
            Sentinel::BestMove => text.contains(BEST_MOVE),
            Sentinel::GameEnd => text.contains(MATE_ZERO) || text.contains(STALEMATE),
        }
    }

    /// First sentinel in `wanted` that `text` contains.
    #[must_use]
    pub fn find(wanted: &[Sentinel], text: &str) -> Option<Sentinel> {
        wanted.iter().copied().find(|s| s.matches(text))
    }
}

impl fmt::Display for Sentinel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Sentinel::ReadyOk => "readyok",
            Sentinel::BestMove => "bestmove",
            Sentinel::GameEnd => "game end",
        })
    }
}

/// Outcome of looking for a best move in a search response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BestMove<'a> {
    /// The token following `bestmove `, not yet validated as notation.
    Move(&'a str),
    /// `bestmove (none)`: the side to move has no legal move.
    NoMove,
}

/// Extract the best-move token from a search response.
///
/// `None` means the marker is absent (the search did not complete).
#[must_use]
pub fn best_move(text: &str) -> Option<BestMove<'_>> {
    let start = text.find(BEST_MOVE_PREFIX)? + BEST_MOVE_PREFIX.len();
    let token = text[start..].split_whitespace().next().unwrap_or_default();
    if token.is_empty() || token == NO_MOVE {
        Some(BestMove::NoMove)
    } else {
        Some(BestMove::Move(token))
    }
}

/// Classification of a shallow search run only to learn whether the game
/// has ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeVerdict {
    /// The side to move is mated.
    Checkmate,
    /// The side to move has no move and is not in check.
    Stalemate,
    Ongoing,
}

/// Classify a probe response by substring.
///
/// A `mate 0` score means the side to move is mated. An explicit stalemate
/// marker, or `bestmove (none)` without a mate score, means stalemate.
/// Anything else, including a response cut short by a timeout, is treated as
/// a game that continues.
#[must_use]
pub fn probe_verdict(text: &str) -> ProbeVerdict {
    if text.contains(MATE_ZERO) {
        return ProbeVerdict::Checkmate;
    }
    if text.contains(STALEMATE) || best_move(text) == Some(BestMove::NoMove) {
        return ProbeVerdict::Stalemate;
    }
    ProbeVerdict::Ongoing
}

/// Engine name from an `id name …` handshake line.
#[must_use]
pub fn engine_name(text: &str) -> Option<&str> {
    text.lines()
        .find_map(|line| line.trim().strip_prefix(ID_NAME))
        .map(str::trim)
        .filter(|name| !name.is_empty())
}
