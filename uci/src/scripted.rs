//! In-memory scripted engine for tests and embedding.
//!
//! Speaks just enough UCI over a `tokio::io::duplex` pair to drive an
//! [`EngineSession`](crate::EngineSession) through [`attach`]:
//! `uci` → `id name` + `uciok`, `isready` → `readyok` (late after a
//! [`slow`](ScriptedEngine::slow) position), a depth-1 probe →
//! the next scripted [`ProbeReply`], any deeper search → the next scripted
//! best move (or silence once the script runs out). Every command received is
//! kept in a [`Transcript`].
//!
//! [`attach`]: crate::EngineSession::attach

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{DuplexStream, ReadHalf, WriteHalf};

use crate::codec::{LineReader, LineWriter};

const PIPE_CAPACITY: usize = 16 * 1024;

/// What the engine answers to a `go depth 1` probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeReply {
    Ongoing,
    Checkmate,
    Stalemate,
    /// No answer at all; the probe times out.
    Silent,
}

#[derive(Debug, Clone)]
pub struct ScriptedEngine {
    name: String,
    moves: VecDeque<String>,
    probes: VecDeque<ProbeReply>,
    refused: Vec<String>,
    slow: Vec<(String, Duration)>,
    /// Delay for the next `isready` after a slow position.
    ready_delay: Option<Duration>,
    mute: bool,
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedEngine {
    #[must_use]
    pub fn new() -> Self {
        Self {
            name: "Scripted".to_string(),
            moves: VecDeque::new(),
            probes: VecDeque::new(),
            refused: Vec::new(),
            slow: Vec::new(),
            ready_delay: None,
            mute: false,
        }
    }

    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Queue the best move for the next deep search.
    #[must_use]
    pub fn reply(mut self, token: impl Into<String>) -> Self {
        self.moves.push_back(token.into());
        self
    }

    /// Queue the answer to the next probe. Unscripted probes are `Ongoing`.
    #[must_use]
    pub fn probe(mut self, reply: ProbeReply) -> Self {
        self.probes.push_back(reply);
        self
    }

    /// Withhold `readyok` after any position whose last move is `token`.
    #[must_use]
    pub fn refuse(mut self, token: impl Into<String>) -> Self {
        self.refused.push(token.into());
        self
    }

    /// Answer the first `isready` after a position whose last move is
    /// `token` only once `delay` has passed.
    #[must_use]
    pub fn slow(mut self, token: impl Into<String>, delay: Duration) -> Self {
        self.slow.push((token.into(), delay));
        self
    }

    /// Never answer anything.
    #[must_use]
    pub fn mute(mut self) -> Self {
        self.mute = true;
        self
    }

    /// Start the engine task. Returns the engine's output and input streams
    /// (in that order, matching [`attach`](crate::EngineSession::attach)).
    #[must_use]
    pub fn spawn(self) -> (ReadHalf<DuplexStream>, WriteHalf<DuplexStream>, Transcript) {
        let (client, server) = tokio::io::duplex(PIPE_CAPACITY);
        let (client_read, client_write) = tokio::io::split(client);
        let (server_read, server_write) = tokio::io::split(server);
        let transcript = Transcript::default();
        let log = transcript.clone();

        tokio::spawn(async move {
            let mut state = self;
            let mut reader = LineReader::new(server_read);
            let mut writer = LineWriter::new(server_write);
            let mut position_refused = false;

            while let Ok(Some(line)) = reader.read_line().await {
                log.push(&line);
                let replies = state.answer(&line, &mut position_refused);
                if line == "quit" {
                    break;
                }
                if line == "isready"
                    && !replies.is_empty()
                    && let Some(delay) = state.ready_delay.take()
                {
                    tokio::time::sleep(delay).await;
                }
                for reply in replies {
                    if writer.write_line(&reply).await.is_err() {
                        return;
                    }
                }
            }
        });

        (client_read, client_write, transcript)
    }

    fn answer(&mut self, line: &str, position_refused: &mut bool) -> Vec<String> {
        if self.mute {
            return Vec::new();
        }
        let mut words = line.split_whitespace();
        match words.next() {
            Some("uci") => vec![format!("id name {}", self.name), "uciok".to_string()],
            Some("isready") if *position_refused => Vec::new(),
            Some("isready") => vec!["readyok".to_string()],
            Some("position") => {
                let last = line.split_whitespace().last().unwrap_or_default();
                *position_refused = self.refused.iter().any(|t| t == last);
                self.ready_delay = self
                    .slow
                    .iter()
                    .find(|(t, _)| t == last)
                    .map(|(_, delay)| *delay);
                Vec::new()
            }
            Some("go") => {
                let depth = words
                    .skip_while(|w| *w != "depth")
                    .nth(1)
                    .and_then(|d| d.parse::<u32>().ok())
                    .unwrap_or(1);
                if depth <= 1 {
                    self.answer_probe()
                } else {
                    self.answer_search(depth)
                }
            }
            _ => Vec::new(),
        }
    }

    fn answer_probe(&mut self) -> Vec<String> {
        match self.probes.pop_front().unwrap_or(ProbeReply::Ongoing) {
            ProbeReply::Ongoing => vec![
                "info depth 1 score cp 18".to_string(),
                "bestmove 0000".to_string(),
            ],
            ProbeReply::Checkmate => vec![
                "info depth 0 score mate 0".to_string(),
                "bestmove (none)".to_string(),
            ],
            ProbeReply::Stalemate => vec![
                "info depth 0 score cp 0".to_string(),
                "bestmove (none)".to_string(),
            ],
            ProbeReply::Silent => Vec::new(),
        }
    }

    fn answer_search(&mut self, depth: u32) -> Vec<String> {
        match self.moves.pop_front() {
            Some(token) => vec![
                format!("info depth {depth} score cp 25 pv {token}"),
                format!("bestmove {token}"),
            ],
            None => Vec::new(),
        }
    }
}

/// Commands the scripted engine has received, in order.
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    commands: Arc<Mutex<Vec<String>>>,
}

impl Transcript {
    fn push(&self, line: &str) {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(line.to_string());
    }

    #[must_use]
    pub fn commands(&self) -> Vec<String> {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of commands starting with `prefix`.
    #[must_use]
    pub fn count(&self, prefix: &str) -> usize {
        self.commands
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    /// Wait until a command starting with `prefix` has been received.
    pub async fn wait_for(&self, prefix: &str, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.count(prefix) > 0 {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
