//! Public types of the engine bridge.
//!
//! The coordinator constructs an [`EngineConfig`], receives
//! [`EngineResponse`]s, and treats [`BridgeError`] as the one fatal failure.

use std::time::Duration;

use serde::Deserialize;

use crate::protocol::Sentinel;

const DEFAULT_STARTUP_MS: u64 = 5_000;

fn default_startup_ms() -> u64 {
    DEFAULT_STARTUP_MS
}

/// One `setoption` sent during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EngineOption {
    pub name: String,
    pub value: String,
}

/// How to start and greet an engine.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Executable name or path (e.g. "stockfish"). Resolved through `PATH`.
    command: String,
    #[serde(default)]
    args: Vec<String>,
    /// Upper bound on the `uci` / `isready` handshake.
    #[serde(default = "default_startup_ms")]
    startup_timeout_ms: u64,
    #[serde(default)]
    options: Vec<EngineOption>,
}

impl EngineConfig {
    #[must_use]
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            startup_timeout_ms: DEFAULT_STARTUP_MS,
            options: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    #[must_use]
    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Queue a `setoption name <name> value <value>` for the handshake.
    #[must_use]
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.push(EngineOption {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    #[must_use]
    pub fn startup_timeout(&self) -> Duration {
        Duration::from_millis(self.startup_timeout_ms)
    }

    #[must_use]
    pub fn options(&self) -> &[EngineOption] {
        &self.options
    }
}

/// Text accumulated for one request and the sentinel that completed it.
///
/// `matched() == None` means the deadline passed or the engine's output
/// closed first. Callers treat that as a failed round trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineResponse {
    text: String,
    matched: Option<Sentinel>,
}

impl EngineResponse {
    #[must_use]
    pub fn new(text: String, matched: Option<Sentinel>) -> Self {
        Self { text, matched }
    }

    /// Every line received, each terminated by `\n`.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn matched(&self) -> Option<Sentinel> {
        self.matched
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.matched.is_some()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The engine could not be started or never finished the handshake.
    #[error("engine `{command}` unavailable: {reason}")]
    Unavailable { command: String, reason: String },
}

impl BridgeError {
    pub(crate) fn unavailable(command: &str, reason: impl Into<String>) -> Self {
        BridgeError::Unavailable {
            command: command.to_string(),
            reason: reason.into(),
        }
    }
}
