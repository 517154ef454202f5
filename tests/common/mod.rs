//! Shared test utilities and fixtures
//!
//! Games here run against the in-memory scripted engine with short
//! timeouts, so a deliberately silent engine costs milliseconds.

#![allow(dead_code)]

use std::time::Duration;

use gambit_core::{GameCoordinator, GameSettings, TurnTimeouts};
use gambit_types::Square;
use gambit_uci::scripted::{ScriptedEngine, Transcript};
use gambit_uci::{EngineConfig, EngineSession};

pub fn sq(s: &str) -> Square {
    s.parse().unwrap()
}

pub fn fast_settings() -> GameSettings {
    GameSettings::default().with_timeouts(TurnTimeouts::new(
        Duration::from_millis(250),
        Duration::from_millis(250),
        Duration::from_millis(250),
    ))
}

pub async fn session(engine: ScriptedEngine) -> (EngineSession, Transcript) {
    let (reader, writer, transcript) = engine.spawn();
    let config = EngineConfig::new("scripted").with_startup_timeout(Duration::from_secs(1));
    let session = EngineSession::attach(reader, writer, &config)
        .await
        .expect("scripted engine completes the handshake");
    (session, transcript)
}

pub async fn start(engine: ScriptedEngine, settings: GameSettings) -> (GameCoordinator, Transcript) {
    let (session, transcript) = session(engine).await;
    (GameCoordinator::start(session, settings).await, transcript)
}

/// The most recent `position` command the engine received.
pub fn last_position(transcript: &Transcript) -> Option<String> {
    transcript
        .commands()
        .into_iter()
        .rev()
        .find(|c| c.starts_with("position"))
}
