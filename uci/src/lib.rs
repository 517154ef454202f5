//! UCI engine bridge.
//!
//! Owns one engine subprocess (or any async byte stream pair) per game and
//! turns the engine's free-running text output into timeout-bounded
//! request/response round trips. Nothing here knows about boards or turns.

pub mod codec;
pub mod protocol;
pub mod scripted;
pub mod types;

mod session;

pub use protocol::{BestMove, ProbeVerdict, Sentinel, best_move, probe_verdict};
pub use session::EngineSession;
pub use types::{BridgeError, EngineConfig, EngineOption, EngineResponse};
