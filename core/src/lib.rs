//! Game coordination for Gambit.
//!
//! [`GameCoordinator`] runs the turn-taking state machine over a
//! [`gambit_uci::EngineSession`]; [`ResultLog`] keeps the record of finished
//! games.

mod coordinator;
mod outcome;
pub mod results;
mod settings;

pub use coordinator::{GameCoordinator, GameState};
pub use outcome::{EngineTurnError, MoveOutcome, RejectReason};
pub use results::{ResultEntry, ResultLog, ResultLogError};
pub use settings::{DEFAULT_SEARCH_DEPTH, GameSettings, TurnTimeouts};
