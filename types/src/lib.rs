//! Core domain types for Gambit.
//!
//! This crate contains the board model, coordinate notation, move history and
//! the game event taxonomy. No IO, no async: everything here is a pure
//! transform over caller-owned values and can be used from any layer.

// Pedantic lint configuration - these are intentional design choices
#![allow(clippy::missing_errors_doc)] // Result-returning functions are self-explanatory
#![allow(clippy::missing_panics_doc)] // Panics are documented in assertions

mod board;
mod history;
mod notation;
mod outcome;
mod piece;
mod square;

pub use board::{AppliedMove, Board, apply_castling, apply_move, apply_simple_move, detects_promotion};
pub use history::MoveHistory;
pub use notation::{MoveToken, NotationError};
pub use outcome::{GameEvent, MoveEvent, MoveKind, Outcome};
pub use piece::{Piece, PieceKind, Side};
pub use square::{Square, is_valid_coordinate};
