//! What the coordinator tells its collaborator about a submitted intent.

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Accepted,
    Rejected(RejectReason),
}

impl MoveOutcome {
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, MoveOutcome::Accepted)
    }
}

/// Why a move intent or promotion choice left the game unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("the game is over")]
    GameOver,
    #[error("choose a promotion piece first")]
    PromotionPending,
    #[error("no promotion is pending")]
    NoPromotionPending,
    #[error("promotion must be to a knight, bishop, rook or queen")]
    InvalidPromotion,
    #[error("it is not your turn")]
    NotYourTurn,
    /// Dropped back on the origin square or off the board.
    #[error("move cancelled")]
    Cancelled,
    #[error("there is no piece of yours on that square")]
    NotYourPiece,
    #[error("you cannot capture your own piece")]
    OwnPieceOnTarget,
    /// The engine did not accept the resulting position in time.
    #[error("the engine did not accept that move")]
    NotAcknowledged,
}

/// Why the engine's turn produced no move. The board is unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineTurnError {
    #[error("it is not the engine's turn")]
    NotEngineTurn,
    #[error("the game is over")]
    GameOver,
    #[error("the engine did not return a move in time")]
    Timeout,
    #[error("the engine has no legal move")]
    NoMove,
    #[error("the engine returned an unusable move `{token}`: {reason}")]
    Malformed { token: String, reason: String },
}
