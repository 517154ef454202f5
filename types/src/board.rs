//! Board model: an 8×8 grid of signed piece codes and the pure transforms
//! that apply moves to it.
//!
//! Nothing here checks chess legality. Compound moves are recognised from
//! geometry alone: a king travelling two files is a castle, a pawn reaching
//! its last rank is a promotion, a pawn moving diagonally onto an empty
//! square is an en-passant capture.

use crate::notation::MoveToken;
use crate::outcome::MoveKind;
use crate::piece::{Piece, PieceKind, Side};
use crate::square::Square;

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Piece codes indexed `[rank][file]`, rank 0 = White's back rank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[i8; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl Board {
    #[must_use]
    pub const fn empty() -> Self {
        Self { cells: [[0; 8]; 8] }
    }

    /// Standard starting layout.
    #[must_use]
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for (file, kind) in BACK_RANK.iter().enumerate() {
            board.cells[0][file] = Piece::new(Side::White, *kind).code();
            board.cells[1][file] = Piece::new(Side::White, PieceKind::Pawn).code();
            board.cells[6][file] = Piece::new(Side::Black, PieceKind::Pawn).code();
            board.cells[7][file] = Piece::new(Side::Black, *kind).code();
        }
        board
    }

    /// Builder-style placement, mostly for constructing test positions.
    #[must_use]
    pub fn with(mut self, square: Square, piece: Piece) -> Self {
        self.set(square, Some(piece));
        self
    }

    #[must_use]
    pub const fn code_at(&self, square: Square) -> i8 {
        self.cells[square.rank() as usize][square.file() as usize]
    }

    #[must_use]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        Piece::from_code(self.code_at(square))
    }

    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.rank() as usize][square.file() as usize] = piece.map_or(0, Piece::code);
    }

    pub fn clear(&mut self, square: Square) {
        self.set(square, None);
    }

    /// Occupied squares and their pieces, rank by rank from a1.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(|sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }

    #[must_use]
    pub fn king_square(&self, side: Side) -> Option<Square> {
        let king = Piece::new(side, PieceKind::King);
        self.pieces().find(|(_, p)| *p == king).map(|(sq, _)| sq)
    }

    /// Raw codes, `[rank][file]`.
    #[must_use]
    pub const fn codes(&self) -> &[[i8; 8]; 8] {
        &self.cells
    }
}

/// What [`apply_move`] did to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppliedMove {
    mover: Piece,
    kind: MoveKind,
    captured: Option<Piece>,
    awaiting_promotion: bool,
}

impl AppliedMove {
    #[must_use]
    pub const fn mover(self) -> Piece {
        self.mover
    }

    #[must_use]
    pub const fn kind(self) -> MoveKind {
        self.kind
    }

    #[must_use]
    pub const fn captured(self) -> Option<Piece> {
        self.captured
    }

    /// A pawn reached its last rank but the token named no promotion kind;
    /// the pawn is left standing on the promotion square.
    #[must_use]
    pub const fn awaiting_promotion(self) -> bool {
        self.awaiting_promotion
    }
}

/// Move whatever stands on `from` to `to`, returning what was captured.
pub fn apply_simple_move(board: &mut Board, from: Square, to: Square) -> Option<Piece> {
    let captured = board.piece_at(to);
    let code = board.code_at(from);
    board.cells[to.rank() as usize][to.file() as usize] = code;
    board.clear(from);
    captured
}

/// Apply a castle if `from → to` is a king moving two files along its rank.
///
/// The rook is taken from the corner on the side the king moves towards and
/// placed on the square the king crossed, in the same update. Returns `false`
/// and leaves the board untouched when the move is not a castle, including
/// when that corner holds no rook of the king's side.
pub fn apply_castling(board: &mut Board, from: Square, to: Square) -> bool {
    let Some(king) = board.piece_at(from) else {
        return false;
    };
    if king.kind() != PieceKind::King
        || from.rank() != to.rank()
        || from.file().abs_diff(to.file()) != 2
    {
        return false;
    }

    let kingside = to.file() > from.file();
    let (rook_from_file, rook_to_file) = if kingside { (7, 5) } else { (0, 3) };
    let (Some(rook_from), Some(rook_to)) =
        (from.with_file(rook_from_file), from.with_file(rook_to_file))
    else {
        return false;
    };
    let own_rook = Piece::new(king.side(), PieceKind::Rook);
    if board.piece_at(rook_from) != Some(own_rook) {
        return false;
    }

    apply_simple_move(board, rook_from, rook_to);
    apply_simple_move(board, from, to);
    true
}

/// Whether `piece` arriving on `to` is a pawn reaching its last rank.
#[must_use]
pub fn detects_promotion(piece: Piece, to: Square) -> bool {
    piece.kind() == PieceKind::Pawn && to.rank() == piece.side().promotion_rank()
}

fn is_en_passant(board: &Board, piece: Piece, from: Square, to: Square) -> bool {
    piece.kind() == PieceKind::Pawn && from.file() != to.file() && board.piece_at(to).is_none()
}

/// Apply a move token in place, expanding compound moves.
///
/// Returns `None` (board untouched) if `from` is empty. When a pawn reaches
/// its last rank and the token carries a promotion kind, the pawn is
/// replaced in the same update; without one the pawn stays and the result
/// reports [`AppliedMove::awaiting_promotion`].
pub fn apply_move(board: &mut Board, token: &MoveToken) -> Option<AppliedMove> {
    let (from, to) = (token.from(), token.to());
    let mover = board.piece_at(from)?;

    if apply_castling(board, from, to) {
        return Some(AppliedMove {
            mover,
            kind: MoveKind::Castle,
            captured: None,
            awaiting_promotion: false,
        });
    }

    let captured = if is_en_passant(board, mover, from, to) {
        let behind = to.with_rank(from.rank());
        let taken = behind.and_then(|sq| board.piece_at(sq));
        if let Some(sq) = behind {
            board.clear(sq);
        }
        apply_simple_move(board, from, to);
        taken
    } else {
        apply_simple_move(board, from, to)
    };

    if detects_promotion(mover, to) {
        let awaiting_promotion = match token.promotion() {
            Some(kind) => {
                board.set(to, Some(mover.promoted_to(kind)));
                false
            }
            None => true,
        };
        return Some(AppliedMove {
            mover,
            kind: MoveKind::Promotion,
            captured,
            awaiting_promotion,
        });
    }

    let kind = if captured.is_some() {
        MoveKind::Capture
    } else {
        MoveKind::Plain
    };
    Some(AppliedMove {
        mover,
        kind,
        captured,
        awaiting_promotion: false,
    })
}
