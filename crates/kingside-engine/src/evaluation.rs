//! Material evaluation
//!
//! Scores a position by counting piece values, positive favoring White.
//! Intentionally material-only: no positional, mobility, or king-safety
//! terms. The king's value dwarfs the rest of the table so that lines
//! reaching a king capture near the search horizon dominate any material
//! trade.

use kingside_rules::{PieceKind, Rules, Side};

/// Fixed piece values, in the evaluator's own units
pub const PAWN_VALUE: i32 = 10;
pub const KNIGHT_VALUE: i32 = 30;
pub const BISHOP_VALUE: i32 = 30;
pub const ROOK_VALUE: i32 = 50;
pub const QUEEN_VALUE: i32 = 90;
pub const KING_VALUE: i32 = 900;

fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => PAWN_VALUE,
        PieceKind::Knight => KNIGHT_VALUE,
        PieceKind::Bishop => BISHOP_VALUE,
        PieceKind::Rook => ROOK_VALUE,
        PieceKind::Queen => QUEEN_VALUE,
        PieceKind::King => KING_VALUE,
    }
}

/// Evaluate material balance from White's perspective
///
/// Deterministic and side-effect free. Never fails on a well-formed
/// position.
pub fn evaluate<R: Rules>(rules: &R, position: &R::Position) -> i32 {
    let mut score = 0;
    for (side, kind) in rules.pieces(position) {
        let value = piece_value(kind);
        score += match side {
            Side::White => value,
            Side::Black => -value,
        };
    }
    score
}
