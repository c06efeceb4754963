//! The rules-engine interface
//!
//! The narrow seam between the game core and whatever implements chess
//! legality. Positions and moves are opaque associated types owned by the
//! implementation; the core only queries and transforms them through these
//! operations.

use crate::error::{NotationError, RulesError};
use crate::types::{PieceKind, Side};

/// A chess rules engine
///
/// Implementations must be deterministic: [`Rules::legal_moves`] must return
/// the same moves in the same order for equal positions, since the search
/// breaks ties by first-encountered move.
pub trait Rules {
    /// Complete board configuration including side to move, castling rights,
    /// en passant target, and move counters. Immutable value type.
    type Position: Clone;

    /// A legal transition between two positions. Immutable once created.
    type Move: Clone + PartialEq + std::fmt::Debug;

    /// The canonical starting position
    fn initial_position(&self) -> Self::Position;

    /// All legal moves in the position, in a stable order
    fn legal_moves(&self, position: &Self::Position) -> Vec<Self::Move>;

    /// Apply a move, producing the successor position
    ///
    /// # Errors
    ///
    /// Fails with [`RulesError::IllegalMove`] if the move is not in
    /// [`Rules::legal_moves`] for this position.
    fn apply_move(
        &self,
        position: &Self::Position,
        mv: &Self::Move,
    ) -> Result<Self::Position, RulesError>;

    /// Whether the side to move is checkmated
    fn is_checkmate(&self, position: &Self::Position) -> bool;

    /// Whether the position is drawn (stalemate, insufficient material, or
    /// other conditions the implementation tracks on a single position)
    fn is_draw(&self, position: &Self::Position) -> bool;

    /// Whether the game cannot continue from this position
    fn is_terminal(&self, position: &Self::Position) -> bool {
        self.is_checkmate(position)
            || self.is_draw(position)
            || self.legal_moves(position).is_empty()
    }

    /// Which side moves next
    fn side_to_move(&self, position: &Self::Position) -> Side;

    /// Every piece on the board with its owning side
    fn pieces(&self, position: &Self::Position) -> Vec<(Side, PieceKind)>;

    /// Render a move as reversible text notation (standard algebraic)
    fn move_to_notation(&self, position: &Self::Position, mv: &Self::Move) -> String;

    /// Resolve move text against the position
    ///
    /// Accepts standard algebraic and coordinate notation. Promotion piece
    /// choice is a required part of the input, never inferred.
    ///
    /// # Errors
    ///
    /// Fails with a [`NotationError`] when the text does not parse, matches
    /// no legal move, or is ambiguous.
    fn resolve_notation(
        &self,
        position: &Self::Position,
        text: &str,
    ) -> Result<Self::Move, NotationError>;

    /// A text key identifying the position for repetition counting
    ///
    /// Two positions with equal keys repeat each other. Move counters must
    /// not participate in the key.
    fn repetition_key(&self, position: &Self::Position) -> String;
}
