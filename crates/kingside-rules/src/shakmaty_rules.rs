//! Production rules engine backed by shakmaty
//!
//! Adapts the `shakmaty` crate to the [`Rules`] trait. Positions are
//! `shakmaty::Chess` values and stay immutable: applying a move clones the
//! position and plays the move on the clone.

use shakmaty::fen::Epd;
use shakmaty::san::{SanError, SanPlus};
use shakmaty::uci::UciMove;
use shakmaty::{CastlingMode, Chess, Color, EnPassantMode, Move, Position, Role, Square};

use crate::error::{NotationError, RulesError};
use crate::rules::Rules;
use crate::types::{PieceKind, Side};

/// Rules engine over shakmaty's standard chess implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct ShakmatyRules;

impl ShakmatyRules {
    pub fn new() -> Self {
        ShakmatyRules
    }
}

fn side_of(color: Color) -> Side {
    match color {
        Color::White => Side::White,
        Color::Black => Side::Black,
    }
}

fn kind_of(role: Role) -> PieceKind {
    match role {
        Role::Pawn => PieceKind::Pawn,
        Role::Knight => PieceKind::Knight,
        Role::Bishop => PieceKind::Bishop,
        Role::Rook => PieceKind::Rook,
        Role::Queen => PieceKind::Queen,
        Role::King => PieceKind::King,
    }
}

impl Rules for ShakmatyRules {
    type Position = Chess;
    type Move = Move;

    fn initial_position(&self) -> Chess {
        Chess::default()
    }

    fn legal_moves(&self, position: &Chess) -> Vec<Move> {
        position.legal_moves().into_iter().collect()
    }

    fn apply_move(&self, position: &Chess, mv: &Move) -> Result<Chess, RulesError> {
        position.clone().play(mv).map_err(|_| RulesError::IllegalMove {
            notation: mv.to_uci(CastlingMode::Standard).to_string(),
        })
    }

    fn is_checkmate(&self, position: &Chess) -> bool {
        position.is_checkmate()
    }

    fn is_draw(&self, position: &Chess) -> bool {
        // Repetition needs game history and is handled by the session
        // deriver via repetition_key.
        position.is_stalemate()
            || position.is_insufficient_material()
            || position.halfmoves() >= 100
    }

    fn side_to_move(&self, position: &Chess) -> Side {
        side_of(position.turn())
    }

    fn pieces(&self, position: &Chess) -> Vec<(Side, PieceKind)> {
        let board = position.board();
        board
            .occupied()
            .into_iter()
            .filter_map(|square: Square| {
                board
                    .piece_at(square)
                    .map(|piece| (side_of(piece.color), kind_of(piece.role)))
            })
            .collect()
    }

    fn move_to_notation(&self, position: &Chess, mv: &Move) -> String {
        SanPlus::from_move(position.clone(), mv).to_string()
    }

    fn resolve_notation(&self, position: &Chess, text: &str) -> Result<Move, NotationError> {
        let trimmed = text.trim();

        // Coordinate notation first: "e2e4", "b7a8q". A promoting move
        // without its promotion piece matches no legal move here.
        if let Ok(uci) = trimmed.parse::<UciMove>() {
            return uci.to_move(position).map_err(|_| NotationError::NoMatch {
                text: trimmed.to_string(),
            });
        }

        match trimmed.parse::<SanPlus>() {
            Ok(san) => san.san.to_move(position).map_err(|err| match err {
                SanError::AmbiguousSan => NotationError::Ambiguous {
                    text: trimmed.to_string(),
                },
                _ => NotationError::NoMatch {
                    text: trimmed.to_string(),
                },
            }),
            Err(_) => Err(NotationError::Unparsable {
                text: trimmed.to_string(),
            }),
        }
    }

    fn repetition_key(&self, position: &Chess) -> String {
        Epd::from_position(position.clone(), EnPassantMode::Legal).to_string()
    }
}
