//! Difficulty policy
//!
//! Maps a named strength level to a search depth and a random-move
//! probability, then picks the opponent's move: occasionally a uniformly
//! random legal move, otherwise the alpha-beta best move. Discarding the
//! computed best move with some probability is what bounds the artificial
//! opponent's strength at the lower levels.

use kingside_rules::{Rules, Side};
use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::search::search;

/// Named strength levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Easy,
    Medium,
    Hard,
}

/// Parameters for one move request, derived from a [`Level`]
///
/// Not persisted anywhere; recomputed per request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchParams {
    /// Search depth in plies, always positive
    pub depth: u8,
    /// Probability in [0, 1] of playing a random legal move instead of the
    /// search result
    pub randomness: f64,
}

impl Level {
    pub fn search_params(self) -> SearchParams {
        match self {
            Level::Easy => SearchParams {
                depth: 1,
                randomness: 0.7,
            },
            Level::Medium => SearchParams {
                depth: 2,
                randomness: 0.3,
            },
            Level::Hard => SearchParams {
                depth: 3,
                randomness: 0.1,
            },
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Easy => write!(f, "easy"),
            Level::Medium => write!(f, "medium"),
            Level::Hard => write!(f, "hard"),
        }
    }
}

/// Error for unrecognized level names
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown difficulty level {text:?}")]
pub struct ParseLevelError {
    text: String,
}

impl std::str::FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "easy" => Ok(Level::Easy),
            "medium" => Ok(Level::Medium),
            "hard" => Ok(Level::Hard),
            _ => Err(ParseLevelError {
                text: s.to_string(),
            }),
        }
    }
}

/// Choose a move for the side to move at the given strength level
///
/// Returns `None` only when the position has no legal moves.
pub fn choose_move<R: Rules, G: Rng>(
    rules: &R,
    position: &R::Position,
    level: Level,
    rng: &mut G,
) -> Option<R::Move> {
    choose_move_with(rules, position, level.search_params(), rng)
}

/// Choose a move with explicit search parameters
///
/// Draws one uniform value in [0, 1); below the randomness threshold the
/// search is skipped entirely and a uniformly random legal move is played.
/// Otherwise the search runs at the configured depth, maximizing when the
/// side to move is White and minimizing when Black.
pub fn choose_move_with<R: Rules, G: Rng>(
    rules: &R,
    position: &R::Position,
    params: SearchParams,
    rng: &mut G,
) -> Option<R::Move> {
    let moves = rules.legal_moves(position);
    if moves.is_empty() {
        return None;
    }

    if rng.random::<f64>() < params.randomness {
        return moves.choose(rng).cloned();
    }

    let maximizing = rules.side_to_move(position) == Side::White;
    let report = search(rules, position, params.depth, maximizing);

    // The legal set is non-empty, so the search always proposes a move;
    // fall back to the first legal move if it somehow does not.
    report.best_move.or_else(|| moves.into_iter().next())
}
