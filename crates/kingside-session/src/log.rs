//! Append-only move log
//!
//! The authoritative history of one game. Replaying the log from the
//! canonical initial position through the rules engine always yields the
//! current position; no other component stores position as mutable state.
//! Only the pipeline (same crate) can append, and nothing can reorder or
//! remove entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One committed move
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggedMove {
    /// Standard algebraic notation as rendered by the rules engine at
    /// commit time; replayable deterministically
    pub notation: String,
    /// Zero-based ply index within the game
    pub ply: u32,
    /// Commit timestamp, informational only
    pub played_at: DateTime<Utc>,
}

/// Ordered sequence of committed moves for one game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoveLog {
    moves: Vec<LoggedMove>,
}

impl MoveLog {
    pub fn new() -> Self {
        MoveLog::default()
    }

    /// Number of committed plies
    pub fn len(&self) -> u32 {
        self.moves.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The most recently committed move, if any
    pub fn last(&self) -> Option<&LoggedMove> {
        self.moves.last()
    }

    /// Iterate over committed moves in commit order
    pub fn iter(&self) -> std::slice::Iter<'_, LoggedMove> {
        self.moves.iter()
    }

    /// Append a committed move, returning its ply index; pipeline use only
    pub(crate) fn append(&mut self, notation: String) -> u32 {
        let ply = self.len();
        self.moves.push(LoggedMove {
            notation,
            ply,
            played_at: Utc::now(),
        });
        ply
    }
}
