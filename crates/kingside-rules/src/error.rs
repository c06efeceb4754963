//! Error types for the rules-engine boundary
//!
//! These are the only failures a [`crate::Rules`] implementation may report.
//! The session pipeline rewraps them into its own taxonomy; nothing else in
//! the workspace handles them directly.

use thiserror::Error;

/// Errors from applying a move to a position
#[derive(Debug, Error)]
pub enum RulesError {
    /// The move is not legal in the given position
    #[error("illegal move {notation} in this position")]
    IllegalMove { notation: String },
}

/// Errors from resolving move text against a position
#[derive(Debug, Error)]
pub enum NotationError {
    /// The text is not valid move notation at all
    #[error("cannot parse move text {text:?}")]
    Unparsable { text: String },

    /// The text parses but matches no legal move in the position
    ///
    /// Includes under-specified promotions: a promoting move without a
    /// promotion piece matches no legal move and must be resubmitted fully
    /// specified.
    #[error("move {text:?} is not legal in this position")]
    NoMatch { text: String },

    /// The text matches more than one legal move
    #[error("move {text:?} is ambiguous in this position")]
    Ambiguous { text: String },
}
