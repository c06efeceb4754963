//! Error types for session operations
//!
//! The move application pipeline is the sole boundary that catches
//! rules-engine failures and rewraps them into this taxonomy. None of these
//! are used for ordinary control flow; a discarded stale computation in
//! particular is a regular result value, not an error.

use kingside_rules::Side;
use thiserror::Error;

/// Errors that can occur while operating on a session
#[derive(Debug, Error)]
pub enum SessionError {
    /// The candidate move is not legal in the current position
    ///
    /// Recoverable: surfaced to the actor to retry with different input.
    #[error("illegal move {notation:?}: {reason}")]
    IllegalMove { notation: String, reason: String },

    /// The acting side does not match the derived side to move
    #[error("it is not {side}'s turn")]
    NotYourTurn { side: Side },

    /// The game already has a determined outcome; no state was changed
    #[error("the game is already over")]
    GameAlreadyOver,

    /// The session is not active (a seat is still empty)
    #[error("session is not active yet")]
    SessionNotActive,

    /// The seat is already occupied
    #[error("the {side} seat is already taken")]
    SeatTaken { side: Side },

    /// The move log does not replay from the initial position
    ///
    /// Fatal for the session: a log produced solely through the pipeline
    /// can never fail to replay, so the session must be quarantined, never
    /// repaired.
    #[error("corrupt move log at ply {ply}: {reason}")]
    CorruptLog { ply: u32, reason: String },
}

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;
