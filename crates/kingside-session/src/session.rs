//! Session identity, seats, and status
//!
//! A session is created once with an empty move log, mutated only by
//! appending moves or by transitioning to `Finished` with a recorded
//! outcome, and is immutable from then on. Status moves one way:
//! `Waiting` (a seat is empty), `Active` (both seats assigned, outcome
//! undetermined), `Finished`.

use chrono::{DateTime, Utc};
use kingside_engine::Level;
use kingside_rules::Side;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::error::{SessionError, SessionResult};
use crate::log::MoveLog;
use crate::outcome::Outcome;

/// Unique identifier of one game session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        SessionId::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Who controls one side of the board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Participant {
    Human { name: String },
    Engine { level: Level },
}

impl Participant {
    /// The engine strength if this seat is played by the engine
    pub fn engine_level(&self) -> Option<Level> {
        match self {
            Participant::Engine { level } => Some(*level),
            Participant::Human { .. } => None,
        }
    }
}

/// Per-side participant slots
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Seats {
    white: Option<Participant>,
    black: Option<Participant>,
}

impl Seats {
    pub fn get(&self, side: Side) -> Option<&Participant> {
        match side {
            Side::White => self.white.as_ref(),
            Side::Black => self.black.as_ref(),
        }
    }

    pub fn both_assigned(&self) -> bool {
        self.white.is_some() && self.black.is_some()
    }

    fn slot_mut(&mut self, side: Side) -> &mut Option<Participant> {
        match side {
            Side::White => &mut self.white,
            Side::Black => &mut self.black,
        }
    }
}

/// Lifecycle tag of a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    #[default]
    Waiting,
    Active,
    Finished,
}

/// One game: identity, participants, move log, status, outcome
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    seats: Seats,
    log: MoveLog,
    status: SessionStatus,
    outcome: Outcome,
    created_at: DateTime<Utc>,
    finished_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session with an empty log and no participants
    pub fn new() -> Self {
        Session {
            id: SessionId::new(),
            seats: Seats::default(),
            log: MoveLog::new(),
            status: SessionStatus::Waiting,
            outcome: Outcome::Undetermined,
            created_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    /// The recorded outcome; `Undetermined` until the session finishes
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn log(&self) -> &MoveLog {
        &self.log
    }

    pub fn seats(&self) -> &Seats {
        &self.seats
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }

    /// Assign a participant to an empty seat
    ///
    /// Transitions the session to `Active` once both seats are assigned.
    ///
    /// # Errors
    ///
    /// Fails with [`SessionError::SeatTaken`] if the seat is occupied and
    /// [`SessionError::GameAlreadyOver`] on a finished session.
    pub fn claim_seat(&mut self, side: Side, participant: Participant) -> SessionResult<()> {
        if self.status == SessionStatus::Finished {
            return Err(SessionError::GameAlreadyOver);
        }
        let slot = self.seats.slot_mut(side);
        if slot.is_some() {
            return Err(SessionError::SeatTaken { side });
        }
        *slot = Some(participant);

        if self.status == SessionStatus::Waiting && self.seats.both_assigned() {
            self.status = SessionStatus::Active;
            info!(session = %self.id, "session active");
        }
        Ok(())
    }

    /// Append a committed move; pipeline use only
    pub(crate) fn commit_move(&mut self, notation: String) -> u32 {
        self.log.append(notation)
    }

    /// Record the outcome and finish the session; pipeline use only
    ///
    /// One-directional: a finished session is never reopened, and calling
    /// this again leaves the first recorded outcome in place.
    pub(crate) fn finish(&mut self, outcome: Outcome) {
        if self.status == SessionStatus::Finished {
            return;
        }
        self.status = SessionStatus::Finished;
        self.outcome = outcome;
        self.finished_at = Some(Utc::now());
        info!(session = %self.id, %outcome, "session finished");
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new()
    }
}
