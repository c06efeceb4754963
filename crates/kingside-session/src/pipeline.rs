//! Move application pipeline
//!
//! The only writer of a session's move log. Every candidate move is
//! validated against freshly derived state, committed, and followed by the
//! artificial opponent's reply when it is an engine seat's turn. The rules
//! engine is an explicit handle held by the pipeline, never ambient state,
//! so sessions can be driven with a substitute implementation in tests.

use kingside_engine::{choose_move, Level};
use kingside_rules::{Rules, Side};
use rand::Rng;
use tracing::{debug, info, warn};

use crate::derive::{derive_state, DerivedState};
use crate::error::{SessionError, SessionResult};
use crate::outcome::Outcome;
use crate::session::{Session, SessionStatus};

/// Attempts at recomputing an engine reply after a stale discard before the
/// pipeline gives up and returns control to the caller
const STALE_RETRY_LIMIT: u32 = 3;

/// Proof of a committed move
#[derive(Debug, Clone, PartialEq)]
pub struct MoveReceipt {
    /// Canonical notation as committed to the log
    pub notation: String,
    /// Ply index the move was committed at
    pub ply: u32,
    /// Outcome derived immediately after this move, before any chained
    /// engine reply
    pub outcome: Outcome,
}

/// An engine move computed against a specific log state
///
/// Holds notation rather than a raw move so it can outlive the position it
/// was computed from; it is re-resolved against the current head when
/// applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedMove {
    pub notation: String,
    /// Log length the computation started from
    pub basis_ply: u32,
}

/// Result of applying a previously computed move
///
/// A discard is an ordinary value, not an error: the computation lost a
/// race against log advancement and is dropped without any state change.
#[derive(Debug, Clone, PartialEq)]
pub enum ComputedApply {
    Committed(MoveReceipt),
    Discarded,
}

/// Validates, commits, and chains moves for sessions
#[derive(Debug, Clone)]
pub struct Pipeline<R: Rules> {
    rules: R,
}

impl<R: Rules> Pipeline<R> {
    pub fn new(rules: R) -> Self {
        Pipeline { rules }
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    /// Derive the session's current state from its move log
    ///
    /// A session finished by resignation or draw agreement reports the
    /// recorded outcome even though the replayed log alone would not
    /// determine one.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError::CorruptLog`] from derivation.
    pub fn derive_session_state(
        &self,
        session: &Session,
    ) -> SessionResult<DerivedState<R::Position>> {
        let mut state = derive_state(&self.rules, session.log())?;
        if session.status() == SessionStatus::Finished && !state.outcome.is_decided() {
            state.outcome = session.outcome();
        }
        Ok(state)
    }

    /// Validate and commit a move for the acting side
    ///
    /// On success the move is appended to the log and, when the new side to
    /// move is an engine seat with the game still open, the engine's reply
    /// is computed and applied through the same validation before control
    /// returns. The receipt describes the caller's own move; inspect the
    /// session afterward for the post-reply state.
    ///
    /// # Errors
    ///
    /// [`SessionError::SessionNotActive`] before both seats are assigned,
    /// [`SessionError::GameAlreadyOver`] once an outcome is determined,
    /// [`SessionError::NotYourTurn`] when `acting_side` is not the derived
    /// side to move, and [`SessionError::IllegalMove`] when the notation
    /// does not resolve to a legal move. None of these change any state.
    pub fn apply_player_move<G: Rng>(
        &self,
        session: &mut Session,
        acting_side: Side,
        notation: &str,
        rng: &mut G,
    ) -> SessionResult<MoveReceipt> {
        match session.status() {
            SessionStatus::Waiting => return Err(SessionError::SessionNotActive),
            SessionStatus::Finished => return Err(SessionError::GameAlreadyOver),
            SessionStatus::Active => {}
        }

        let state = derive_state(&self.rules, session.log())?;
        if state.outcome.is_decided() {
            return Err(SessionError::GameAlreadyOver);
        }
        if state.side_to_move != acting_side {
            return Err(SessionError::NotYourTurn { side: acting_side });
        }

        let mv = self
            .rules
            .resolve_notation(&state.position, notation)
            .map_err(|err| SessionError::IllegalMove {
                notation: notation.to_string(),
                reason: err.to_string(),
            })?;

        let receipt = self.commit(session, &state.position, &mv)?;
        self.chain_engine_replies(session, rng)?;
        Ok(receipt)
    }

    /// Compute an engine move for the current position at the given level
    ///
    /// Manual invocation wrapper around the difficulty policy; the returned
    /// value records the log state it was computed against and must be
    /// applied with [`Pipeline::apply_computed_move`].
    ///
    /// # Errors
    ///
    /// [`SessionError::GameAlreadyOver`] when the outcome is already
    /// determined; propagates [`SessionError::CorruptLog`].
    pub fn request_artificial_move<G: Rng>(
        &self,
        session: &Session,
        level: Level,
        rng: &mut G,
    ) -> SessionResult<ComputedMove> {
        if session.status() == SessionStatus::Finished {
            return Err(SessionError::GameAlreadyOver);
        }
        let state = derive_state(&self.rules, session.log())?;
        if state.outcome.is_decided() {
            return Err(SessionError::GameAlreadyOver);
        }

        let basis_ply = session.log().len();
        let Some(mv) = choose_move(&self.rules, &state.position, level, rng) else {
            // No legal moves means the position is terminal, caught above
            return Err(SessionError::GameAlreadyOver);
        };
        let notation = self.rules.move_to_notation(&state.position, &mv);
        debug!(session = %session.id(), %level, basis_ply, notation = %notation, "engine move computed");

        Ok(ComputedMove {
            notation,
            basis_ply,
        })
    }

    /// Commit a previously computed engine move, unless it went stale
    ///
    /// The state is re-derived immediately before applying. If the log
    /// advanced since the computation began, or the move no longer resolves
    /// against the current head, the move is discarded rather than appended
    /// out of order. The caller decides whether to recompute.
    ///
    /// # Errors
    ///
    /// Propagates [`SessionError::CorruptLog`]; staleness itself is
    /// reported as [`ComputedApply::Discarded`], not an error.
    pub fn apply_computed_move(
        &self,
        session: &mut Session,
        computed: &ComputedMove,
    ) -> SessionResult<ComputedApply> {
        if session.status() == SessionStatus::Finished {
            debug!(session = %session.id(), "computation discarded, session finished");
            return Ok(ComputedApply::Discarded);
        }
        if session.log().len() != computed.basis_ply {
            debug!(
                session = %session.id(),
                basis_ply = computed.basis_ply,
                head = session.log().len(),
                "stale computation discarded"
            );
            return Ok(ComputedApply::Discarded);
        }

        let state = derive_state(&self.rules, session.log())?;
        if state.outcome.is_decided() {
            return Ok(ComputedApply::Discarded);
        }

        match self.rules.resolve_notation(&state.position, &computed.notation) {
            Ok(mv) => self
                .commit(session, &state.position, &mv)
                .map(ComputedApply::Committed),
            Err(err) => {
                debug!(
                    session = %session.id(),
                    notation = %computed.notation,
                    %err,
                    "computed move no longer legal, discarded"
                );
                Ok(ComputedApply::Discarded)
            }
        }
    }

    /// Record a resignation supplied by the external layer
    ///
    /// # Errors
    ///
    /// [`SessionError::GameAlreadyOver`] on a finished session.
    pub fn resign(&self, session: &mut Session, side: Side) -> SessionResult<()> {
        if session.status() == SessionStatus::Finished {
            return Err(SessionError::GameAlreadyOver);
        }
        info!(session = %session.id(), %side, "resignation");
        session.finish(Outcome::win_for(side.opponent()));
        Ok(())
    }

    /// Record a draw agreement supplied by the external layer
    ///
    /// # Errors
    ///
    /// [`SessionError::GameAlreadyOver`] on a finished session.
    pub fn agree_draw(&self, session: &mut Session) -> SessionResult<()> {
        if session.status() == SessionStatus::Finished {
            return Err(SessionError::GameAlreadyOver);
        }
        info!(session = %session.id(), "draw agreed");
        session.finish(Outcome::Draw);
        Ok(())
    }

    /// Append a validated move and re-derive
    fn commit(
        &self,
        session: &mut Session,
        position: &R::Position,
        mv: &R::Move,
    ) -> SessionResult<MoveReceipt> {
        let notation = self.rules.move_to_notation(position, mv);
        let ply = session.commit_move(notation.clone());
        let derived = derive_state(&self.rules, session.log())?;
        if derived.outcome.is_decided() {
            session.finish(derived.outcome);
        }
        info!(
            session = %session.id(),
            ply,
            notation = %notation,
            outcome = %derived.outcome,
            "move committed"
        );
        Ok(MoveReceipt {
            notation,
            ply,
            outcome: derived.outcome,
        })
    }

    /// Play engine replies until it is not an engine seat's turn
    ///
    /// Each reply is computed against the current head and revalidated by
    /// [`Pipeline::apply_computed_move`]; a stale discard triggers a fresh
    /// computation instead of stalling the engine seat.
    fn chain_engine_replies<G: Rng>(
        &self,
        session: &mut Session,
        rng: &mut G,
    ) -> SessionResult<()> {
        loop {
            let state = derive_state(&self.rules, session.log())?;
            if state.outcome.is_decided() {
                break;
            }
            let level = match session
                .seats()
                .get(state.side_to_move)
                .and_then(|participant| participant.engine_level())
            {
                Some(level) => level,
                None => break,
            };

            let mut committed = false;
            for attempt in 0..STALE_RETRY_LIMIT {
                let computed = self.request_artificial_move(session, level, rng)?;
                match self.apply_computed_move(session, &computed)? {
                    ComputedApply::Committed(_) => {
                        committed = true;
                        break;
                    }
                    ComputedApply::Discarded => {
                        debug!(session = %session.id(), attempt, "recomputing engine reply");
                    }
                }
            }
            if !committed {
                warn!(
                    session = %session.id(),
                    "engine reply repeatedly discarded, returning control to caller"
                );
                break;
            }
        }
        Ok(())
    }
}
