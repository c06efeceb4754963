//! Replay-based state derivation
//!
//! The only mechanism for computing the current position, the side to move,
//! and whether the game is over. Replays the move log from the canonical
//! initial position through the rules engine; nothing caches the result.
//! Threefold repetition is detected here, during replay, because a single
//! position carries no game history.

use std::collections::HashMap;

use kingside_rules::{Rules, Side};

use crate::error::{SessionError, SessionResult};
use crate::log::MoveLog;
use crate::outcome::Outcome;

/// State derived from a move log
#[derive(Debug, Clone)]
pub struct DerivedState<P> {
    pub position: P,
    pub side_to_move: Side,
    pub outcome: Outcome,
}

/// Replay the log and derive the current state
///
/// # Errors
///
/// Fails with [`SessionError::CorruptLog`] if any stored move does not
/// resolve or apply against the position reached by its predecessors. That
/// can never happen for logs produced through the pipeline; it catches logs
/// transplanted from another game, which must be quarantined rather than
/// repaired.
pub fn derive_state<R: Rules>(
    rules: &R,
    log: &MoveLog,
) -> SessionResult<DerivedState<R::Position>> {
    let mut position = rules.initial_position();
    let mut seen: HashMap<String, u32> = HashMap::new();
    seen.insert(rules.repetition_key(&position), 1);
    let mut threefold = false;

    for entry in log.iter() {
        let mv = rules
            .resolve_notation(&position, &entry.notation)
            .map_err(|err| SessionError::CorruptLog {
                ply: entry.ply,
                reason: err.to_string(),
            })?;
        position = rules
            .apply_move(&position, &mv)
            .map_err(|err| SessionError::CorruptLog {
                ply: entry.ply,
                reason: err.to_string(),
            })?;

        let count = seen.entry(rules.repetition_key(&position)).or_insert(0);
        *count += 1;
        if *count >= 3 {
            threefold = true;
        }
    }

    let side_to_move = rules.side_to_move(&position);
    let outcome = if rules.is_checkmate(&position) {
        // The side that delivered mate moved last
        Outcome::win_for(side_to_move.opponent())
    } else if threefold || rules.is_draw(&position) || rules.legal_moves(&position).is_empty() {
        Outcome::Draw
    } else {
        Outcome::Undetermined
    };

    Ok(DerivedState {
        position,
        side_to_move,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kingside_rules::ShakmatyRules;

    fn log_of(moves: &[&str]) -> MoveLog {
        let mut log = MoveLog::new();
        for text in moves {
            log.append(text.to_string());
        }
        log
    }

    #[test]
    fn test_empty_log_derives_initial_position() {
        let rules = ShakmatyRules::new();
        let state = derive_state(&rules, &MoveLog::new()).unwrap();

        assert_eq!(state.side_to_move, Side::White);
        assert_eq!(state.outcome, Outcome::Undetermined);
        assert_eq!(rules.legal_moves(&state.position).len(), 20);
    }

    #[test]
    fn test_side_to_move_alternates() {
        let rules = ShakmatyRules::new();

        let after_one = derive_state(&rules, &log_of(&["e4"])).unwrap();
        assert_eq!(after_one.side_to_move, Side::Black);

        let after_two = derive_state(&rules, &log_of(&["e4", "e5"])).unwrap();
        assert_eq!(after_two.side_to_move, Side::White);
    }

    #[test]
    fn test_fools_mate_derives_black_win() {
        let rules = ShakmatyRules::new();
        let state = derive_state(&rules, &log_of(&["f2f3", "e7e5", "g2g4", "d8h4"])).unwrap();

        assert_eq!(state.outcome, Outcome::BlackWins);
        assert_eq!(state.side_to_move, Side::White);
    }

    #[test]
    fn test_threefold_repetition_derives_draw() {
        let rules = ShakmatyRules::new();
        // Knight shuffle returning to the starting position twice
        let log = log_of(&[
            "Nf3", "Nf6", "Ng1", "Ng8", "Nf3", "Nf6", "Ng1", "Ng8",
        ]);

        let state = derive_state(&rules, &log).unwrap();
        assert_eq!(state.outcome, Outcome::Draw);
    }

    #[test]
    fn test_unresolvable_entry_is_corrupt_with_ply() {
        let rules = ShakmatyRules::new();
        // e5 is a reply to e4 and cannot be White's first move
        let log = log_of(&["e5", "e4"]);

        let err = derive_state(&rules, &log).unwrap_err();
        match err {
            SessionError::CorruptLog { ply, .. } => assert_eq!(ply, 0),
            other => panic!("expected CorruptLog, got {other:?}"),
        }
    }

    #[test]
    fn test_transplanted_log_is_corrupt() {
        let rules = ShakmatyRules::new();
        // A tail of another game's log, illegal from the initial position
        let log = log_of(&["e4", "e5", "Qxf7#"]);

        let err = derive_state(&rules, &log).unwrap_err();
        assert!(matches!(err, SessionError::CorruptLog { ply: 2, .. }));
    }

    #[test]
    fn test_derivation_is_idempotent() {
        let rules = ShakmatyRules::new();
        let log = log_of(&["e4", "c5", "Nf3", "d6"]);

        let first = derive_state(&rules, &log).unwrap();
        let second = derive_state(&rules, &log).unwrap();

        assert_eq!(first.side_to_move, second.side_to_move);
        assert_eq!(first.outcome, second.outcome);
        assert_eq!(
            rules.repetition_key(&first.position),
            rules.repetition_key(&second.position)
        );
    }
}
