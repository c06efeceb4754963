//! End-to-end session flows through the public pipeline API

use kingside_engine::Level;
use kingside_rules::{Rules, ShakmatyRules, Side};
use kingside_session::{
    ComputedApply, Outcome, Participant, Pipeline, Session, SessionError, SessionStatus,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn pipeline() -> Pipeline<ShakmatyRules> {
    Pipeline::new(ShakmatyRules::new())
}

fn human(name: &str) -> Participant {
    Participant::Human {
        name: name.to_string(),
    }
}

fn human_vs_human() -> Session {
    let mut session = Session::new();
    session.claim_seat(Side::White, human("ana")).unwrap();
    session.claim_seat(Side::Black, human("ben")).unwrap();
    session
}

#[test]
fn fools_mate_finishes_the_session_with_black_win() {
    let pipeline = pipeline();
    let mut session = human_vs_human();
    let mut rng = StdRng::seed_from_u64(0);

    for (side, text) in [
        (Side::White, "f2f3"),
        (Side::Black, "e7e5"),
        (Side::White, "g2g4"),
        (Side::Black, "d8h4"),
    ] {
        pipeline
            .apply_player_move(&mut session, side, text, &mut rng)
            .unwrap();
    }

    assert_eq!(session.status(), SessionStatus::Finished);
    assert_eq!(session.outcome(), Outcome::BlackWins);

    let state = pipeline.derive_session_state(&session).unwrap();
    assert_eq!(state.outcome, Outcome::BlackWins);
    assert!(session.finished_at().is_some());
}

#[test]
fn moves_after_mate_are_rejected_without_state_change() {
    let pipeline = pipeline();
    let mut session = human_vs_human();
    let mut rng = StdRng::seed_from_u64(0);

    for (side, text) in [
        (Side::White, "f3"),
        (Side::Black, "e5"),
        (Side::White, "g4"),
        (Side::Black, "Qh4#"),
    ] {
        pipeline
            .apply_player_move(&mut session, side, text, &mut rng)
            .unwrap();
    }
    let plies = session.log().len();

    let err = pipeline
        .apply_player_move(&mut session, Side::White, "a3", &mut rng)
        .unwrap_err();
    assert!(matches!(err, SessionError::GameAlreadyOver));
    assert_eq!(session.log().len(), plies);
}

#[test]
fn pipeline_logs_always_replay_cleanly() {
    let pipeline = pipeline();
    let mut session = human_vs_human();
    let mut rng = StdRng::seed_from_u64(7);

    // Drive both sides through the pipeline for a while; derivation must
    // succeed after every committed ply.
    for _ in 0..40 {
        let state = pipeline.derive_session_state(&session).unwrap();
        if state.outcome.is_decided() {
            break;
        }
        let side = state.side_to_move;
        let computed = pipeline
            .request_artificial_move(&session, Level::Easy, &mut rng)
            .unwrap();
        let applied = pipeline.apply_computed_move(&mut session, &computed).unwrap();
        assert!(
            matches!(applied, ComputedApply::Committed(_)),
            "fresh computation for {side} must commit"
        );

        pipeline.derive_session_state(&session).unwrap();
    }
}

#[test]
fn derivation_is_idempotent_between_appends() {
    let pipeline = pipeline();
    let mut session = human_vs_human();
    let mut rng = StdRng::seed_from_u64(3);

    for (side, text) in [(Side::White, "e4"), (Side::Black, "c5"), (Side::White, "Nf3")] {
        pipeline
            .apply_player_move(&mut session, side, text, &mut rng)
            .unwrap();
    }

    let rules = pipeline.rules().clone();
    let first = pipeline.derive_session_state(&session).unwrap();
    let second = pipeline.derive_session_state(&session).unwrap();
    assert_eq!(first.side_to_move, second.side_to_move);
    assert_eq!(first.outcome, second.outcome);
    assert_eq!(
        rules.repetition_key(&first.position),
        rules.repetition_key(&second.position)
    );
}

#[test]
fn human_vs_engine_game_runs_to_completion() {
    let pipeline = pipeline();
    let mut session = Session::new();
    session.claim_seat(Side::White, human("ana")).unwrap();
    session
        .claim_seat(
            Side::Black,
            Participant::Engine {
                level: Level::Medium,
            },
        )
        .unwrap();
    let mut rng = StdRng::seed_from_u64(11);
    let rules = ShakmatyRules::new();

    // The human plays the first legal move every turn; the pipeline chains
    // the engine's replies. Bounded so a long game cannot hang the suite.
    for _ in 0..60 {
        let state = pipeline.derive_session_state(&session).unwrap();
        if state.outcome.is_decided() {
            break;
        }
        assert_eq!(
            state.side_to_move,
            Side::White,
            "control must return on the human's turn"
        );

        let moves = rules.legal_moves(&state.position);
        let notation = rules.move_to_notation(&state.position, &moves[0]);
        pipeline
            .apply_player_move(&mut session, Side::White, &notation, &mut rng)
            .unwrap();
    }

    // Whatever happened, the log still replays and the session state is
    // internally consistent.
    let state = pipeline.derive_session_state(&session).unwrap();
    if session.status() == SessionStatus::Finished {
        assert!(session.outcome().is_decided());
        assert_eq!(state.outcome, session.outcome());
    } else {
        assert_eq!(state.outcome, Outcome::Undetermined);
    }
}

#[test]
fn finished_session_serializes_with_outcome() {
    let pipeline = pipeline();
    let mut session = human_vs_human();
    let mut rng = StdRng::seed_from_u64(0);

    pipeline
        .apply_player_move(&mut session, Side::White, "e4", &mut rng)
        .unwrap();
    pipeline.resign(&mut session, Side::White).unwrap();

    let json = serde_json::to_string(&session).unwrap();
    let restored: Session = serde_json::from_str(&json).unwrap();

    assert_eq!(restored.status(), SessionStatus::Finished);
    assert_eq!(restored.outcome(), Outcome::BlackWins);
    assert_eq!(restored.log().len(), 1);

    // The restored log replays identically
    let state = pipeline.derive_session_state(&restored).unwrap();
    assert_eq!(state.side_to_move, Side::Black);
    assert_eq!(state.outcome, Outcome::BlackWins);
}
