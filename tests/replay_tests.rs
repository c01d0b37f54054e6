//! Driver tests - plans, replay and the session loop

use tetris_harness::core::{Engine, EngineConfig, EngineError, SequenceRandomizer, Snapshot};
use tetris_harness::engine::{
    replay, run_session, ActionPlan, CancelToken, PlanError, ScriptedSource, SessionEnd,
    SessionOptions,
};
use tetris_harness::types::{Action, PieceKind, MAX_PLAN_ACTIONS};

fn engine_with(kinds: &[PieceKind]) -> Engine {
    let seq = SequenceRandomizer::new(kinds.to_vec()).unwrap();
    let mut engine = Engine::with_randomizer(EngineConfig::default(), Box::new(seq)).unwrap();
    engine.spawn_next().unwrap();
    engine
}

#[test]
fn test_plan_parses_key_aliases() {
    let plan = ActionPlan::parse(["up", "LEFT", "down", "space"]).unwrap();
    assert_eq!(
        plan.as_slice(),
        [Action::Rotate, Action::Left, Action::SoftDrop, Action::HardDrop]
    );

    assert_eq!(
        ActionPlan::parse(["left", "hold"]),
        Err(PlanError::UnknownAction("hold".to_string()))
    );
    let too_many = vec!["left"; MAX_PLAN_ACTIONS + 1];
    assert_eq!(ActionPlan::parse(too_many), Err(PlanError::TooManyActions));
}

#[test]
fn test_plan_without_hard_drop_gets_one() {
    let mut plan = ActionPlan::parse(["left", "rotate"]).unwrap();
    assert!(plan.ensure_hard_drop());
    assert_eq!(plan.as_slice().last(), Some(&Action::HardDrop));
    assert_eq!(plan.len(), 3);

    // Already terminated plans are left alone.
    assert!(!plan.ensure_hard_drop());
    assert_eq!(plan.len(), 3);
}

#[test]
fn test_replay_o_piece_scenario() {
    let mut engine = engine_with(&[PieceKind::O]);
    let plan = ActionPlan::parse(["left"; 6].into_iter().chain(["hard_drop"])).unwrap();

    let report = replay(&mut engine, &plan).unwrap();
    assert_eq!(report.applied, 5);
    assert_eq!(report.blocked, 2);
    assert_eq!(report.locks, 1);
    assert_eq!(report.rows_dropped, 18);
    assert!(!report.topped_out);

    let snap = engine.snapshot();
    for (x, y) in [(0, 18), (1, 18), (0, 19), (1, 19)] {
        assert_eq!(snap.cell(x, y), Some(PieceKind::O.color_index()));
    }
}

#[test]
fn test_replay_stops_at_top_out() {
    let mut engine = engine_with(&[PieceKind::O]);
    let plan = ActionPlan::parse(["hard_drop"; 12]).unwrap();

    let report = replay(&mut engine, &plan).unwrap();
    assert_eq!(report.locks, 10);
    assert!(report.topped_out);
    assert!(engine.is_topped_out());

    // A plan against a finished session is refused outright.
    assert_eq!(replay(&mut engine, &plan), Err(EngineError::ToppedOut));
}

#[test]
fn test_session_runs_script_to_exhaustion() {
    let mut engine = engine_with(&[PieceKind::O, PieceKind::I]);
    let plans = [
        ActionPlan::parse(["left", "left", "left", "left"]).unwrap(),
        ActionPlan::parse(["right", "right", "right", "hard_drop"]).unwrap(),
    ];
    let mut source = ScriptedSource::new(plans);

    let report = run_session(
        &mut engine,
        &mut source,
        SessionOptions::harness(),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(report.turns, 2);
    assert_eq!(report.end, SessionEnd::SourceExhausted);
    assert_eq!(report.totals.locks, 2);
    assert_eq!(engine.pieces_locked(), 2);
}

#[test]
fn test_session_plays_until_top_out() {
    let mut engine = engine_with(&[PieceKind::O]);
    // Drop every piece where it spawns.
    let mut source = |_: &Snapshot| Some(ActionPlan::new());

    let report = run_session(
        &mut engine,
        &mut source,
        SessionOptions::harness(),
        &CancelToken::new(),
    )
    .unwrap();

    assert_eq!(report.end, SessionEnd::ToppedOut);
    assert_eq!(report.turns, 10);
    assert!(report.totals.topped_out);
}

#[test]
fn test_session_turn_limit_and_cancel() {
    let mut engine = engine_with(&[PieceKind::T]);
    let mut source = |_: &Snapshot| Some(ActionPlan::parse(["rotate"]).unwrap());
    let options = SessionOptions {
        max_turns: Some(3),
        auto_hard_drop: false,
    };

    let report = run_session(&mut engine, &mut source, options, &CancelToken::new()).unwrap();
    assert_eq!(report.end, SessionEnd::TurnLimit);
    assert_eq!(report.turns, 3);
    assert_eq!(engine.pieces_locked(), 0);

    let cancel = CancelToken::new();
    cancel.cancel();
    let report = run_session(&mut engine, &mut source, options, &cancel).unwrap();
    assert_eq!(report.end, SessionEnd::Cancelled);
    assert_eq!(report.turns, 0);
}
