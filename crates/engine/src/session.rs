//! Session driver - feeds plans from a move source into one engine.
//!
//! This is the loop the harness runs: snapshot the engine, ask the move
//! source for a plan, make sure the plan ends with a hard drop, replay it,
//! repeat. It ends on top-out, when the source has nothing more to say,
//! after a turn limit, or when the [`CancelToken`] fires.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tetris_harness_core::{Engine, EngineError, Snapshot};
use tracing::{debug, info};

use crate::plan::ActionPlan;
use crate::replay::{replay, ReplayReport};

/// Anything that can choose moves for a board state.
pub trait MoveSource {
    /// Next plan for `snapshot`, or `None` when the source is done.
    fn next_plan(&mut self, snapshot: &Snapshot) -> Option<ActionPlan>;
}

/// Hands out a fixed list of plans in order.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    plans: VecDeque<ActionPlan>,
}

impl ScriptedSource {
    pub fn new(plans: impl IntoIterator<Item = ActionPlan>) -> Self {
        Self {
            plans: plans.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.plans.len()
    }
}

impl MoveSource for ScriptedSource {
    fn next_plan(&mut self, _snapshot: &Snapshot) -> Option<ActionPlan> {
        self.plans.pop_front()
    }
}

impl<F> MoveSource for F
where
    F: FnMut(&Snapshot) -> Option<ActionPlan>,
{
    fn next_plan(&mut self, snapshot: &Snapshot) -> Option<ActionPlan> {
        self(snapshot)
    }
}

/// Cooperative stop signal shared between a session and its owner.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Stop after this many turns.
    pub max_turns: Option<u32>,
    /// Append a hard drop to plans that lack one.
    pub auto_hard_drop: bool,
}

impl SessionOptions {
    pub fn harness() -> Self {
        Self {
            max_turns: None,
            auto_hard_drop: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    ToppedOut,
    SourceExhausted,
    TurnLimit,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    pub turns: u32,
    pub end: SessionEnd,
    pub totals: ReplayReport,
    pub score: u32,
}

/// Drive `engine` with plans from `source` until the session ends.
pub fn run_session(
    engine: &mut Engine,
    source: &mut dyn MoveSource,
    options: SessionOptions,
    cancel: &CancelToken,
) -> Result<SessionReport, EngineError> {
    if engine.active().is_none() && !engine.is_topped_out() {
        engine.spawn_next()?;
    }

    let mut turns = 0u32;
    let mut totals = ReplayReport::default();

    let end = loop {
        if engine.is_topped_out() {
            break SessionEnd::ToppedOut;
        }
        if cancel.is_cancelled() {
            break SessionEnd::Cancelled;
        }
        if options.max_turns.is_some_and(|max| turns >= max) {
            break SessionEnd::TurnLimit;
        }

        let snapshot = engine.snapshot();
        let Some(mut plan) = source.next_plan(&snapshot) else {
            break SessionEnd::SourceExhausted;
        };
        if options.auto_hard_drop && plan.ensure_hard_drop() {
            debug!(turn = turns + 1, "appended hard_drop to plan");
        }

        turns += 1;
        let report = replay(engine, &plan)?;
        debug!(turn = turns, ?report, "turn replayed");
        totals.merge(&report);
    };

    info!(
        turns,
        ?end,
        lines = totals.lines_cleared,
        score = engine.score(),
        "session finished"
    );

    Ok(SessionReport {
        turns,
        end,
        totals,
        score: engine.score(),
    })
}
