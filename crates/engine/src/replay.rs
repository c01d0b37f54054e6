//! Replay an action plan into an engine, one action at a time.

use tetris_harness_core::{Engine, EngineError};
use tracing::debug;

use crate::action::{apply_action, ActionEffect};
use crate::plan::ActionPlan;

/// Tally of one replayed plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayReport {
    /// Actions that changed the state (including hard drops).
    pub applied: u32,
    /// Actions refused by a collision.
    pub blocked: u32,
    pub locks: u32,
    pub lines_cleared: u32,
    /// Rows descended by hard drops.
    pub rows_dropped: u32,
    /// The session ended during this plan; later actions were skipped.
    pub topped_out: bool,
}

impl ReplayReport {
    pub fn merge(&mut self, other: &ReplayReport) {
        self.applied += other.applied;
        self.blocked += other.blocked;
        self.locks += other.locks;
        self.lines_cleared += other.lines_cleared;
        self.rows_dropped += other.rows_dropped;
        self.topped_out |= other.topped_out;
    }
}

/// Apply every action of `plan` in order
///
/// Blocked actions are counted and skipped. Replay stops at the first lock
/// that tops the session out. Errors are only returned for calls the engine
/// refuses outright (topped out before the plan started, nothing spawned).
pub fn replay(engine: &mut Engine, plan: &ActionPlan) -> Result<ReplayReport, EngineError> {
    let mut report = ReplayReport::default();

    for action in plan.iter() {
        let effect = apply_action(engine, action)?;
        debug!(action = %action, ?effect, "applied action");

        match effect {
            ActionEffect::Moved => report.applied += 1,
            ActionEffect::Blocked => report.blocked += 1,
            ActionEffect::Dropped(drop) => {
                report.applied += 1;
                report.locks += 1;
                report.rows_dropped += drop.rows;
                report.lines_cleared += drop.lock.lines_cleared;
                if !drop.lock.spawned {
                    report.topped_out = true;
                    break;
                }
            }
        }
    }

    Ok(report)
}
