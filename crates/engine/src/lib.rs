//! Driver layer - turns action plans into engine calls
//!
//! The board engine only knows single moves. This crate adds the harness
//! vocabulary on top: [`apply_action`] maps one named action to one engine
//! call, [`ActionPlan`] bundles a turn's worth of actions, [`replay`] feeds a
//! plan into an engine, and [`run_session`] loops a [`MoveSource`] until the
//! game ends or a [`CancelToken`] fires.

pub mod action;
pub mod plan;
pub mod replay;
pub mod session;

pub use tetris_harness_core as core;
pub use tetris_harness_types as types;

pub use action::{apply_action, ActionEffect};
pub use plan::{ActionPlan, PlanError};
pub use replay::{replay, ReplayReport};
pub use session::{
    run_session, CancelToken, MoveSource, ScriptedSource, SessionEnd, SessionOptions,
    SessionReport,
};
