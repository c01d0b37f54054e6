//! Tetris harness (workspace facade crate).
//!
//! Re-exports the workspace crates under one name so integration tests and
//! embedders can write `tetris_harness::{core,engine,adapter,types}`.

pub use tetris_harness_adapter as adapter;
pub use tetris_harness_core as core;
pub use tetris_harness_engine as engine;
pub use tetris_harness_types as types;
