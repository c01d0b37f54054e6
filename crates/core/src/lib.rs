//! Board simulation engine - pure, deterministic, and testable
//!
//! This crate owns every Tetris rule the harness enforces: the grid, the
//! seven tetromino rotation tables, collision checks, the simple
//! right-then-left rotation kick, locking, line clearing and piece
//! sequencing. It does no I/O and never logs; drivers and the network
//! adapter sit on top of it.
//!
//! # Example
//!
//! ```
//! use tetris_harness_core::{Engine, EngineConfig};
//! use tetris_harness_types::{Direction, RotateDirection};
//!
//! let mut engine = Engine::new(EngineConfig::default().with_seed(42)).unwrap();
//! assert!(engine.spawn_next().unwrap());
//!
//! engine.try_move(Direction::Left).unwrap();
//! engine.try_rotate(RotateDirection::Clockwise).unwrap();
//! let drop = engine.hard_drop().unwrap();
//!
//! assert_eq!(engine.snapshot().pieces_locked, 1);
//! assert!(drop.rows > 0);
//! ```

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use tetris_harness_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use config::EngineConfig;
pub use engine::{ActivePiece, Engine, Gravity, HardDrop, LockResult};
pub use error::{ConfigError, EngineError};
pub use pieces::{get_shape, state_count, try_rotate};
pub use rng::{
    build_randomizer, BagRandomizer, Randomizer, SequenceRandomizer, SimpleRng,
    UniformRandomizer,
};
pub use scoring::{calculate_line_score, level_for_lines, ScoreResult};
pub use snapshot::{ActiveSnapshot, Snapshot};
