//! Error types for the board engine.
//!
//! Refused moves are not errors: `try_move`/`try_rotate` report them as
//! `Ok(false)`. What remains here is the terminal state, calls made in the
//! wrong lifecycle phase, and fatal construction problems.

use crate::types::PieceKind;

/// Failures returned by engine operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    /// A spawn failed earlier; the session accepts no more mutations.
    #[error("session has topped out")]
    ToppedOut,
    /// Nothing has been spawned yet.
    #[error("no active piece")]
    NoActivePiece,
    /// `spawn_next` while the previous piece has not locked.
    #[error("a piece is already in play")]
    PieceInPlay,
}

impl EngineError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            EngineError::ToppedOut => "topped_out",
            EngineError::NoActivePiece => "no_active_piece",
            EngineError::PieceInPlay => "piece_in_play",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, EngineError::ToppedOut)
    }
}

/// Fatal problems detected before a session starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("board must be at least {min}x{min}, got {width}x{height}")]
    BoardTooSmall { width: u8, height: u8, min: u8 },
    #[error("shape table for {kind:?} is malformed: {reason}")]
    MalformedShape {
        kind: PieceKind,
        reason: &'static str,
    },
    #[error("fixed piece sequence must not be empty")]
    EmptySequence,
    #[error("invalid board layout: {0}")]
    InvalidBoard(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        "invalid_config"
    }
}
