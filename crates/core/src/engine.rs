//! Engine module - one rule-enforcing Tetris session
//!
//! Ties the board, the shape table and a piece randomizer together. Every
//! operation is synchronous and atomic from the caller's point of view: it
//! either commits a valid new state or leaves the state untouched.
//!
//! Lifecycle: `Engine::new` builds an empty grid and draws the preview piece;
//! the driver calls [`Engine::spawn_next`] once to bring the first piece into
//! play; locking spawns the following ones. A spawn that does not fit tops the
//! session out, after which every mutating call returns
//! [`EngineError::ToppedOut`] and the state is frozen.

use crate::board::{check_dimensions, Board};
use crate::config::EngineConfig;
use crate::error::{ConfigError, EngineError};
use crate::pieces::{get_shape, spawn_width, try_rotate, validate_shape_table, PieceShape};
use crate::rng::{build_randomizer, Randomizer};
use crate::scoring::score_clear;
use crate::snapshot::{ActiveSnapshot, Snapshot};
use crate::types::{Direction, PieceKind, RotateDirection};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i16,
    pub y: i16,
}

impl ActivePiece {
    /// Place a new piece at the spawn anchor of a board `board_width` wide
    ///
    /// The anchor is horizontally centred on the spawn state's bounding box
    /// and sits on the top row, so the whole piece is visible.
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        Self {
            kind,
            rotation: 0,
            x: board_width as i16 / 2 - spawn_width(kind) / 2,
            y: 0,
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute grid cells covered by the piece.
    pub fn cells(&self) -> [(i16, i16); 4] {
        self.shape()
            .map(|(dx, dy)| (self.x + dx as i16, self.y + dy as i16))
    }

    /// Check if all minos are at valid positions on the board
    pub fn fits(&self, board: &Board) -> bool {
        self.cells().iter().all(|&(x, y)| board.is_valid(x, y))
    }

    fn shifted(self, dx: i16, dy: i16) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Outcome of [`Engine::lock`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockResult {
    pub lines_cleared: u32,
    /// False when the follow-up spawn topped the session out.
    pub spawned: bool,
}

/// Outcome of [`Engine::hard_drop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardDrop {
    /// Rows descended before locking.
    pub rows: u32,
    pub lock: LockResult,
}

/// Outcome of one [`Engine::step_gravity`] tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gravity {
    Fell,
    Locked(LockResult),
}

/// Complete session state
#[derive(Debug)]
pub struct Engine {
    board: Board,
    active: Option<ActivePiece>,
    next: PieceKind,
    randomizer: Box<dyn Randomizer>,
    topped_out: bool,
    score: u32,
    lines_cleared: u32,
    level: u32,
    pieces_locked: u32,
}

impl Engine {
    /// Create a session with an empty grid
    ///
    /// Fails with a [`ConfigError`] before any state exists if the dimensions
    /// or the shape table are unusable.
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let randomizer = build_randomizer(config.randomizer, config.seed);
        Self::with_board(Board::new(config.width, config.height), randomizer)
    }

    /// Create a session with an empty grid and a caller-supplied sequencer.
    pub fn with_randomizer(
        config: EngineConfig,
        randomizer: Box<dyn Randomizer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Self::with_board(Board::new(config.width, config.height), randomizer)
    }

    /// Start from a preset grid (scripted positions, garbage boards).
    pub fn with_board(
        board: Board,
        mut randomizer: Box<dyn Randomizer>,
    ) -> Result<Self, ConfigError> {
        check_dimensions(board.width(), board.height())?;
        validate_shape_table()?;

        let next = randomizer.next_kind();
        Ok(Self {
            board,
            active: None,
            next,
            randomizer,
            topped_out: false,
            score: 0,
            lines_cleared: 0,
            level: 1,
            pieces_locked: 0,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn is_topped_out(&self) -> bool {
        self.topped_out
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines_cleared(&self) -> u32 {
        self.lines_cleared
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    fn require_active(&self) -> Result<ActivePiece, EngineError> {
        if self.topped_out {
            return Err(EngineError::ToppedOut);
        }
        self.active.ok_or(EngineError::NoActivePiece)
    }

    /// Promote the preview piece into play
    ///
    /// Draws a fresh preview either way. Returns `Ok(false)` and enters the
    /// terminal state when the new piece does not fit at the spawn anchor.
    pub fn spawn_next(&mut self) -> Result<bool, EngineError> {
        if self.topped_out {
            return Err(EngineError::ToppedOut);
        }
        if self.active.is_some() {
            return Err(EngineError::PieceInPlay);
        }

        let kind = self.next;
        self.next = self.randomizer.next_kind();

        let piece = ActivePiece::spawn(kind, self.board.width());
        if !piece.fits(&self.board) {
            self.topped_out = true;
            return Ok(false);
        }
        self.active = Some(piece);
        Ok(true)
    }

    /// Shift the active piece one cell
    ///
    /// `Ok(false)` means the target collides and nothing changed; for
    /// `Direction::Down` that is the landing signal. Locking is separate.
    pub fn try_move(&mut self, direction: Direction) -> Result<bool, EngineError> {
        let active = self.require_active()?;
        let (dx, dy) = direction.offset();
        let candidate = active.shifted(dx, dy);
        if !candidate.fits(&self.board) {
            return Ok(false);
        }
        self.active = Some(candidate);
        Ok(true)
    }

    /// Rotate with the in-place, right, left kick order
    ///
    /// On failure the rotation index and anchor are left as they were.
    pub fn try_rotate(&mut self, direction: RotateDirection) -> Result<bool, EngineError> {
        let active = self.require_active()?;
        let board = &self.board;
        let rotated = try_rotate(
            active.kind,
            active.rotation,
            active.x,
            active.y,
            direction,
            |x, y| board.is_valid(x, y),
        );

        match rotated {
            Some((rotation, x)) => {
                self.active = Some(ActivePiece {
                    rotation,
                    x,
                    ..active
                });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Drop the active piece as far as it goes, then lock it.
    pub fn hard_drop(&mut self) -> Result<HardDrop, EngineError> {
        let mut rows = 0u32;
        while self.try_move(Direction::Down)? {
            rows += 1;
        }
        let lock = self.lock()?;
        Ok(HardDrop { rows, lock })
    }

    /// Commit the active piece to the grid, clear rows, spawn the next piece
    pub fn lock(&mut self) -> Result<LockResult, EngineError> {
        let active = self.require_active()?;
        // Every committed placement is valid, so this cannot be refused.
        let written = self
            .board
            .lock_piece(&active.shape(), active.x, active.y, active.kind);
        debug_assert!(written, "active piece overlapped the grid");
        self.active = None;
        self.pieces_locked = self.pieces_locked.saturating_add(1);

        let lines_cleared = self.board.clear_full_rows() as u32;
        if lines_cleared > 0 {
            let result = score_clear(lines_cleared, self.lines_cleared);
            self.score = self.score.saturating_add(result.points);
            self.lines_cleared += lines_cleared;
            self.level = result.level;
        }

        let spawned = self.spawn_next()?;
        Ok(LockResult {
            lines_cleared,
            spawned,
        })
    }

    /// Remove all full rows at once and return how many there were.
    ///
    /// Locking already does this; the public entry point is for preset grids
    /// that start with full rows. Not scored.
    pub fn clear_lines(&mut self) -> Result<u32, EngineError> {
        if self.topped_out {
            return Err(EngineError::ToppedOut);
        }
        Ok(self.board.clear_full_rows() as u32)
    }

    /// One gravity tick: fall a row, or lock if already resting.
    pub fn step_gravity(&mut self) -> Result<Gravity, EngineError> {
        if self.try_move(Direction::Down)? {
            Ok(Gravity::Fell)
        } else {
            self.lock().map(Gravity::Locked)
        }
    }

    /// Anchor row the active piece would land on.
    pub fn ghost_y(&self) -> Option<i16> {
        let active = self.active?;
        let mut landed = active;
        loop {
            let below = landed.shifted(0, 1);
            if !below.fits(&self.board) {
                return Some(landed.y);
            }
            landed = below;
        }
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            width: self.board.width(),
            height: self.board.height(),
            grid: self
                .board
                .cells()
                .iter()
                .map(|cell| cell.map(|k| k.color_index()).unwrap_or(0))
                .collect(),
            active: self.active.map(ActiveSnapshot::from),
            ghost_y: self.ghost_y(),
            next: self.next,
            topped_out: self.topped_out,
            score: self.score,
            lines_cleared: self.lines_cleared,
            level: self.level,
            pieces_locked: self.pieces_locked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceRandomizer;

    fn scripted(kinds: &[PieceKind]) -> Engine {
        let seq = SequenceRandomizer::new(kinds.to_vec()).unwrap();
        Engine::with_randomizer(EngineConfig::default(), Box::new(seq)).unwrap()
    }

    #[test]
    fn new_engine_has_preview_but_no_active_piece() {
        let engine = scripted(&[PieceKind::T]);
        assert_eq!(engine.next(), PieceKind::T);
        assert!(engine.active().is_none());
        assert!(!engine.is_topped_out());
        assert_eq!(engine.level(), 1);
    }

    #[test]
    fn spawn_centres_each_kind() {
        let cases = [
            (PieceKind::I, 3),
            (PieceKind::O, 4),
            (PieceKind::T, 4),
            (PieceKind::J, 4),
        ];
        for (kind, x) in cases {
            let piece = ActivePiece::spawn(kind, 10);
            assert_eq!((piece.x, piece.y, piece.rotation), (x, 0, 0), "{kind:?}");
        }
    }

    #[test]
    fn spawn_promotes_preview_and_draws_new_one() {
        let mut engine = scripted(&[PieceKind::S, PieceKind::Z]);
        assert!(engine.spawn_next().unwrap());
        assert_eq!(engine.active().unwrap().kind, PieceKind::S);
        assert_eq!(engine.next(), PieceKind::Z);
    }

    #[test]
    fn spawn_while_active_is_rejected() {
        let mut engine = scripted(&[PieceKind::T]);
        engine.spawn_next().unwrap();
        let before = engine.snapshot();
        assert_eq!(engine.spawn_next(), Err(EngineError::PieceInPlay));
        assert_eq!(engine.snapshot(), before);
    }

    #[test]
    fn operations_before_first_spawn_fail_cleanly() {
        let mut engine = scripted(&[PieceKind::T]);
        assert_eq!(
            engine.try_move(Direction::Left),
            Err(EngineError::NoActivePiece)
        );
        assert_eq!(
            engine.try_rotate(RotateDirection::Clockwise),
            Err(EngineError::NoActivePiece)
        );
        assert_eq!(engine.lock(), Err(EngineError::NoActivePiece));
        assert!(engine.ghost_y().is_none());
    }

    #[test]
    fn soft_drop_failure_does_not_lock() {
        let mut engine = scripted(&[PieceKind::O]);
        engine.spawn_next().unwrap();
        while engine.try_move(Direction::Down).unwrap() {}
        assert!(!engine.try_move(Direction::Down).unwrap());
        assert_eq!(engine.board().occupied_count(), 0);
        assert_eq!(engine.active().unwrap().y, 18);
    }

    #[test]
    fn gravity_locks_once_resting() {
        let mut engine = scripted(&[PieceKind::O]);
        engine.spawn_next().unwrap();
        let mut ticks = 0;
        let result = loop {
            ticks += 1;
            match engine.step_gravity().unwrap() {
                Gravity::Fell => continue,
                Gravity::Locked(r) => break r,
            }
        };
        assert_eq!(ticks, 19);
        assert!(result.spawned);
        assert_eq!(engine.board().occupied_count(), 4);
        assert_eq!(engine.pieces_locked(), 1);
    }

    #[test]
    fn ghost_matches_hard_drop_landing() {
        let mut engine = scripted(&[PieceKind::T]);
        engine.spawn_next().unwrap();
        assert_eq!(engine.ghost_y(), Some(18));
        let drop = engine.hard_drop().unwrap();
        assert_eq!(drop.rows, 18);
    }

    #[test]
    fn scoring_follows_lines_and_level() {
        let board = Board::from_rows(&[
            "..........",
            "..........",
            "..........",
            "..........",
            "####.#####",
            "####.#####",
            "####.#####",
            "####.#####",
        ])
        .unwrap();
        let seq = SequenceRandomizer::new(vec![PieceKind::I]).unwrap();
        let mut engine = Engine::with_board(board, Box::new(seq)).unwrap();
        engine.spawn_next().unwrap();
        engine.try_rotate(RotateDirection::Clockwise).unwrap();
        // Vertical I occupies column x+1; spawn x is 3, so column 4 needs x=3.
        assert_eq!(engine.active().unwrap().x, 3);

        let drop = engine.hard_drop().unwrap();
        assert_eq!(drop.lock.lines_cleared, 4);
        assert_eq!(engine.score(), 400);
        assert_eq!(engine.lines_cleared(), 4);
        assert_eq!(engine.board().occupied_count(), 0);
    }
}
