//! Snapshot module - detached copies of engine state
//!
//! A [`Snapshot`] owns its grid, so it stays valid after the engine moves on.
//! Cells are palette indices: 0 is empty, otherwise the piece colour.

use crate::engine::ActivePiece;
use crate::types::PieceKind;

/// Owned view of the falling piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: u8,
    pub x: i16,
    pub y: i16,
    /// Absolute grid cells covered by the piece.
    pub cells: [(i16, i16); 4],
}

impl From<ActivePiece> for ActiveSnapshot {
    fn from(value: ActivePiece) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
            cells: value.cells(),
        }
    }
}

/// Immutable copy of an engine session
///
/// Later engine mutations never show through a snapshot. `grid` is row-major
/// palette indices: 0 empty, 1..=7 per [`PieceKind::color_index`]. The active
/// piece is not written into the grid.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Snapshot {
    pub width: u8,
    pub height: u8,
    pub grid: Vec<u8>,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i16>,
    pub next: PieceKind,
    pub topped_out: bool,
    pub score: u32,
    pub lines_cleared: u32,
    pub level: u32,
    pub pieces_locked: u32,
}

impl Snapshot {
    /// Palette index at (x, y), `None` out of bounds.
    pub fn cell(&self, x: i16, y: i16) -> Option<u8> {
        if x < 0 || y < 0 || x >= self.width as i16 || y >= self.height as i16 {
            return None;
        }
        Some(self.grid[y as usize * self.width as usize + x as usize])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        self.grid.chunks(self.width as usize)
    }

    pub fn occupied_count(&self) -> usize {
        self.grid.iter().filter(|&&c| c != 0).count()
    }

    /// Whether the session can still take moves.
    pub fn playable(&self) -> bool {
        !self.topped_out && self.active.is_some()
    }

    /// Plain-text picture of the board
    ///
    /// Locked cells print as their kind letter, the active piece as `@`,
    /// empty cells as `.`. One line per row, top first.
    pub fn render_text(&self) -> String {
        let width = self.width as usize;
        let mut out = String::with_capacity((width + 1) * self.height as usize);
        for (y, row) in self.rows().enumerate() {
            for (x, &c) in row.iter().enumerate() {
                let is_active = self
                    .active
                    .map(|a| a.cells.contains(&(x as i16, y as i16)))
                    .unwrap_or(false);
                let ch = if is_active {
                    '@'
                } else {
                    PieceKind::from_color_index(c).map_or('.', |kind| kind.letter())
                };
                out.push(ch);
            }
            out.push('\n');
        }
        out
    }
}
