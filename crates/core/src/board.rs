//! Board module - manages the game grid
//!
//! A `width x height` grid where each cell is empty or holds the kind of the
//! piece that locked there. Storage is a single row-major buffer allocated
//! once; dimensions never change after construction.
//! Coordinates: (x, y) with x growing right and y growing down from the top-left.

use crate::error::ConfigError;
use crate::rng::SimpleRng;
use crate::types::{Cell, PieceKind, DEFAULT_HEIGHT, DEFAULT_WIDTH, MIN_DIMENSION};

/// Rows kept empty at the top by [`Board::fill_random`].
const GARBAGE_HEADROOM: u8 = 3;

/// The game grid using flat row-major storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Board {
    /// Create a new empty board
    pub fn new(width: u8, height: u8) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
        }
    }

    /// Build a board from text rows, top row first
    ///
    /// `.` is empty, a piece letter (`IJLOSTZ`, any case) fills the cell with
    /// that kind, and `#` fills it with an anonymous block (stored as `Z`).
    /// All rows must share one width.
    pub fn from_rows(rows: &[&str]) -> Result<Self, ConfigError> {
        let height = rows.len();
        let width = rows.first().map(|r| r.chars().count()).unwrap_or(0);
        if width > u8::MAX as usize || height > u8::MAX as usize {
            return Err(ConfigError::InvalidBoard(format!(
                "{width}x{height} exceeds 255 cells per side"
            )));
        }
        check_dimensions(width as u8, height as u8)?;

        let mut board = Self::new(width as u8, height as u8);
        for (y, row) in rows.iter().enumerate() {
            if row.chars().count() != width {
                return Err(ConfigError::InvalidBoard(format!(
                    "row {y} has {} cells, expected {width}",
                    row.chars().count()
                )));
            }
            for (x, ch) in row.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    '#' => Some(PieceKind::Z),
                    other => match PieceKind::from_str(other.encode_utf8(&mut [0; 4])) {
                        Some(kind) => Some(kind),
                        None => {
                            return Err(ConfigError::InvalidBoard(format!(
                                "unexpected {other:?} at ({x}, {y})"
                            )))
                        }
                    },
                };
                board.cells[y * width + x] = cell;
            }
        }
        Ok(board)
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i16, y: i16) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i16, y: i16) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i16, y: i16, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is valid (within bounds and empty)
    pub fn is_valid(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(None))
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i16, y: i16) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, x: i16, y: i16) -> bool {
        x < 0 || x >= self.width as i16 || y < 0 || y >= self.height as i16
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|cell| cell.is_some()))
            .unwrap_or(false)
    }

    /// Borrow one row, or `None` past the bottom.
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height as usize {
            return None;
        }
        let start = y * self.width as usize;
        Some(&self.cells[start..start + self.width as usize])
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(self.width as usize)
    }

    /// Remove every full row and return how many were removed
    ///
    /// Full rows are identified in one scan and the grid is rebuilt once, so
    /// adjacent and non-adjacent full rows are handled alike. Survivors keep
    /// their relative order and settle at the bottom; the vacated top rows
    /// become empty. Two-pointer compaction, no allocation.
    pub fn clear_full_rows(&mut self) -> usize {
        let width = self.width as usize;
        let mut cleared = 0usize;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if self.is_row_full(read_y) {
                cleared += 1;
            } else {
                write_y -= 1;
                if write_y != read_y {
                    let src_start = read_y * width;
                    self.cells
                        .copy_within(src_start..src_start + width, write_y * width);
                }
            }
        }

        self.cells[..write_y * width].fill(None);
        cleared
    }

    /// Lock a piece onto the board at given position with given shape
    /// Returns false (board untouched) if any cell is out of bounds or occupied
    pub fn lock_piece(&mut self, shape: &[(i8, i8)], x: i16, y: i16, kind: PieceKind) -> bool {
        if !shape
            .iter()
            .all(|&(dx, dy)| self.is_valid(x + dx as i16, y + dy as i16))
        {
            return false;
        }

        for &(dx, dy) in shape {
            self.set(x + dx as i16, y + dy as i16, Some(kind));
        }
        true
    }

    /// Number of filled cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Scatter random garbage over the bottom of the board
    ///
    /// Each cell in the bottom `max_height - 1` rows is filled with a random
    /// kind with probability `fill_percent`%. The top three rows are always
    /// left empty so a piece can still spawn.
    pub fn fill_random(&mut self, rng: &mut SimpleRng, fill_percent: u8, max_height: u8) {
        let height = self.height as i16;
        let lowest_top = height - max_height.min(self.height) as i16 + 1;
        let first_row = lowest_top.max(GARBAGE_HEADROOM.min(self.height) as i16);

        for y in (first_row..height).rev() {
            for x in 0..self.width as i16 {
                if rng.next_range(100) < fill_percent as u32 {
                    let kind = PieceKind::ALL[rng.next_range(7) as usize];
                    self.set(x, y, Some(kind));
                }
            }
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }
}

/// Reject boards too small to hold every piece in every orientation.
pub(crate) fn check_dimensions(width: u8, height: u8) -> Result<(), ConfigError> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(ConfigError::BoardTooSmall {
            width,
            height,
            min: MIN_DIMENSION,
        });
    }
    Ok(())
}
