//! Core types module - shared data structures and constants
//!
//! Pure data shared by the board engine, the replay driver and the JSON adapter.
//! Nothing here depends on other crates, so the same vocabulary can be used
//! from any context.
//!
//! # Board Dimensions
//!
//! The classic playfield is 10 columns by 20 rows, origin at the top-left,
//! row index growing downward. Engines may be configured with other sizes;
//! [`DEFAULT_WIDTH`] and [`DEFAULT_HEIGHT`] are only the defaults.
//!
//! # Examples
//!
//! ```
//! use tetris_harness_types::{Action, PieceKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.color_index(), 6);
//!
//! // Key-name aliases resolve to the same action.
//! assert_eq!(Action::from_str("space"), Some(Action::HardDrop));
//! assert_eq!(Action::from_str("hard_drop"), Some(Action::HardDrop));
//!
//! assert_eq!(DEFAULT_WIDTH, 10);
//! assert_eq!(DEFAULT_HEIGHT, 20);
//! ```

/// Default board width in cells
pub const DEFAULT_WIDTH: u8 = 10;

/// Default board height in cells
pub const DEFAULT_HEIGHT: u8 = 20;

/// Smallest accepted board dimension (an I piece must fit either way).
pub const MIN_DIMENSION: u8 = 4;

/// Maximum number of actions a single plan may carry.
pub const MAX_PLAN_ACTIONS: usize = 32;

/// The seven tetromino piece kinds
///
/// Declaration order matches the palette used on the wire:
/// I=1, J=2, L=3, O=4, S=5, T=6, Z=7 (0 is an empty cell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in palette order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_harness_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }

    /// Uppercase letter used in text renderings.
    pub fn letter(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
            PieceKind::O => 'O',
            PieceKind::S => 'S',
            PieceKind::T => 'T',
            PieceKind::Z => 'Z',
        }
    }

    /// Palette index written into serialized grids (1..=7).
    pub fn color_index(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::J => 2,
            PieceKind::L => 3,
            PieceKind::O => 4,
            PieceKind::S => 5,
            PieceKind::T => 6,
            PieceKind::Z => 7,
        }
    }

    /// Inverse of [`PieceKind::color_index`].
    pub fn from_color_index(index: u8) -> Option<Self> {
        match index {
            1..=7 => Some(Self::ALL[(index - 1) as usize]),
            _ => None,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled by a locked piece of that kind
pub type Cell = Option<PieceKind>;

/// Translation requested by `try_move`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Down,
}

impl Direction {
    /// Anchor offset `(dx, dy)` for this direction.
    pub fn offset(&self) -> (i16, i16) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }
}

/// Rotation sense for `try_rotate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

impl RotateDirection {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cw" | "clockwise" => Some(RotateDirection::Clockwise),
            "ccw" | "counterclockwise" | "counter_clockwise" => {
                Some(RotateDirection::CounterClockwise)
            }
            _ => None,
        }
    }
}

/// Discrete actions a move selector may request
///
/// This is the stable vocabulary between a driver and the engine. Each action
/// maps to exactly one engine call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Shift one column left
    Left,
    /// Shift one column right
    Right,
    /// Rotate clockwise, with kicks
    Rotate,
    /// Step one row down; never locks
    SoftDrop,
    /// Drop to the floor and lock
    HardDrop,
}

impl Action {
    /// Parse an action name (case-insensitive)
    ///
    /// Besides the canonical names, the key names a model tends to emit are
    /// accepted: `up` rotates, `down` soft-drops, `space`/`drop` hard-drop.
    ///
    /// # Examples
    ///
    /// ```
    /// use tetris_harness_types::Action;
    ///
    /// assert_eq!(Action::from_str("LEFT"), Some(Action::Left));
    /// assert_eq!(Action::from_str("up"), Some(Action::Rotate));
    /// assert_eq!(Action::from_str("down"), Some(Action::SoftDrop));
    /// assert_eq!(Action::from_str("hold"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "left" => Some(Action::Left),
            "right" => Some(Action::Right),
            "rotate" | "up" => Some(Action::Rotate),
            "soft_drop" | "softdrop" | "down" => Some(Action::SoftDrop),
            "hard_drop" | "harddrop" | "drop" | "space" => Some(Action::HardDrop),
            _ => None,
        }
    }

    /// Canonical snake_case name
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Rotate => "rotate",
            Action::SoftDrop => "soft_drop",
            Action::HardDrop => "hard_drop",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Piece sequencing strategy selector (used by configuration).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RandomizerKind {
    /// Independent uniform choice per spawn
    #[default]
    Uniform,
    /// Shuffled 7-bag
    Bag,
}

impl RandomizerKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "uniform" | "random" => Some(RandomizerKind::Uniform),
            "bag" | "7bag" | "bag7" => Some(RandomizerKind::Bag),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RandomizerKind::Uniform => "uniform",
            RandomizerKind::Bag => "bag",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_index_roundtrips_through_palette() {
        for (i, kind) in PieceKind::ALL.iter().enumerate() {
            assert_eq!(kind.color_index() as usize, i + 1);
            assert_eq!(PieceKind::from_color_index(kind.color_index()), Some(*kind));
        }
        assert_eq!(PieceKind::from_color_index(0), None);
        assert_eq!(PieceKind::from_color_index(8), None);
    }

    #[test]
    fn action_names_are_stable() {
        for action in [
            Action::Left,
            Action::Right,
            Action::Rotate,
            Action::SoftDrop,
            Action::HardDrop,
        ] {
            assert_eq!(Action::from_str(action.as_str()), Some(action));
        }
        assert_eq!(Action::from_str(" Space "), Some(Action::HardDrop));
    }

    #[test]
    fn direction_offsets() {
        assert_eq!(Direction::Left.offset(), (-1, 0));
        assert_eq!(Direction::Right.offset(), (1, 0));
        assert_eq!(Direction::Down.offset(), (0, 1));
    }

    #[test]
    fn randomizer_kind_parses_aliases() {
        assert_eq!(RandomizerKind::from_str("BAG"), Some(RandomizerKind::Bag));
        assert_eq!(RandomizerKind::from_str("random"), Some(RandomizerKind::Uniform));
        assert_eq!(RandomizerKind::from_str("weird"), None);
        assert_eq!(RandomizerKind::default(), RandomizerKind::Uniform);
    }
}
