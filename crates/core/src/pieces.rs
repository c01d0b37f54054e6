//! Pieces module - tetromino shapes and kick-based rotation
//!
//! Every kind owns a fixed, ordered list of rotation states. A state is four
//! `(dx, dy)` offsets from the piece anchor with `dy` growing downward.
//! O has one state, I/S/Z have two, J/L/T have four.
//!
//! Rotation tries the rotated shape in place, then one
//! column right, then one column left. There is no SRS kick table.

use crate::error::ConfigError;
use crate::types::{PieceKind, RotateDirection};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Horizontal anchor adjustments tried, in order, when a rotation collides.
pub const KICK_OFFSETS: [i16; 3] = [0, 1, -1];

const I_STATES: [PieceShape; 2] = [
    [(0, 0), (1, 0), (2, 0), (3, 0)],
    [(1, 0), (1, 1), (1, 2), (1, 3)],
];

const J_STATES: [PieceShape; 4] = [
    [(0, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (2, 0), (1, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (2, 2)],
    [(1, 0), (1, 1), (0, 2), (1, 2)],
];

const L_STATES: [PieceShape; 4] = [
    [(2, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (1, 2), (2, 2)],
    [(0, 1), (1, 1), (2, 1), (0, 2)],
    [(0, 0), (1, 0), (1, 1), (1, 2)],
];

const O_STATES: [PieceShape; 1] = [[(0, 0), (1, 0), (0, 1), (1, 1)]];

const S_STATES: [PieceShape; 2] = [
    [(1, 0), (2, 0), (0, 1), (1, 1)],
    [(1, 0), (1, 1), (2, 1), (2, 2)],
];

const T_STATES: [PieceShape; 4] = [
    [(1, 0), (0, 1), (1, 1), (2, 1)],
    [(1, 0), (1, 1), (2, 1), (1, 2)],
    [(0, 1), (1, 1), (2, 1), (1, 2)],
    [(1, 0), (0, 1), (1, 1), (1, 2)],
];

const Z_STATES: [PieceShape; 2] = [
    [(0, 0), (1, 0), (1, 1), (2, 1)],
    [(2, 0), (1, 1), (2, 1), (1, 2)],
];

/// All rotation states of a kind, in rotation order.
pub fn rotation_states(kind: PieceKind) -> &'static [PieceShape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::Z => &Z_STATES,
    }
}

/// Number of distinct rotation states for a kind.
pub fn state_count(kind: PieceKind) -> u8 {
    rotation_states(kind).len() as u8
}

/// Get the shape for a kind and rotation index (taken modulo the state count)
pub fn get_shape(kind: PieceKind, rotation: u8) -> PieceShape {
    let states = rotation_states(kind);
    states[rotation as usize % states.len()]
}

/// Rotation index reached by turning once in `direction`.
pub fn next_rotation(kind: PieceKind, rotation: u8, direction: RotateDirection) -> u8 {
    let count = state_count(kind);
    match direction {
        RotateDirection::Clockwise => (rotation + 1) % count,
        RotateDirection::CounterClockwise => (rotation + count - 1) % count,
    }
}

/// Width of the bounding box of the spawn state.
pub fn spawn_width(kind: PieceKind) -> i16 {
    let shape = get_shape(kind, 0);
    let min = shape.iter().map(|&(dx, _)| dx).min().unwrap_or(0);
    let max = shape.iter().map(|&(dx, _)| dx).max().unwrap_or(0);
    (max - min + 1) as i16
}

/// Try to rotate a piece, kicking one column right then one column left
///
/// `is_valid` answers whether an absolute cell is inside the grid and empty.
/// Returns `Some((new_rotation, new_x))` on success, `None` if every
/// candidate collides (the caller keeps its original rotation and anchor).
pub fn try_rotate(
    kind: PieceKind,
    rotation: u8,
    x: i16,
    y: i16,
    direction: RotateDirection,
    is_valid: impl Fn(i16, i16) -> bool,
) -> Option<(u8, i16)> {
    let new_rotation = next_rotation(kind, rotation, direction);
    let shape = get_shape(kind, new_rotation);

    KICK_OFFSETS.iter().find_map(|&kick| {
        let new_x = x + kick;
        let fits = shape
            .iter()
            .all(|&(dx, dy)| is_valid(new_x + dx as i16, y + dy as i16));
        fits.then_some((new_rotation, new_x))
    })
}

/// Check the static shape table
///
/// Runs once per engine construction.
pub fn validate_shape_table() -> Result<(), ConfigError> {
    for kind in PieceKind::ALL {
        let states = rotation_states(kind);
        if !matches!(states.len(), 1 | 2 | 4) {
            return Err(ConfigError::MalformedShape {
                kind,
                reason: "state count must be 1, 2 or 4",
            });
        }

        for shape in states {
            if shape.iter().any(|&(dx, dy)| dx < 0 || dy < 0) {
                return Err(ConfigError::MalformedShape {
                    kind,
                    reason: "offsets must be non-negative",
                });
            }
            for (i, a) in shape.iter().enumerate() {
                if shape[i + 1..].contains(a) {
                    return Err(ConfigError::MalformedShape {
                        kind,
                        reason: "duplicate cell in rotation state",
                    });
                }
            }
        }

        if states[0].iter().all(|&(_, dy)| dy != 0) {
            return Err(ConfigError::MalformedShape {
                kind,
                reason: "spawn state must touch the anchor row",
            });
        }
    }
    Ok(())
}
