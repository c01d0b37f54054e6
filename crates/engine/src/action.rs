//! Mapping from the action vocabulary to engine calls.

use tetris_harness_core::{Engine, EngineError, HardDrop};
use tetris_harness_types::{Action, Direction, RotateDirection};

/// What one applied action did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    /// The piece moved or rotated.
    Moved,
    /// The request collided; state unchanged.
    Blocked,
    /// Hard drop finished and the piece locked.
    Dropped(HardDrop),
}

impl ActionEffect {
    pub fn is_blocked(&self) -> bool {
        matches!(self, ActionEffect::Blocked)
    }
}

/// Apply one action to the engine
///
/// | action | engine call |
/// |---|---|
/// | `left` / `right` | `try_move` |
/// | `rotate` | `try_rotate(Clockwise)` |
/// | `soft_drop` | `try_move(Down)`, never locks |
/// | `hard_drop` | `hard_drop` |
pub fn apply_action(engine: &mut Engine, action: Action) -> Result<ActionEffect, EngineError> {
    let moved = match action {
        Action::Left => engine.try_move(Direction::Left)?,
        Action::Right => engine.try_move(Direction::Right)?,
        Action::Rotate => engine.try_rotate(RotateDirection::Clockwise)?,
        Action::SoftDrop => engine.try_move(Direction::Down)?,
        Action::HardDrop => return engine.hard_drop().map(ActionEffect::Dropped),
    };
    Ok(if moved {
        ActionEffect::Moved
    } else {
        ActionEffect::Blocked
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tetris_harness_core::{EngineConfig, SequenceRandomizer};
    use tetris_harness_types::PieceKind;

    fn engine_with(kind: PieceKind) -> Engine {
        let seq = SequenceRandomizer::new(vec![kind]).unwrap();
        let mut engine = Engine::with_randomizer(EngineConfig::default(), Box::new(seq)).unwrap();
        engine.spawn_next().unwrap();
        engine
    }

    #[test]
    fn soft_drop_steps_one_row() {
        let mut engine = engine_with(PieceKind::T);
        assert_eq!(
            apply_action(&mut engine, Action::SoftDrop),
            Ok(ActionEffect::Moved)
        );
        assert_eq!(engine.active().unwrap().y, 1);
        assert_eq!(engine.pieces_locked(), 0);
    }

    #[test]
    fn wall_blocks_horizontal_moves() {
        let mut engine = engine_with(PieceKind::O);
        for _ in 0..4 {
            assert_eq!(apply_action(&mut engine, Action::Left), Ok(ActionEffect::Moved));
        }
        assert_eq!(
            apply_action(&mut engine, Action::Left),
            Ok(ActionEffect::Blocked)
        );
    }

    #[test]
    fn rotate_is_clockwise() {
        let mut engine = engine_with(PieceKind::T);
        apply_action(&mut engine, Action::Rotate).unwrap();
        assert_eq!(engine.active().unwrap().rotation, 1);
    }

    #[test]
    fn hard_drop_reports_rows_and_lock() {
        let mut engine = engine_with(PieceKind::I);
        match apply_action(&mut engine, Action::HardDrop).unwrap() {
            ActionEffect::Dropped(drop) => {
                assert_eq!(drop.rows, 19);
                assert!(drop.lock.spawned);
            }
            other => panic!("unexpected effect {other:?}"),
        }
    }
}
