//! Action plans - one move-source turn worth of actions.

use arrayvec::ArrayVec;
use tetris_harness_types::{Action, MAX_PLAN_ACTIONS};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PlanError {
    #[error("unknown action {0:?}")]
    UnknownAction(String),
    #[error("too many actions (max {MAX_PLAN_ACTIONS})")]
    TooManyActions,
}

impl PlanError {
    pub fn code(&self) -> &'static str {
        match self {
            PlanError::UnknownAction(_) => "unknown_action",
            PlanError::TooManyActions => "too_many_actions",
        }
    }
}

/// Bounded, ordered list of actions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionPlan(ArrayVec<Action, MAX_PLAN_ACTIONS>);

impl ActionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse action names, accepting the key-name aliases.
    pub fn parse<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<Self, PlanError> {
        let mut plan = Self::new();
        for name in names {
            let action =
                Action::from_str(name).ok_or_else(|| PlanError::UnknownAction(name.to_string()))?;
            plan.push(action)?;
        }
        Ok(plan)
    }

    pub fn push(&mut self, action: Action) -> Result<(), PlanError> {
        self.0
            .try_push(action)
            .map_err(|_| PlanError::TooManyActions)
    }

    pub fn has_hard_drop(&self) -> bool {
        self.0.contains(&Action::HardDrop)
    }

    /// Make sure the turn ends with the piece locked
    ///
    /// Appends `hard_drop` when the plan has none. A full plan has its last
    /// action replaced instead. Returns whether the plan changed.
    pub fn ensure_hard_drop(&mut self) -> bool {
        if self.has_hard_drop() {
            return false;
        }
        if self.0.is_full() {
            self.0.pop();
        }
        self.0.push(Action::HardDrop);
        true
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Action> + '_ {
        self.0.iter().copied()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }
}

impl From<ArrayVec<Action, MAX_PLAN_ACTIONS>> for ActionPlan {
    fn from(actions: ArrayVec<Action, MAX_PLAN_ACTIONS>) -> Self {
        Self(actions)
    }
}

impl TryFrom<&[Action]> for ActionPlan {
    type Error = PlanError;

    fn try_from(actions: &[Action]) -> Result<Self, Self::Error> {
        let mut plan = Self::new();
        for &action in actions {
            plan.push(action)?;
        }
        Ok(plan)
    }
}
