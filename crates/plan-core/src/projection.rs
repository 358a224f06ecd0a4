#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{AtomId, BlackboardView, EntityKey, IntKey, WorldState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum ProjectionOp {
    IntEquals { key: IntKey, value: i32 },
    IntAtLeast { key: IntKey, value: i32 },
    IntAtMost { key: IntKey, value: i32 },
    EntityPresent { key: EntityKey },
    EntityAbsent { key: EntityKey },
}

impl ProjectionOp {
    /// Int comparisons against a missing value are `false`.
    pub fn evaluate(&self, blackboard: &dyn BlackboardView) -> bool {
        match *self {
            ProjectionOp::IntEquals { key, value } => blackboard.int(key) == Some(value),
            ProjectionOp::IntAtLeast { key, value } => {
                blackboard.int(key).is_some_and(|v| v >= value)
            }
            ProjectionOp::IntAtMost { key, value } => {
                blackboard.int(key).is_some_and(|v| v <= value)
            }
            ProjectionOp::EntityPresent { key } => blackboard.entity(key).is_some(),
            ProjectionOp::EntityAbsent { key } => blackboard.entity(key).is_none(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionRule {
    pub atom: AtomId,
    pub op: ProjectionOp,
}

/// Rules that derive a [`WorldState`] from live agent data.
///
/// Rules run in declaration order; when several rules target the same atom the last one wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectionTable {
    rules: Vec<ProjectionRule>,
}

impl ProjectionTable {
    pub fn new(rules: Vec<ProjectionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[ProjectionRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn project(&self, blackboard: &dyn BlackboardView) -> WorldState {
        self.project_onto(WorldState::EMPTY, blackboard)
    }

    /// Start from `base` (e.g. facts owned elsewhere) and overwrite projected atoms.
    pub fn project_onto(&self, base: WorldState, blackboard: &dyn BlackboardView) -> WorldState {
        let mut state = base;
        for rule in &self.rules {
            state.set_bit(rule.atom, rule.op.evaluate(blackboard));
        }
        state
    }
}
