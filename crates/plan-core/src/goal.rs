#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Dense id of a goal preset. Shared by the GOAP goal table, the HTN root table and the utility
/// selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalPresetId(pub u32);

impl GoalPresetId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which planner pursues a goal preset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PlanningStrategy {
    #[default]
    Goap,
    Htn,
}
