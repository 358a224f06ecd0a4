use plan_core::{Condition, GoalPresetId, WorldState};

/// What a GOAP goal preset asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GoapGoal {
    pub condition: Condition,
    /// Multiplies the Hamming-distance heuristic. `1` keeps A* optimal for unit-cost domains;
    /// larger values trade optimality for fewer expansions.
    pub heuristic_weight: u32,
}

impl GoapGoal {
    pub fn new(condition: Condition) -> Self {
        Self {
            condition,
            heuristic_weight: 1,
        }
    }

    pub fn with_weight(mut self, heuristic_weight: u32) -> Self {
        self.heuristic_weight = heuristic_weight;
        self
    }

    pub fn is_satisfied_by(&self, state: &WorldState) -> bool {
        state.matches(&self.condition)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoapGoalDefinition {
    pub name: String,
    pub goal: GoapGoal,
}

/// Goal presets indexed by [`GoalPresetId`] (declaration order).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalTable {
    names: Vec<String>,
    goals: Vec<GoapGoal>,
}

impl GoalTable {
    pub fn new(definitions: Vec<GoapGoalDefinition>) -> Self {
        let (names, goals) = definitions
            .into_iter()
            .map(|d| (d.name, d.goal))
            .unzip();
        Self { names, goals }
    }

    pub fn get(&self, id: GoalPresetId) -> Option<&GoapGoal> {
        self.goals.get(id.index())
    }

    pub fn name(&self, id: GoalPresetId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn find(&self, name: &str) -> Option<GoalPresetId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| GoalPresetId(i as u32))
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GoalPresetId, &GoapGoal)> {
        self.goals
            .iter()
            .enumerate()
            .map(|(i, g)| (GoalPresetId(i as u32), g))
    }
}
