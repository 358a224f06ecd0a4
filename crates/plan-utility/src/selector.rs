use plan_core::{
    AtomId, BlackboardView, EntityKey, EntityRef, GoalPresetId, IntKey, PlanningStrategy,
    WorldState,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtilitySelectorConfig {
    /// Minimum score required to select a goal.
    ///
    /// If every goal scores below this threshold, no goal is selected (allowing fallbacks in
    /// higher-level control flow).
    pub min_score: f32,
}

impl Default for UtilitySelectorConfig {
    fn default() -> Self {
        Self { min_score: 0.0 }
    }
}

/// One multiplicative factor of a goal's score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Consideration {
    /// `if_true` when the atom is set in the state, `if_false` otherwise.
    Atom {
        atom: AtomId,
        if_true: f32,
        if_false: f32,
    },
    /// Linear response of a blackboard int: `low` at or below `min`, `high` at or above `max`.
    /// A missing value scores `low`.
    IntRange {
        key: IntKey,
        min: i32,
        max: i32,
        low: f32,
        high: f32,
    },
}

impl Consideration {
    pub fn atom(atom: AtomId, if_true: f32, if_false: f32) -> Self {
        Consideration::Atom {
            atom,
            if_true,
            if_false,
        }
    }

    pub fn score(&self, state: &WorldState, blackboard: &dyn BlackboardView) -> f32 {
        match *self {
            Consideration::Atom {
                atom,
                if_true,
                if_false,
            } => {
                if state.get_bit(atom) {
                    if_true
                } else {
                    if_false
                }
            }
            Consideration::IntRange {
                key,
                min,
                max,
                low,
                high,
            } => {
                let Some(value) = blackboard.int(key) else {
                    return low;
                };
                if max <= min {
                    return if value >= max { high } else { low };
                }
                let t = ((value as f32 - min as f32) / (max as f32 - min as f32)).clamp(0.0, 1.0);
                low + (high - low) * t
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UtilityGoalDefinition {
    pub goal: GoalPresetId,
    pub strategy: PlanningStrategy,
    pub base_weight: f32,
    pub considerations: Vec<Consideration>,
}

impl UtilityGoalDefinition {
    pub fn new(goal: GoalPresetId, strategy: PlanningStrategy, base_weight: f32) -> Self {
        Self {
            goal,
            strategy,
            base_weight,
            considerations: Vec::new(),
        }
    }

    pub fn with(mut self, consideration: Consideration) -> Self {
        self.considerations.push(consideration);
        self
    }
}

/// The outcome of a selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalChoice {
    pub goal: GoalPresetId,
    pub strategy: PlanningStrategy,
    pub score: f32,
    /// Declaration index of the winning definition.
    pub index: usize,
}

struct NoValues;

impl BlackboardView for NoValues {
    fn int(&self, _key: IntKey) -> Option<i32> {
        None
    }

    fn entity(&self, _key: EntityKey) -> Option<EntityRef> {
        None
    }
}

/// Compiled utility goal definitions. Pure: selection reads only its arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UtilitySelector {
    goals: Vec<GoalPresetId>,
    strategies: Vec<PlanningStrategy>,
    base_weights: Vec<f32>,
    ranges: Vec<(u32, u32)>,
    considerations: Vec<Consideration>,
    config: UtilitySelectorConfig,
}

impl UtilitySelector {
    pub fn compile(definitions: Vec<UtilityGoalDefinition>) -> Self {
        let mut selector = Self::default();
        for def in definitions {
            selector.goals.push(def.goal);
            selector.strategies.push(def.strategy);
            selector.base_weights.push(def.base_weight);
            let start = selector.considerations.len() as u32;
            selector.considerations.extend(def.considerations);
            selector
                .ranges
                .push((start, selector.considerations.len() as u32 - start));
        }
        selector
    }

    pub fn with_config(mut self, config: UtilitySelectorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> UtilitySelectorConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.goals.is_empty()
    }

    pub fn goal(&self, index: usize) -> Option<GoalPresetId> {
        self.goals.get(index).copied()
    }

    /// Score of the definition at `index`; NaN is mapped to `-inf`.
    pub fn score(
        &self,
        index: usize,
        state: &WorldState,
        blackboard: &dyn BlackboardView,
    ) -> Option<f32> {
        let base = *self.base_weights.get(index)?;
        let (start, len) = self.ranges[index];
        let considerations = &self.considerations[start as usize..(start + len) as usize];
        let score = considerations
            .iter()
            .fold(base, |acc, c| acc * c.score(state, blackboard));
        Some(if score.is_nan() { f32::NEG_INFINITY } else { score })
    }

    /// Highest-scoring goal for a state, ignoring int considerations' blackboard input.
    pub fn select(&self, state: &WorldState) -> Option<GoalChoice> {
        self.select_with(state, &NoValues)
    }

    pub fn select_with(
        &self,
        state: &WorldState,
        blackboard: &dyn BlackboardView,
    ) -> Option<GoalChoice> {
        let mut best: Option<(usize, f32)> = None;
        for index in 0..self.goals.len() {
            let Some(score) = self.score(index, state, blackboard) else {
                continue;
            };
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((index, score));
            }
        }

        let (index, score) = best?;
        if score < self.config.min_score {
            tracing::trace!(score, min = self.config.min_score, "no goal above threshold");
            return None;
        }

        Some(GoalChoice {
            goal: self.goals[index],
            strategy: self.strategies[index],
            score,
            index,
        })
    }
}
