//! Declarative domain description.
//!
//! Everything is referenced by name; [`crate::CompiledDomain::compile`] turns a config into the
//! flat tables the planners read. Loading the config (files, hot-reload) is up to the host.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use plan_core::{ExecutorKind, PlanningStrategy, SubmitMode};

#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DomainConfig {
    /// Atom names in id order.
    pub atoms: Vec<String>,
    pub projections: Vec<ProjectionConfig>,
    pub actions: Vec<ActionConfig>,
    /// Goal presets; a goal's [`plan_core::GoalPresetId`] is its position here.
    pub goals: Vec<GoalConfig>,
    pub tasks: Vec<TaskConfig>,
    pub utility: Vec<UtilityGoalConfig>,
    /// Goals scoring below this are never selected.
    pub min_utility_score: f32,
}

/// One `atom = value` requirement or effect.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FactConfig {
    pub atom: String,
    #[cfg_attr(feature = "serde", serde(default = "default_true"))]
    pub value: bool,
}

impl FactConfig {
    pub fn new(atom: impl Into<String>, value: bool) -> Self {
        Self {
            atom: atom.into(),
            value,
        }
    }

    pub fn holds(atom: impl Into<String>) -> Self {
        Self::new(atom, true)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ProjectionConfig {
    pub atom: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub op: ProjectionOpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "op", rename_all = "snake_case"))]
pub enum ProjectionOpConfig {
    IntEquals { key: String, value: i32 },
    IntAtLeast { key: String, value: i32 },
    IntAtMost { key: String, value: i32 },
    EntityPresent { key: String },
    EntityAbsent { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionConfig {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub pre: Vec<FactConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub post: Vec<FactConfig>,
    #[cfg_attr(feature = "serde", serde(default = "default_cost"))]
    pub cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub executor: ExecutorKind,
    /// `None` submits the default order (tag 0, replace, player 0).
    #[cfg_attr(feature = "serde", serde(default))]
    pub order: Option<OrderConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bindings: Vec<BindingConfig>,
}

impl ActionConfig {
    pub fn new(name: impl Into<String>, cost: u32) -> Self {
        Self {
            name: name.into(),
            pre: Vec::new(),
            post: Vec::new(),
            cost,
            executor: ExecutorKind::default(),
            order: None,
            bindings: Vec::new(),
        }
    }

    pub fn pre(mut self, atom: impl Into<String>, value: bool) -> Self {
        self.pre.push(FactConfig::new(atom, value));
        self
    }

    pub fn post(mut self, atom: impl Into<String>, value: bool) -> Self {
        self.post.push(FactConfig::new(atom, value));
        self
    }

    pub fn order(mut self, order: OrderConfig) -> Self {
        self.order = Some(order);
        self
    }

    pub fn binding(mut self, binding: BindingConfig) -> Self {
        self.bindings.push(binding);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrderConfig {
    pub tag: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mode: SubmitMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub player: u32,
}

impl OrderConfig {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            mode: SubmitMode::default(),
            player: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum BindingConfig {
    IntToArg { key: String, slot: u8 },
    EntityToTarget { key: String },
    EntityToTargetContext { key: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GoalConfig {
    pub name: String,
    /// Desired facts for GOAP planning.
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Vec<FactConfig>,
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub heuristic_weight: u32,
    /// Compound task decomposed when this goal is planned with HTN.
    #[cfg_attr(feature = "serde", serde(default))]
    pub root_task: Option<String>,
}

impl GoalConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            condition: Vec::new(),
            heuristic_weight: 1,
            root_task: None,
        }
    }

    pub fn require(mut self, atom: impl Into<String>, value: bool) -> Self {
        self.condition.push(FactConfig::new(atom, value));
        self
    }

    pub fn root_task(mut self, task: impl Into<String>) -> Self {
        self.root_task = Some(task.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskConfig {
    pub name: String,
    /// Declaration order breaks cost ties.
    #[cfg_attr(feature = "serde", serde(default))]
    pub methods: Vec<MethodConfig>,
}

impl TaskConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: MethodConfig) -> Self {
        self.methods.push(method);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MethodConfig {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub condition: Vec<FactConfig>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub cost: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub subtasks: Vec<SubtaskConfig>,
}

impl MethodConfig {
    pub fn new(name: impl Into<String>, cost: u32) -> Self {
        Self {
            name: name.into(),
            condition: Vec::new(),
            cost,
            subtasks: Vec::new(),
        }
    }

    pub fn when(mut self, atom: impl Into<String>, value: bool) -> Self {
        self.condition.push(FactConfig::new(atom, value));
        self
    }

    pub fn action(mut self, name: impl Into<String>) -> Self {
        self.subtasks.push(SubtaskConfig::Action(name.into()));
        self
    }

    pub fn task(mut self, name: impl Into<String>) -> Self {
        self.subtasks.push(SubtaskConfig::Task(name.into()));
        self
    }
}

/// `{"action": "buy"}` or `{"task": "get_tool"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SubtaskConfig {
    Action(String),
    Task(String),
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UtilityGoalConfig {
    pub goal: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub strategy: PlanningStrategy,
    #[cfg_attr(feature = "serde", serde(default = "default_base_weight"))]
    pub base_weight: f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub considerations: Vec<ConsiderationConfig>,
}

impl UtilityGoalConfig {
    pub fn new(goal: impl Into<String>, strategy: PlanningStrategy, base_weight: f32) -> Self {
        Self {
            goal: goal.into(),
            strategy,
            base_weight,
            considerations: Vec::new(),
        }
    }

    pub fn with(mut self, consideration: ConsiderationConfig) -> Self {
        self.considerations.push(consideration);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum ConsiderationConfig {
    Atom {
        atom: String,
        if_true: f32,
        if_false: f32,
    },
    IntRange {
        key: String,
        min: i32,
        max: i32,
        low: f32,
        high: f32,
    },
}

#[cfg(feature = "serde")]
fn default_true() -> bool {
    true
}

#[cfg(feature = "serde")]
fn default_cost() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_weight() -> u32 {
    1
}

#[cfg(feature = "serde")]
fn default_base_weight() -> f32 {
    1.0
}
