//! Error types shared by the compiler, the planners and the executor.

use core::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtomError {
    #[error("atom registry is full ({capacity} atoms); cannot register `{name}`")]
    CapacityExceeded { name: String, capacity: usize },
}

/// A single configuration diagnostic.
///
/// `context` names the definition that holds the bad reference (e.g. `action "attack"`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{context}: unknown atom `{name}`")]
    UnknownAtom { context: String, name: String },

    #[error("{context}: unknown order tag `{name}`")]
    UnknownTag { context: String, name: String },

    #[error("{context}: unknown int blackboard key `{name}`")]
    UnknownIntKey { context: String, name: String },

    #[error("{context}: unknown entity blackboard key `{name}`")]
    UnknownEntityKey { context: String, name: String },

    #[error("{context}: unknown action `{name}`")]
    UnknownAction { context: String, name: String },

    #[error("{context}: unknown task `{name}`")]
    UnknownTask { context: String, name: String },

    #[error("{context}: unknown goal preset `{name}`")]
    UnknownGoal { context: String, name: String },

    #[error("duplicate {kind} `{name}`")]
    DuplicateName { kind: &'static str, name: String },

    #[error("{context}: atom `{atom}` is required to be both true and false")]
    ConflictingFact { context: String, atom: String },

    #[error("{context}: argument slot {slot} is out of range (orders have 4 slots)")]
    ArgSlotOutOfRange { context: String, slot: u8 },

    #[error("{context}: action id {action} is out of range ({len} actions)")]
    ActionOutOfRange {
        context: String,
        action: u32,
        len: usize,
    },

    #[error("{context}: task id {task} is out of range ({len} tasks)")]
    TaskOutOfRange { context: String, task: u32, len: usize },

    #[error("task `{task}` has no methods")]
    TaskWithoutMethods { task: String },

    #[error("{context}: goal preset `{goal}` has no htn root task")]
    MissingRootTask { context: String, goal: String },

    #[error(transparent)]
    Atom(#[from] AtomError),
}

/// Every diagnostic produced by one compile pass.
///
/// Compilation is all-or-nothing: if this is returned, no table was produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileErrors(pub Vec<CompileError>);

impl CompileErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: CompileError) {
        self.0.push(error);
    }

    pub fn extend(&mut self, other: CompileErrors) {
        self.0.extend(other.0);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompileError> {
        self.0.iter()
    }

    /// `Ok(value)` when no diagnostics were recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, CompileErrors> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl From<CompileError> for CompileErrors {
    fn from(value: CompileError) -> Self {
        Self(vec![value])
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} configuration error(s)", self.0.len())?;
        for e in &self.0 {
            write!(f, "\n  - {e}")?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

/// Coarse classification of a planning failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PlanStatus {
    /// The domain admits no solution from this state (a normal outcome).
    NoSolution,
    /// A budget fixed at planner construction ran out before an answer was found.
    Exhausted,
    /// The request referenced something the compiled tables don't contain.
    InvalidRequest,
}

impl PlanStatus {
    /// Stable numeric code for telemetry.
    pub fn code(self) -> u64 {
        match self {
            PlanStatus::NoSolution => 1,
            PlanStatus::Exhausted => 2,
            PlanStatus::InvalidRequest => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlanError {
    #[error("no action sequence reaches the goal")]
    NoPlan,

    #[error("no applicable method decomposes task {task}")]
    NoApplicableMethod { task: u32 },

    #[error("no goal scored above the selection threshold")]
    NoGoal,

    #[error("node pool exhausted ({capacity} nodes)")]
    NodePoolExhausted { capacity: usize },

    #[error("open list full ({capacity} entries)")]
    OpenListFull { capacity: usize },

    #[error("visited-state table full ({capacity} slots)")]
    VisitedTableFull { capacity: usize },

    #[error("plan needs {needed} steps but the output buffer holds {capacity}")]
    OutputTooSmall { needed: usize, capacity: usize },

    #[error("task decomposition deeper than {max_depth} frames")]
    StackOverflow { max_depth: usize },

    #[error("expansion limit of {limit} reached")]
    ExpansionLimit { limit: usize },

    #[error("unknown task id {task}")]
    UnknownTask { task: u32 },

    #[error("unknown goal preset id {goal}")]
    UnknownGoal { goal: u32 },
}

impl PlanError {
    pub fn status(&self) -> PlanStatus {
        match self {
            PlanError::NoPlan | PlanError::NoApplicableMethod { .. } | PlanError::NoGoal => {
                PlanStatus::NoSolution
            }
            PlanError::NodePoolExhausted { .. }
            | PlanError::OpenListFull { .. }
            | PlanError::VisitedTableFull { .. }
            | PlanError::OutputTooSmall { .. }
            | PlanError::StackOverflow { .. }
            | PlanError::ExpansionLimit { .. } => PlanStatus::Exhausted,
            PlanError::UnknownTask { .. } | PlanError::UnknownGoal { .. } => {
                PlanStatus::InvalidRequest
            }
        }
    }

    pub fn is_exhaustion(&self) -> bool {
        self.status() == PlanStatus::Exhausted
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ExecuteError {
    #[error("unknown action id {action}")]
    UnknownAction { action: u32 },

    #[error("order queue is full; order for action {action} dropped")]
    QueueFull { action: u32 },
}
