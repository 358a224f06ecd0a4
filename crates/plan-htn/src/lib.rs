//! Deterministic HTN planning primitives.
//!
//! A compiled [`HtnDomain`] is three flat arrays (tasks, methods, subtasks) linked by index
//! ranges. The [`HtnPlanner`] decomposes a root task into a linear sequence of `plan-core` action
//! ids using an explicit frame stack.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod domain;
pub mod planner;

pub use domain::{
    CompoundTask, HtnDomain, HtnRootTable, Method, MethodDefinition, Subtask, TaskDefinition,
    TaskId,
};
pub use planner::{HtnPlanner, HtnPlannerConfig, HtnStats};
