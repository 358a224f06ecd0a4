//! Deterministic GOAP planning over `plan-core` world states.
//!
//! The planner owns all of its scratch memory (node pool, visited table, open list, output
//! buffer). It is sized once at construction and reset between calls, so planning never touches
//! the allocator.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod goal;
pub mod planner;
mod search;

pub use goal::{GoalTable, GoapGoal, GoapGoalDefinition};
pub use planner::{GoapPlanner, GoapPlannerConfig, PlanStats};
