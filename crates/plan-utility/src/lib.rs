//! Utility goal selection.
//!
//! On each planning request, score every compiled goal definition against the projected world
//! state and hand the highest-scoring goal preset to a planner. Tie-breaking is stable by
//! declaration order for determinism.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod selector;

pub use selector::{
    Consideration, GoalChoice, UtilityGoalDefinition, UtilitySelector, UtilitySelectorConfig,
};
