//! Umbrella crate for the agent planning kernel.
//!
//! The `plan-*` building blocks are re-exported as modules; on top of them this crate adds the
//! declarative [`DomainConfig`], the domain compiler ([`CompiledDomain::compile`]) and the
//! per-agent [`AgentPlanner`] facade that gameplay code drives.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub use plan_core as core;
pub use plan_goap as goap;
pub use plan_htn as htn;
pub use plan_tools as tools;
pub use plan_utility as utility;

pub mod agent;
pub mod compile;
pub mod config;

pub use agent::{AgentPlanner, AgentPlannerConfig, PlannedGoal};
pub use compile::{CompiledDomain, Vocabulary};
pub use config::{
    ActionConfig, BindingConfig, ConsiderationConfig, DomainConfig, FactConfig, GoalConfig,
    MethodConfig, OrderConfig, ProjectionConfig, ProjectionOpConfig, SubtaskConfig, TaskConfig,
    UtilityGoalConfig,
};
