//! Deterministic planning primitives: atoms, the 256-bit world state, compiled action tables and
//! the order executor.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod action;
pub mod atom;
pub mod bitset;
pub mod blackboard;
pub mod error;
pub mod executor;
pub mod goal;
pub mod projection;

pub use action::{
    key_bucket, ActionDefinition, ActionId, ActionLibrary, CandidateIndex, Candidates,
    ALWAYS_BUCKET, BUCKET_COUNT,
};
pub use atom::{AtomId, AtomRegistry};
pub use bitset::{Condition, WorldState, MAX_ATOMS};
pub use blackboard::{BbKey, BbValue, Blackboard, BlackboardView, EntityKey, EntityRef, IntKey};
pub use error::{
    AtomError, CompileError, CompileErrors, ExecuteError, PlanError, PlanStatus,
};
pub use executor::{
    execute_action, BoundedOrderQueue, ExecutorKind, Order, OrderQueue, OrderSpec, ParamBinding,
    QueueFull, SubmitMode, TagId, ORDER_ARGS,
};
pub use goal::{GoalPresetId, PlanningStrategy};
pub use projection::{ProjectionOp, ProjectionRule, ProjectionTable};
