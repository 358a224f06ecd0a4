//! Telemetry primitives for the planning kernel.
//!
//! This crate is intentionally lightweight and engine-agnostic: planners report what happened as
//! small trace events, and tooling decides where they go.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![forbid(unsafe_code)]

pub mod trace;

pub use trace::{tags, NullTraceSink, TraceEvent, TraceLog, TraceSink, VecTraceSink};
