#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::VecDeque;

/// Well-known event tags emitted by the planning facade.
///
/// Field meaning per tag:
/// - `*.plan.ok`: `a` = plan length, `b` = expanded nodes (GOAP) or method selections (HTN)
/// - `*.plan.fail`: `a` = status code, `b` = expanded nodes / method selections
/// - `utility.select`: `a` = goal preset id, `b` = declaration index
/// - `exec.submit` / `exec.drop`: `a` = action id, `b` = order tag
pub mod tags {
    pub const GOAP_PLAN_OK: &str = "goap.plan.ok";
    pub const GOAP_PLAN_FAIL: &str = "goap.plan.fail";
    pub const HTN_PLAN_OK: &str = "htn.plan.ok";
    pub const HTN_PLAN_FAIL: &str = "htn.plan.fail";
    pub const UTILITY_SELECT: &str = "utility.select";
    pub const UTILITY_NONE: &str = "utility.none";
    pub const EXEC_SUBMIT: &str = "exec.submit";
    pub const EXEC_DROP: &str = "exec.drop";
}

/// A small, allocation-friendly trace event.
///
/// This is intentionally "dumb data" so it can be recorded during simulation and later rendered
/// by tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceEvent {
    pub tick: u64,
    pub tag: Cow<'static, str>,
    pub a: u64,
    pub b: u64,
}

impl TraceEvent {
    pub fn new(tick: u64, tag: impl Into<Cow<'static, str>>) -> Self {
        Self {
            tick,
            tag: tag.into(),
            a: 0,
            b: 0,
        }
    }

    pub fn with_a(mut self, a: u64) -> Self {
        self.a = a;
        self
    }

    pub fn with_b(mut self, b: u64) -> Self {
        self.b = b;
        self
    }
}

pub trait TraceSink {
    fn emit(&mut self, event: TraceEvent);
}

impl<T: TraceSink + ?Sized> TraceSink for &mut T {
    fn emit(&mut self, event: TraceEvent) {
        (**self).emit(event);
    }
}

#[derive(Debug, Default)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn emit(&mut self, _event: TraceEvent) {}
}

/// Keeps at most `limit` events (all of them when `limit` is `None`), dropping the oldest.
#[derive(Debug, Default)]
pub struct VecTraceSink {
    pub events: VecDeque<TraceEvent>,
    pub limit: Option<usize>,
}

impl VecTraceSink {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(limit),
            limit: Some(limit),
        }
    }

    pub fn tags(&self) -> Vec<&str> {
        self.events.iter().map(|e| e.tag.as_ref()).collect()
    }
}

impl TraceSink for VecTraceSink {
    fn emit(&mut self, event: TraceEvent) {
        if let Some(limit) = self.limit {
            if limit == 0 {
                return;
            }
            if self.events.len() >= limit {
                self.events.pop_front();
            }
        }
        self.events.push_back(event);
    }
}

#[derive(Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TraceLog {
    pub events: Vec<TraceEvent>,
}

impl TraceLog {
    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    /// Events carrying `tag`, in emission order.
    pub fn with_tag<'a>(&'a self, tag: &'a str) -> impl Iterator<Item = &'a TraceEvent> + 'a {
        self.events.iter().filter(move |e| e.tag == tag)
    }
}

impl TraceSink for TraceLog {
    fn emit(&mut self, event: TraceEvent) {
        self.push(event);
    }
}
