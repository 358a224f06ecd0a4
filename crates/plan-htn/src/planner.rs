use plan_core::{ActionId, PlanError, WorldState};

use crate::{HtnDomain, Subtask, TaskId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HtnPlannerConfig {
    /// Deepest allowed nesting of compound tasks (frame stack size).
    pub max_depth: usize,
    /// Longest plan the output buffer holds.
    pub max_plan_len: usize,
    /// Max number of method selections before giving up (loop protection).
    pub max_expansions: usize,
}

impl Default for HtnPlannerConfig {
    fn default() -> Self {
        Self {
            max_depth: 32,
            max_plan_len: 64,
            max_expansions: 1024,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HtnStats {
    /// Method selections attempted (successful or not).
    pub expansions: u32,
    /// Methods abandoned after a nested task could not be decomposed.
    pub backtracks: u32,
    /// Deepest frame stack reached.
    pub max_depth: u32,
}

/// One compound task being decomposed.
#[derive(Debug, Clone, Copy)]
struct Frame {
    task: TaskId,
    /// Absolute index of the method being run, `None` while selecting.
    method: Option<u32>,
    next_subtask: u32,
    /// `(cost, index)` of the last method tried here; selection resumes strictly after it.
    resume_after: Option<(u32, u32)>,
    /// Output length when this frame was entered.
    emitted_before: u32,
}

impl Frame {
    fn new(task: TaskId, emitted_before: usize) -> Self {
        Self {
            task,
            method: None,
            next_subtask: 0,
            resume_after: None,
            emitted_before: emitted_before as u32,
        }
    }
}

/// Depth-first HTN decomposition with backtracking over methods.
///
/// The world state is read-only for the whole decomposition: method conditions are evaluated
/// against the state passed in, not against a projection of earlier subtasks' effects.
#[derive(Debug)]
pub struct HtnPlanner {
    config: HtnPlannerConfig,
    frames: Vec<Frame>,
    output: Vec<ActionId>,
    stats: HtnStats,
}

impl Default for HtnPlanner {
    fn default() -> Self {
        Self::new(HtnPlannerConfig::default())
    }
}

impl HtnPlanner {
    pub fn new(config: HtnPlannerConfig) -> Self {
        Self {
            config,
            frames: Vec::with_capacity(config.max_depth),
            output: Vec::with_capacity(config.max_plan_len),
            stats: HtnStats::default(),
        }
    }

    pub fn config(&self) -> HtnPlannerConfig {
        self.config
    }

    pub fn last_stats(&self) -> HtnStats {
        self.stats
    }

    /// Plan produced by the most recent call; empty after a failure.
    pub fn last_plan(&self) -> &[ActionId] {
        &self.output
    }

    pub fn plan(
        &mut self,
        domain: &HtnDomain,
        state: &WorldState,
        root: TaskId,
    ) -> Result<&[ActionId], PlanError> {
        let result = self.decompose(domain, state, root);
        match &result {
            Ok(()) => tracing::debug!(
                root = root.0,
                len = self.output.len(),
                expansions = self.stats.expansions,
                backtracks = self.stats.backtracks,
                "htn plan found"
            ),
            Err(err) if err.is_exhaustion() => tracing::warn!(
                root = root.0,
                error = %err,
                expansions = self.stats.expansions,
                "htn planning ran out of budget"
            ),
            Err(err) => tracing::debug!(root = root.0, error = %err, "htn planning failed"),
        }

        match result {
            Ok(()) => Ok(&self.output),
            Err(err) => {
                self.output.clear();
                Err(err)
            }
        }
    }

    fn reset(&mut self) {
        self.frames.clear();
        self.output.clear();
        self.stats = HtnStats::default();
    }

    /// Lowest `(cost, index)` method of `task` ordered after `resume_after` whose condition holds.
    fn select_method(
        domain: &HtnDomain,
        task: TaskId,
        state: &WorldState,
        resume_after: Option<(u32, u32)>,
    ) -> Option<(u32, u32)> {
        let compound = domain.task(task)?;
        let mut best: Option<(u32, u32)> = None;
        for index in compound.methods() {
            let Some(method) = domain.method(index) else {
                continue;
            };
            let key = (method.cost, index);
            if resume_after.is_some_and(|after| key <= after) {
                continue;
            }
            if !state.matches(&method.condition) {
                continue;
            }
            if best.map_or(true, |b| key < b) {
                best = Some(key);
            }
        }
        best
    }

    fn push_frame(&mut self, task: TaskId) -> Result<(), PlanError> {
        if self.frames.len() >= self.config.max_depth {
            return Err(PlanError::StackOverflow {
                max_depth: self.config.max_depth,
            });
        }
        self.frames.push(Frame::new(task, self.output.len()));
        self.stats.max_depth = self.stats.max_depth.max(self.frames.len() as u32);
        Ok(())
    }

    fn decompose(
        &mut self,
        domain: &HtnDomain,
        state: &WorldState,
        root: TaskId,
    ) -> Result<(), PlanError> {
        self.reset();
        if domain.task(root).is_none() {
            return Err(PlanError::UnknownTask { task: root.0 });
        }
        self.push_frame(root)?;

        while let Some(top) = self.frames.last().copied() {
            let Some(method_index) = top.method else {
                self.stats.expansions += 1;
                if self.stats.expansions as usize > self.config.max_expansions {
                    return Err(PlanError::ExpansionLimit {
                        limit: self.config.max_expansions,
                    });
                }

                match Self::select_method(domain, top.task, state, top.resume_after) {
                    Some(key) => {
                        if let Some(frame) = self.frames.last_mut() {
                            frame.method = Some(key.1);
                            frame.next_subtask = 0;
                            frame.resume_after = Some(key);
                        }
                    }
                    None => {
                        // This task is a dead end: drop it and fail the parent's current method.
                        self.frames.pop();
                        self.output.truncate(top.emitted_before as usize);
                        let Some(parent) = self.frames.last_mut() else {
                            return Err(PlanError::NoApplicableMethod { task: root.0 });
                        };
                        self.output.truncate(parent.emitted_before as usize);
                        parent.method = None;
                        self.stats.backtracks += 1;
                        tracing::trace!(task = top.task.0, parent = parent.task.0, "backtrack");
                    }
                }
                continue;
            };

            let Some(method) = domain.method(method_index) else {
                return Err(PlanError::UnknownTask { task: top.task.0 });
            };
            let subtasks = domain.subtasks(method);
            let Some(subtask) = subtasks.get(top.next_subtask as usize).copied() else {
                self.frames.pop();
                continue;
            };
            if let Some(frame) = self.frames.last_mut() {
                frame.next_subtask += 1;
            }

            match subtask {
                Subtask::Action(action) => {
                    if self.output.len() >= self.config.max_plan_len {
                        return Err(PlanError::OutputTooSmall {
                            needed: self.output.len() + 1,
                            capacity: self.config.max_plan_len,
                        });
                    }
                    self.output.push(action);
                }
                Subtask::Compound(task) => self.push_frame(task)?,
            }
        }

        Ok(())
    }
}
