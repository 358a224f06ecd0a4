use std::collections::BinaryHeap;

use plan_core::{ActionId, ActionLibrary, Condition, PlanError, WorldState};

use crate::search::{NodePool, OpenEntry, Probe, VisitedTable, NO_PARENT};
use crate::GoapGoal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoapPlannerConfig {
    /// Search nodes available per call. Running out fails the call with
    /// [`PlanError::NodePoolExhausted`].
    pub max_nodes: usize,
    /// Length of the internal output buffer used by [`GoapPlanner::plan`].
    pub max_plan_len: usize,
}

impl Default for GoapPlannerConfig {
    fn default() -> Self {
        Self {
            max_nodes: 4096,
            max_plan_len: 32,
        }
    }
}

/// Counters from the most recent planning call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanStats {
    /// Nodes whose successors were generated. The goal node is not expanded.
    pub expanded: u32,
    /// Successor states produced (including ones already visited).
    pub generated: u32,
    /// Nodes allocated from the pool.
    pub nodes_used: u32,
}

/// A* over world states.
///
/// One instance serves one caller at a time; it can be reused for any number of calls and any
/// compiled library.
#[derive(Debug)]
pub struct GoapPlanner {
    config: GoapPlannerConfig,
    nodes: NodePool,
    visited: VisitedTable,
    open: BinaryHeap<OpenEntry>,
    open_capacity: usize,
    output: Vec<ActionId>,
    output_len: usize,
    stats: PlanStats,
}

impl Default for GoapPlanner {
    fn default() -> Self {
        Self::new(GoapPlannerConfig::default())
    }
}

impl GoapPlanner {
    pub fn new(config: GoapPlannerConfig) -> Self {
        let open_capacity = config.max_nodes.saturating_mul(2).max(1);
        Self {
            config,
            nodes: NodePool::with_capacity(config.max_nodes),
            visited: VisitedTable::for_nodes(config.max_nodes),
            open: BinaryHeap::with_capacity(open_capacity),
            open_capacity,
            output: vec![ActionId(0); config.max_plan_len],
            output_len: 0,
            stats: PlanStats::default(),
        }
    }

    pub fn config(&self) -> GoapPlannerConfig {
        self.config
    }

    pub fn last_stats(&self) -> PlanStats {
        self.stats
    }

    /// Plan produced by the most recent successful [`GoapPlanner::plan`] call; empty after a
    /// failure or a [`GoapPlanner::plan_into`] call.
    pub fn last_plan(&self) -> &[ActionId] {
        &self.output[..self.output_len]
    }

    /// Plan towards a goal preset.
    pub fn plan_goal(
        &mut self,
        library: &ActionLibrary,
        start: WorldState,
        goal: &GoapGoal,
    ) -> Result<&[ActionId], PlanError> {
        self.plan(library, start, &goal.condition, goal.heuristic_weight)
    }

    /// Plan into the internal output buffer (`max_plan_len` long).
    pub fn plan(
        &mut self,
        library: &ActionLibrary,
        start: WorldState,
        goal: &Condition,
        heuristic_weight: u32,
    ) -> Result<&[ActionId], PlanError> {
        let result = self
            .search(library, start, goal, heuristic_weight)
            .and_then(|node| reconstruct(&self.nodes, node, &mut self.output));
        self.output_len = 0;
        self.output_len = self.finish(result)?;
        Ok(&self.output[..self.output_len])
    }

    /// Plan into a caller-provided buffer; returns the number of steps written.
    ///
    /// On failure nothing is written.
    pub fn plan_into(
        &mut self,
        library: &ActionLibrary,
        start: WorldState,
        goal: &Condition,
        heuristic_weight: u32,
        out: &mut [ActionId],
    ) -> Result<usize, PlanError> {
        let result = self
            .search(library, start, goal, heuristic_weight)
            .and_then(|node| reconstruct(&self.nodes, node, out));
        self.output_len = 0;
        self.finish(result)
    }

    fn finish(&self, result: Result<usize, PlanError>) -> Result<usize, PlanError> {
        let stats = self.stats;
        match &result {
            Ok(len) => tracing::debug!(
                len,
                expanded = stats.expanded,
                nodes = stats.nodes_used,
                "goap plan found"
            ),
            Err(err) if err.is_exhaustion() => tracing::warn!(
                error = %err,
                expanded = stats.expanded,
                nodes = stats.nodes_used,
                "goap planning ran out of budget"
            ),
            Err(err) => tracing::debug!(
                error = %err,
                expanded = stats.expanded,
                "goap planning failed"
            ),
        }
        result
    }

    fn reset(&mut self) {
        self.nodes.reset();
        self.visited.reset();
        self.open.clear();
        self.stats = PlanStats::default();
    }

    fn push_open(&mut self, entry: OpenEntry) -> Result<(), PlanError> {
        if self.open.len() >= self.open_capacity {
            return Err(PlanError::OpenListFull {
                capacity: self.open_capacity,
            });
        }
        self.open.push(entry);
        Ok(())
    }

    /// Run A* and return the goal node.
    fn search(
        &mut self,
        library: &ActionLibrary,
        start: WorldState,
        goal: &Condition,
        heuristic_weight: u32,
    ) -> Result<u32, PlanError> {
        self.reset();

        let h = |state: &WorldState| goal.unsatisfied_count(state).saturating_mul(heuristic_weight);
        let exhausted = PlanError::NodePoolExhausted {
            capacity: self.nodes.capacity(),
        };

        let root = self.nodes.alloc_root(start).ok_or(exhausted)?;
        self.stats.nodes_used = self.nodes.len() as u32;
        if start.matches(goal) {
            return Ok(root);
        }
        if let Probe::Vacant(slot) = self.visited.probe(&start, &self.nodes) {
            self.visited.occupy(slot, root);
        }

        let mut seq: u32 = 0;
        self.push_open(OpenEntry {
            f: h(&start),
            g: 0,
            seq,
            node: root,
        })?;

        while let Some(entry) = self.open.pop() {
            if entry.g != self.nodes.g(entry.node) {
                continue; // stale heap entry
            }

            let state = self.nodes.state(entry.node);
            if state.matches(goal) {
                return Ok(entry.node);
            }

            self.stats.expanded += 1;
            tracing::trace!(node = entry.node, f = entry.f, g = entry.g, "expand");

            for action in library.candidates(&state) {
                if !library.is_applicable(action, &state) {
                    continue;
                }
                let next = library.apply_post(action, &state);
                if next == state {
                    continue;
                }
                self.stats.generated += 1;

                let cost = library.cost(action).unwrap_or(0);
                let next_g = entry.g.saturating_add(cost);

                let node = match self.visited.probe(&next, &self.nodes) {
                    Probe::Found(node) => {
                        if next_g >= self.nodes.g(node) {
                            continue;
                        }
                        self.nodes.relax(node, entry.node, action, next_g);
                        node
                    }
                    Probe::Vacant(slot) => {
                        let node = self
                            .nodes
                            .alloc(next, entry.node, action, next_g)
                            .ok_or(exhausted)?;
                        self.stats.nodes_used = self.nodes.len() as u32;
                        self.visited.occupy(slot, node);
                        node
                    }
                    Probe::Full => {
                        return Err(PlanError::VisitedTableFull {
                            capacity: self.visited.capacity(),
                        })
                    }
                };

                seq = seq.wrapping_add(1);
                self.push_open(OpenEntry {
                    f: next_g.saturating_add(h(&next)),
                    g: next_g,
                    seq,
                    node,
                })?;
            }
        }

        Err(PlanError::NoPlan)
    }
}

/// Walk parent links from `goal_node` and write the path, root first, into `out`.
fn reconstruct(nodes: &NodePool, goal_node: u32, out: &mut [ActionId]) -> Result<usize, PlanError> {
    let len = nodes.depth(goal_node);
    if len > out.len() {
        return Err(PlanError::OutputTooSmall {
            needed: len,
            capacity: out.len(),
        });
    }

    let mut current = goal_node;
    let mut i = len;
    while nodes.parent(current) != NO_PARENT {
        i -= 1;
        out[i] = nodes.action(current);
        current = nodes.parent(current);
    }
    Ok(len)
}
