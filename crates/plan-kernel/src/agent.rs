//! Per-agent planning facade over a shared [`CompiledDomain`].

use plan_core::{
    ActionId, BlackboardView, Condition, EntityRef, ExecuteError, GoalPresetId, Order, OrderQueue,
    PlanError, PlanningStrategy, WorldState,
};
use plan_goap::{GoapPlanner, GoapPlannerConfig};
use plan_htn::{HtnPlanner, HtnPlannerConfig, TaskId};
use plan_tools::{tags, NullTraceSink, TraceEvent, TraceSink};
use plan_utility::GoalChoice;

use crate::CompiledDomain;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AgentPlannerConfig {
    pub goap: GoapPlannerConfig,
    pub htn: HtnPlannerConfig,
}

/// A selected goal together with the plan found for it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlannedGoal<'a> {
    pub choice: GoalChoice,
    pub actions: &'a [ActionId],
}

/// Owns one GOAP and one HTN planner (and their budgets) for a single agent or worker.
///
/// The domain is borrowed, so any number of planners can share one compiled domain. Every call
/// reports a [`TraceEvent`] to the sink, stamped with the current tick.
#[derive(Debug)]
pub struct AgentPlanner<'d, S: TraceSink = NullTraceSink> {
    domain: &'d CompiledDomain,
    goap: GoapPlanner,
    htn: HtnPlanner,
    sink: S,
    tick: u64,
}

impl<'d> AgentPlanner<'d, NullTraceSink> {
    pub fn new(domain: &'d CompiledDomain) -> Self {
        Self::with_sink(domain, AgentPlannerConfig::default(), NullTraceSink)
    }
}

impl<'d, S: TraceSink> AgentPlanner<'d, S> {
    pub fn with_sink(domain: &'d CompiledDomain, config: AgentPlannerConfig, sink: S) -> Self {
        Self {
            domain,
            goap: GoapPlanner::new(config.goap),
            htn: HtnPlanner::new(config.htn),
            sink,
            tick: 0,
        }
    }

    pub fn domain(&self) -> &'d CompiledDomain {
        self.domain
    }

    pub fn config(&self) -> AgentPlannerConfig {
        AgentPlannerConfig {
            goap: self.goap.config(),
            htn: self.htn.config(),
        }
    }

    pub fn goap(&self) -> &GoapPlanner {
        &self.goap
    }

    pub fn htn(&self) -> &HtnPlanner {
        &self.htn
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Tick stamped on subsequent trace events.
    pub fn set_tick(&mut self, tick: u64) {
        self.tick = tick;
    }

    fn emit(&mut self, tag: &'static str, a: u64, b: u64) {
        self.sink
            .emit(TraceEvent::new(self.tick, tag).with_a(a).with_b(b));
    }

    /// Derive the agent's world state from its blackboard.
    pub fn project(&self, blackboard: &dyn BlackboardView) -> WorldState {
        self.domain.projection().project(blackboard)
    }

    /// Pick the goal preset to pursue; `None` when nothing scores above the threshold.
    pub fn select_goal(
        &mut self,
        state: &WorldState,
        blackboard: &dyn BlackboardView,
    ) -> Option<GoalChoice> {
        let choice = self.domain.utility().select_with(state, blackboard);
        match choice {
            Some(choice) => self.emit(
                tags::UTILITY_SELECT,
                u64::from(choice.goal.0),
                choice.index as u64,
            ),
            None => self.emit(tags::UTILITY_NONE, 0, 0),
        }
        choice
    }

    /// GOAP plan towards a goal preset.
    pub fn plan_goap(
        &mut self,
        state: WorldState,
        goal: GoalPresetId,
    ) -> Result<&[ActionId], PlanError> {
        let domain = self.domain;
        let Some(preset) = domain.goals().get(goal) else {
            return Err(PlanError::UnknownGoal { goal: goal.0 });
        };
        self.plan_goap_condition(state, &preset.condition, preset.heuristic_weight)
    }

    /// GOAP plan towards an ad-hoc condition.
    pub fn plan_goap_condition(
        &mut self,
        state: WorldState,
        goal: &Condition,
        heuristic_weight: u32,
    ) -> Result<&[ActionId], PlanError> {
        let outcome = self
            .goap
            .plan(self.domain.actions(), state, goal, heuristic_weight)
            .map(<[ActionId]>::len);
        let expanded = u64::from(self.goap.last_stats().expanded);
        match outcome {
            Ok(len) => self.emit(tags::GOAP_PLAN_OK, len as u64, expanded),
            Err(err) => {
                self.emit(tags::GOAP_PLAN_FAIL, err.status().code(), expanded);
                return Err(err);
            }
        }
        Ok(self.goap.last_plan())
    }

    /// HTN decomposition of a compound task.
    pub fn plan_htn(&mut self, state: &WorldState, root: TaskId) -> Result<&[ActionId], PlanError> {
        let outcome = self
            .htn
            .plan(self.domain.htn(), state, root)
            .map(<[ActionId]>::len);
        let expansions = u64::from(self.htn.last_stats().expansions);
        match outcome {
            Ok(len) => self.emit(tags::HTN_PLAN_OK, len as u64, expansions),
            Err(err) => {
                self.emit(tags::HTN_PLAN_FAIL, err.status().code(), expansions);
                return Err(err);
            }
        }
        Ok(self.htn.last_plan())
    }

    /// Plan a goal preset with the given strategy. HTN goals decompose their root task.
    pub fn plan_for_goal(
        &mut self,
        state: WorldState,
        goal: GoalPresetId,
        strategy: PlanningStrategy,
    ) -> Result<&[ActionId], PlanError> {
        match strategy {
            PlanningStrategy::Goap => self.plan_goap(state, goal),
            PlanningStrategy::Htn => {
                let Some(root) = self.domain.roots().root(goal) else {
                    return Err(PlanError::UnknownGoal { goal: goal.0 });
                };
                self.plan_htn(&state, root)
            }
        }
    }

    /// Select a goal for `state` and plan it with the goal's strategy.
    pub fn plan_for_state(
        &mut self,
        state: WorldState,
        blackboard: &dyn BlackboardView,
    ) -> Result<PlannedGoal<'_>, PlanError> {
        let choice = self.select_goal(&state, blackboard).ok_or(PlanError::NoGoal)?;
        let actions = self.plan_for_goal(state, choice.goal, choice.strategy)?;
        Ok(PlannedGoal { choice, actions })
    }

    /// Submit the order for one planned action.
    pub fn execute_action(
        &mut self,
        action: ActionId,
        actor: EntityRef,
        blackboard: &dyn BlackboardView,
        queue: &mut dyn OrderQueue,
    ) -> Result<Order, ExecuteError> {
        let result =
            plan_core::execute_action(self.domain.actions(), action, actor, blackboard, queue);
        match &result {
            Ok(order) => self.emit(tags::EXEC_SUBMIT, u64::from(action.0), u64::from(order.tag.0)),
            Err(err) => {
                tracing::debug!(action = action.0, error = %err, "order not submitted");
                self.emit(tags::EXEC_DROP, u64::from(action.0), 0);
            }
        }
        result
    }
}
