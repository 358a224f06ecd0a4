//! Name resolution from [`DomainConfig`] to the planners' flat tables.

use std::collections::BTreeMap;

use plan_core::{
    ActionDefinition, ActionId, ActionLibrary, AtomError, AtomId, AtomRegistry, CompileError,
    CompileErrors, Condition, EntityKey, GoalPresetId, IntKey, OrderSpec, ParamBinding,
    PlanningStrategy, ProjectionOp, ProjectionRule, ProjectionTable, TagId, ORDER_ARGS,
};
use plan_goap::{GoalTable, GoapGoal, GoapGoalDefinition};
use plan_htn::{HtnDomain, HtnRootTable, MethodDefinition, TaskDefinition, TaskId};
use plan_utility::{
    Consideration, UtilityGoalDefinition, UtilitySelector, UtilitySelectorConfig,
};

use crate::config::{
    ActionConfig, BindingConfig, ConsiderationConfig, DomainConfig, FactConfig, ProjectionOpConfig,
    SubtaskConfig,
};

/// Gameplay-owned name → id maps the domain refers to (order tags, blackboard keys).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Vocabulary {
    pub tags: BTreeMap<String, TagId>,
    pub int_keys: BTreeMap<String, IntKey>,
    pub entity_keys: BTreeMap<String, EntityKey>,
}

impl Vocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, name: impl Into<String>, tag: TagId) -> Self {
        self.tags.insert(name.into(), tag);
        self
    }

    pub fn with_int_key(mut self, name: impl Into<String>, key: IntKey) -> Self {
        self.int_keys.insert(name.into(), key);
        self
    }

    pub fn with_entity_key(mut self, name: impl Into<String>, key: EntityKey) -> Self {
        self.entity_keys.insert(name.into(), key);
        self
    }
}

/// Every table a planning agent reads, compiled once and shared read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledDomain {
    atoms: AtomRegistry,
    projection: ProjectionTable,
    actions: ActionLibrary,
    goals: GoalTable,
    htn: HtnDomain,
    roots: HtnRootTable,
    utility: UtilitySelector,
}

impl CompiledDomain {
    /// Resolve every name in `config`.
    ///
    /// All diagnostics are collected before returning; on error no table is produced. Compiling
    /// the same config twice yields equal domains.
    pub fn compile(
        config: &DomainConfig,
        vocabulary: &Vocabulary,
    ) -> Result<CompiledDomain, CompileErrors> {
        let mut cx = Compiler {
            vocabulary,
            atoms: AtomRegistry::new(),
            errors: CompileErrors::new(),
        };

        cx.register_atoms(&config.atoms);
        let projection = cx.projection(config);
        let (actions, action_ids) = cx.actions(&config.actions);
        let (goals, goal_ids) = cx.goals(config);
        let (htn, task_ids) = cx.tasks(config, &action_ids);
        let roots = cx.roots(config, htn.as_ref(), &task_ids);
        let utility = cx.utility(config, &goal_ids);
        let htn = htn.unwrap_or_default();

        let Compiler { atoms, errors, .. } = cx;
        if !errors.is_empty() {
            tracing::warn!(errors = errors.len(), "domain compile failed");
            return Err(errors);
        }

        tracing::info!(
            atoms = atoms.len(),
            actions = actions.len(),
            goals = goals.len(),
            tasks = htn.task_count(),
            utility_goals = utility.len(),
            "compiled planning domain"
        );
        Ok(CompiledDomain {
            atoms,
            projection,
            actions,
            goals,
            htn,
            roots,
            utility,
        })
    }

    pub fn atoms(&self) -> &AtomRegistry {
        &self.atoms
    }

    pub fn projection(&self) -> &ProjectionTable {
        &self.projection
    }

    pub fn actions(&self) -> &ActionLibrary {
        &self.actions
    }

    pub fn goals(&self) -> &GoalTable {
        &self.goals
    }

    pub fn htn(&self) -> &HtnDomain {
        &self.htn
    }

    pub fn roots(&self) -> &HtnRootTable {
        &self.roots
    }

    pub fn utility(&self) -> &UtilitySelector {
        &self.utility
    }

    pub fn atom(&self, name: &str) -> Option<AtomId> {
        self.atoms.get(name)
    }

    pub fn action(&self, name: &str) -> Option<ActionId> {
        self.actions.find(name)
    }

    pub fn goal(&self, name: &str) -> Option<GoalPresetId> {
        self.goals.find(name)
    }

    pub fn task(&self, name: &str) -> Option<TaskId> {
        self.htn.find_task(name)
    }
}

struct Compiler<'v> {
    vocabulary: &'v Vocabulary,
    atoms: AtomRegistry,
    errors: CompileErrors,
}

/// Dense name → id map built in declaration order; the first of two equal names wins.
fn index_names<'a, T>(
    names: impl Iterator<Item = &'a str>,
    kind: &'static str,
    id: impl Fn(u32) -> T,
    errors: &mut CompileErrors,
) -> BTreeMap<&'a str, T> {
    let mut map = BTreeMap::new();
    for (i, name) in names.enumerate() {
        if map.contains_key(name) {
            errors.push(CompileError::DuplicateName {
                kind,
                name: name.to_owned(),
            });
            continue;
        }
        map.insert(name, id(i as u32));
    }
    map
}

impl Compiler<'_> {
    fn register_atoms(&mut self, names: &[String]) {
        for name in names {
            if self.atoms.get(name).is_some() {
                self.errors.push(CompileError::DuplicateName {
                    kind: "atom",
                    name: name.clone(),
                });
                continue;
            }
            if let Err(err) = self.atoms.get_or_add(name) {
                self.errors.push(err.into());
            }
        }
    }

    fn atom(&mut self, name: &str, context: &str) -> Option<AtomId> {
        let atom = self.atoms.get(name);
        if atom.is_none() && !self.is_overflowed_atom(name) {
            self.errors.push(CompileError::UnknownAtom {
                context: context.to_owned(),
                name: name.to_owned(),
            });
        }
        atom
    }

    /// Atoms that were declared but didn't fit are already reported as a capacity error.
    fn is_overflowed_atom(&self, name: &str) -> bool {
        self.errors.iter().any(|e| {
            matches!(e, CompileError::Atom(AtomError::CapacityExceeded { name: n, .. }) if n == name)
        })
    }

    fn condition(&mut self, facts: &[FactConfig], context: &str) -> Condition {
        let mut condition = Condition::always();
        for fact in facts {
            let Some(atom) = self.atom(&fact.atom, context) else {
                continue;
            };
            match condition.get(atom) {
                Some(existing) if existing != fact.value => {
                    self.errors.push(CompileError::ConflictingFact {
                        context: context.to_owned(),
                        atom: fact.atom.clone(),
                    });
                }
                _ => condition = condition.require(atom, fact.value),
            }
        }
        condition
    }

    fn int_key(&mut self, name: &str, context: &str) -> Option<IntKey> {
        let key = self.vocabulary.int_keys.get(name).copied();
        if key.is_none() {
            self.errors.push(CompileError::UnknownIntKey {
                context: context.to_owned(),
                name: name.to_owned(),
            });
        }
        key
    }

    fn entity_key(&mut self, name: &str, context: &str) -> Option<EntityKey> {
        let key = self.vocabulary.entity_keys.get(name).copied();
        if key.is_none() {
            self.errors.push(CompileError::UnknownEntityKey {
                context: context.to_owned(),
                name: name.to_owned(),
            });
        }
        key
    }

    fn projection(&mut self, config: &DomainConfig) -> ProjectionTable {
        let mut rules = Vec::with_capacity(config.projections.len());
        for (i, rule) in config.projections.iter().enumerate() {
            let context = format!("projection #{i} (`{}`)", rule.atom);
            let atom = self.atom(&rule.atom, &context);
            let op = match &rule.op {
                ProjectionOpConfig::IntEquals { key, value } => self
                    .int_key(key, &context)
                    .map(|key| ProjectionOp::IntEquals { key, value: *value }),
                ProjectionOpConfig::IntAtLeast { key, value } => self
                    .int_key(key, &context)
                    .map(|key| ProjectionOp::IntAtLeast { key, value: *value }),
                ProjectionOpConfig::IntAtMost { key, value } => self
                    .int_key(key, &context)
                    .map(|key| ProjectionOp::IntAtMost { key, value: *value }),
                ProjectionOpConfig::EntityPresent { key } => self
                    .entity_key(key, &context)
                    .map(|key| ProjectionOp::EntityPresent { key }),
                ProjectionOpConfig::EntityAbsent { key } => self
                    .entity_key(key, &context)
                    .map(|key| ProjectionOp::EntityAbsent { key }),
            };
            if let (Some(atom), Some(op)) = (atom, op) {
                rules.push(ProjectionRule { atom, op });
            }
        }
        ProjectionTable::new(rules)
    }

    fn actions<'c>(
        &mut self,
        configs: &'c [ActionConfig],
    ) -> (ActionLibrary, BTreeMap<&'c str, ActionId>) {
        let ids = index_names(
            configs.iter().map(|a| a.name.as_str()),
            "action",
            ActionId,
            &mut self.errors,
        );

        let mut definitions = Vec::with_capacity(configs.len());
        for action in configs {
            let context = format!("action `{}`", action.name);
            let pre = self.condition(&action.pre, &context);
            let post = self.condition(&action.post, &context);

            let mut order = OrderSpec::default();
            if let Some(spec) = &action.order {
                match self.vocabulary.tags.get(&spec.tag) {
                    Some(tag) => order.tag = *tag,
                    None => self.errors.push(CompileError::UnknownTag {
                        context: context.clone(),
                        name: spec.tag.clone(),
                    }),
                }
                order.mode = spec.mode;
                order.player = spec.player;
            }

            let mut definition =
                ActionDefinition::new(action.name.clone(), pre, post, action.cost).with_order(order);
            definition.executor = action.executor;
            for binding in &action.bindings {
                if let Some(binding) = self.binding(binding, &context) {
                    definition = definition.with_binding(binding);
                }
            }
            definitions.push(definition);
        }

        (ActionLibrary::compile(definitions), ids)
    }

    fn binding(&mut self, binding: &BindingConfig, context: &str) -> Option<ParamBinding> {
        match binding {
            BindingConfig::IntToArg { key, slot } => {
                let key = self.int_key(key, context);
                if *slot as usize >= ORDER_ARGS {
                    self.errors.push(CompileError::ArgSlotOutOfRange {
                        context: context.to_owned(),
                        slot: *slot,
                    });
                    return None;
                }
                key.map(|key| ParamBinding::IntToArg { key, slot: *slot })
            }
            BindingConfig::EntityToTarget { key } => self
                .entity_key(key, context)
                .map(|key| ParamBinding::EntityToTarget { key }),
            BindingConfig::EntityToTargetContext { key } => self
                .entity_key(key, context)
                .map(|key| ParamBinding::EntityToTargetContext { key }),
        }
    }

    fn goals<'c>(
        &mut self,
        config: &'c DomainConfig,
    ) -> (GoalTable, BTreeMap<&'c str, GoalPresetId>) {
        let ids = index_names(
            config.goals.iter().map(|g| g.name.as_str()),
            "goal",
            GoalPresetId,
            &mut self.errors,
        );

        let mut definitions = Vec::with_capacity(config.goals.len());
        for goal in &config.goals {
            let context = format!("goal `{}`", goal.name);
            let condition = self.condition(&goal.condition, &context);
            definitions.push(GoapGoalDefinition {
                name: goal.name.clone(),
                goal: GoapGoal::new(condition).with_weight(goal.heuristic_weight),
            });
        }
        (GoalTable::new(definitions), ids)
    }

    fn tasks<'c>(
        &mut self,
        config: &'c DomainConfig,
        action_ids: &BTreeMap<&str, ActionId>,
    ) -> (Option<HtnDomain>, BTreeMap<&'c str, TaskId>) {
        let ids = index_names(
            config.tasks.iter().map(|t| t.name.as_str()),
            "task",
            TaskId,
            &mut self.errors,
        );

        let mut definitions = Vec::with_capacity(config.tasks.len());
        for task in &config.tasks {
            let mut definition = TaskDefinition::new(task.name.clone());
            for method in &task.methods {
                let context = format!("task `{}` method `{}`", task.name, method.name);
                let condition = self.condition(&method.condition, &context);
                let mut compiled = MethodDefinition::new(method.name.clone(), condition, method.cost);
                for subtask in &method.subtasks {
                    match subtask {
                        SubtaskConfig::Action(name) => match action_ids.get(name.as_str()) {
                            Some(id) => compiled = compiled.action(*id),
                            None => self.errors.push(CompileError::UnknownAction {
                                context: context.clone(),
                                name: name.clone(),
                            }),
                        },
                        SubtaskConfig::Task(name) => match ids.get(name.as_str()) {
                            Some(id) => compiled = compiled.task(*id),
                            None => self.errors.push(CompileError::UnknownTask {
                                context: context.clone(),
                                name: name.clone(),
                            }),
                        },
                    }
                }
                definition = definition.method(compiled);
            }
            definitions.push(definition);
        }

        let domain = match HtnDomain::compile(definitions, config.actions.len()) {
            Ok(domain) => Some(domain),
            Err(errors) => {
                self.errors.extend(errors);
                None
            }
        };
        (domain, ids)
    }

    fn roots(
        &mut self,
        config: &DomainConfig,
        htn: Option<&HtnDomain>,
        task_ids: &BTreeMap<&str, TaskId>,
    ) -> HtnRootTable {
        let mut entries = Vec::new();
        for (i, goal) in config.goals.iter().enumerate() {
            let Some(task) = &goal.root_task else {
                continue;
            };
            match task_ids.get(task.as_str()) {
                Some(id) => entries.push((GoalPresetId(i as u32), *id)),
                None => self.errors.push(CompileError::UnknownTask {
                    context: format!("goal `{}` root", goal.name),
                    name: task.clone(),
                }),
            }
        }

        // Without a domain the roots can't be range-checked; its diagnostics are already recorded.
        let Some(htn) = htn else {
            return HtnRootTable::default();
        };
        match HtnRootTable::new(entries, htn) {
            Ok(roots) => roots,
            Err(errors) => {
                self.errors.extend(errors);
                HtnRootTable::default()
            }
        }
    }

    fn utility(
        &mut self,
        config: &DomainConfig,
        goal_ids: &BTreeMap<&str, GoalPresetId>,
    ) -> UtilitySelector {
        let mut definitions = Vec::with_capacity(config.utility.len());
        for (i, entry) in config.utility.iter().enumerate() {
            let context = format!("utility goal #{i} (`{}`)", entry.goal);
            let Some(goal) = goal_ids.get(entry.goal.as_str()).copied() else {
                self.errors.push(CompileError::UnknownGoal {
                    context,
                    name: entry.goal.clone(),
                });
                continue;
            };

            let declares_root = config
                .goals
                .get(goal.index())
                .is_some_and(|g| g.root_task.is_some());
            if entry.strategy == PlanningStrategy::Htn && !declares_root {
                self.errors.push(CompileError::MissingRootTask {
                    context: context.clone(),
                    goal: entry.goal.clone(),
                });
            }

            let mut definition = UtilityGoalDefinition::new(goal, entry.strategy, entry.base_weight);
            for consideration in &entry.considerations {
                let consideration = match consideration {
                    ConsiderationConfig::Atom {
                        atom,
                        if_true,
                        if_false,
                    } => self
                        .atom(atom, &context)
                        .map(|atom| Consideration::atom(atom, *if_true, *if_false)),
                    ConsiderationConfig::IntRange {
                        key,
                        min,
                        max,
                        low,
                        high,
                    } => self.int_key(key, &context).map(|key| Consideration::IntRange {
                        key,
                        min: *min,
                        max: *max,
                        low: *low,
                        high: *high,
                    }),
                };
                if let Some(consideration) = consideration {
                    definition = definition.with(consideration);
                }
            }
            definitions.push(definition);
        }

        UtilitySelector::compile(definitions).with_config(UtilitySelectorConfig {
            min_score: config.min_utility_score,
        })
    }
}
