use core::ops::Range;
use std::collections::BTreeMap;

use plan_core::{ActionId, CompileError, CompileErrors, Condition, GoalPresetId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub u32);

impl TaskId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subtask {
    Action(ActionId),
    Compound(TaskId),
}

/// A compound task: the contiguous method range `first_method..first_method + method_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompoundTask {
    pub first_method: u32,
    pub method_count: u32,
}

impl CompoundTask {
    pub fn methods(&self) -> Range<u32> {
        self.first_method..self.first_method + self.method_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Method {
    pub condition: Condition,
    pub cost: u32,
    pub first_subtask: u32,
    pub subtask_count: u32,
}

impl Method {
    pub fn subtasks(&self) -> Range<usize> {
        self.first_subtask as usize..(self.first_subtask + self.subtask_count) as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDefinition {
    pub name: String,
    pub condition: Condition,
    pub cost: u32,
    pub subtasks: Vec<Subtask>,
}

impl MethodDefinition {
    pub fn new(name: impl Into<String>, condition: Condition, cost: u32) -> Self {
        Self {
            name: name.into(),
            condition,
            cost,
            subtasks: Vec::new(),
        }
    }

    pub fn action(mut self, action: ActionId) -> Self {
        self.subtasks.push(Subtask::Action(action));
        self
    }

    pub fn task(mut self, task: TaskId) -> Self {
        self.subtasks.push(Subtask::Compound(task));
        self
    }
}

/// A compound task with its methods in declaration order. Its [`TaskId`] is its position in the
/// list passed to [`HtnDomain::compile`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDefinition {
    pub name: String,
    pub methods: Vec<MethodDefinition>,
}

impl TaskDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn method(mut self, method: MethodDefinition) -> Self {
        self.methods.push(method);
        self
    }
}

/// Immutable compiled HTN domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtnDomain {
    task_names: Vec<String>,
    tasks: Vec<CompoundTask>,
    method_names: Vec<String>,
    methods: Vec<Method>,
    subtasks: Vec<Subtask>,
}

impl HtnDomain {
    /// Flatten task definitions. `action_count` is the size of the action library subtasks refer
    /// to; every id is range-checked and all problems are reported together.
    pub fn compile(
        definitions: Vec<TaskDefinition>,
        action_count: usize,
    ) -> Result<HtnDomain, CompileErrors> {
        let task_count = definitions.len();
        let mut errors = CompileErrors::new();
        let mut domain = HtnDomain::default();

        for task in definitions {
            if task.methods.is_empty() {
                errors.push(CompileError::TaskWithoutMethods {
                    task: task.name.clone(),
                });
            }

            domain.tasks.push(CompoundTask {
                first_method: domain.methods.len() as u32,
                method_count: task.methods.len() as u32,
            });

            for method in task.methods {
                let context = format!("task `{}` method `{}`", task.name, method.name);
                for subtask in &method.subtasks {
                    match *subtask {
                        Subtask::Action(action) if action.index() >= action_count => {
                            errors.push(CompileError::ActionOutOfRange {
                                context: context.clone(),
                                action: action.0,
                                len: action_count,
                            });
                        }
                        Subtask::Compound(child) if child.index() >= task_count => {
                            errors.push(CompileError::TaskOutOfRange {
                                context: context.clone(),
                                task: child.0,
                                len: task_count,
                            });
                        }
                        _ => {}
                    }
                }

                domain.methods.push(Method {
                    condition: method.condition,
                    cost: method.cost,
                    first_subtask: domain.subtasks.len() as u32,
                    subtask_count: method.subtasks.len() as u32,
                });
                domain.method_names.push(method.name);
                domain.subtasks.extend(method.subtasks);
            }
            domain.task_names.push(task.name);
        }

        if errors.is_empty() {
            tracing::debug!(
                tasks = domain.tasks.len(),
                methods = domain.methods.len(),
                subtasks = domain.subtasks.len(),
                "compiled htn domain"
            );
        }
        errors.into_result(domain)
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    pub fn task(&self, task: TaskId) -> Option<&CompoundTask> {
        self.tasks.get(task.index())
    }

    pub fn task_name(&self, task: TaskId) -> Option<&str> {
        self.task_names.get(task.index()).map(String::as_str)
    }

    pub fn find_task(&self, name: &str) -> Option<TaskId> {
        self.task_names
            .iter()
            .position(|n| n == name)
            .map(|i| TaskId(i as u32))
    }

    /// Method by absolute index into the methods array.
    pub fn method(&self, index: u32) -> Option<&Method> {
        self.methods.get(index as usize)
    }

    pub fn method_name(&self, index: u32) -> Option<&str> {
        self.method_names.get(index as usize).map(String::as_str)
    }

    pub fn subtasks(&self, method: &Method) -> &[Subtask] {
        &self.subtasks[method.subtasks()]
    }
}

/// Goal preset → root compound task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtnRootTable {
    roots: BTreeMap<GoalPresetId, TaskId>,
}

impl HtnRootTable {
    /// Build the table, rejecting roots that don't name a task of `domain`.
    pub fn new(
        entries: impl IntoIterator<Item = (GoalPresetId, TaskId)>,
        domain: &HtnDomain,
    ) -> Result<Self, CompileErrors> {
        let mut errors = CompileErrors::new();
        let mut roots = BTreeMap::new();
        for (goal, task) in entries {
            if domain.task(task).is_none() {
                errors.push(CompileError::TaskOutOfRange {
                    context: format!("htn root for goal preset {}", goal.0),
                    task: task.0,
                    len: domain.task_count(),
                });
                continue;
            }
            roots.insert(goal, task);
        }
        errors.into_result(Self { roots })
    }

    pub fn root(&self, goal: GoalPresetId) -> Option<TaskId> {
        self.roots.get(&goal).copied()
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (GoalPresetId, TaskId)> + '_ {
        self.roots.iter().map(|(g, t)| (*g, *t))
    }
}
