//! Compiled action tables and the candidate index.
//!
//! Actions are flattened into parallel arrays indexed by a dense [`ActionId`]. The id of an action
//! is its position in the definition list handed to [`ActionLibrary::compile`] and stays stable
//! for the lifetime of the library.

use core::ops::Range;
use core::slice;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::bitset::Ones;
use crate::executor::{ExecutorKind, OrderSpec, ParamBinding};
use crate::{Condition, WorldState, MAX_ATOMS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ActionId(pub u32);

impl ActionId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// An action with every name already resolved to ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionDefinition {
    pub name: String,
    pub pre: Condition,
    pub post: Condition,
    pub cost: u32,
    pub executor: ExecutorKind,
    pub order: OrderSpec,
    pub bindings: Vec<ParamBinding>,
}

impl ActionDefinition {
    /// A submit-order action with no bindings.
    pub fn new(name: impl Into<String>, pre: Condition, post: Condition, cost: u32) -> Self {
        Self {
            name: name.into(),
            pre,
            post,
            cost,
            executor: ExecutorKind::SubmitOrder,
            order: OrderSpec::default(),
            bindings: Vec::new(),
        }
    }

    pub fn with_order(mut self, order: OrderSpec) -> Self {
        self.order = order;
        self
    }

    pub fn with_binding(mut self, binding: ParamBinding) -> Self {
        self.bindings.push(binding);
        self
    }
}

/// Bucket holding actions without a positive precondition atom.
pub const ALWAYS_BUCKET: usize = MAX_ATOMS;
/// 256 atom buckets plus [`ALWAYS_BUCKET`].
pub const BUCKET_COUNT: usize = MAX_ATOMS + 1;

/// Bucket an action with precondition `pre` is filed under: its key atom (lowest atom required to
/// be true), or [`ALWAYS_BUCKET`].
pub fn key_bucket(pre: &Condition) -> usize {
    pre.positive()
        .lowest_set_bit()
        .map_or(ALWAYS_BUCKET, |atom| atom.index())
}

/// Action ids grouped by key atom, flattened by counting sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateIndex {
    /// `BUCKET_COUNT + 1` prefix-summed offsets into `actions`.
    offsets: Vec<u32>,
    actions: Vec<ActionId>,
}

impl CandidateIndex {
    pub fn build(preconditions: &[Condition]) -> Self {
        let mut counts = vec![0u32; BUCKET_COUNT];
        for pre in preconditions {
            counts[key_bucket(pre)] += 1;
        }

        let mut offsets = vec![0u32; BUCKET_COUNT + 1];
        for bucket in 0..BUCKET_COUNT {
            offsets[bucket + 1] = offsets[bucket] + counts[bucket];
        }

        let mut cursor: Vec<u32> = offsets[..BUCKET_COUNT].to_vec();
        let mut actions = vec![ActionId(0); preconditions.len()];
        for (i, pre) in preconditions.iter().enumerate() {
            let bucket = key_bucket(pre);
            actions[cursor[bucket] as usize] = ActionId(i as u32);
            cursor[bucket] += 1;
        }

        Self { offsets, actions }
    }

    fn range(&self, bucket: usize) -> Range<usize> {
        self.offsets[bucket] as usize..self.offsets[bucket + 1] as usize
    }

    /// Actions filed under `bucket` (an atom index, or [`ALWAYS_BUCKET`]), in id order.
    pub fn bucket(&self, bucket: usize) -> &[ActionId] {
        if bucket >= BUCKET_COUNT {
            return &[];
        }
        &self.actions[self.range(bucket)]
    }

    pub fn always(&self) -> &[ActionId] {
        self.bucket(ALWAYS_BUCKET)
    }

    /// Which bucket holds `action`. Linear; meant for inspection and tests.
    pub fn bucket_of(&self, action: ActionId) -> Option<usize> {
        (0..BUCKET_COUNT).find(|b| self.bucket(*b).contains(&action))
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Actions worth testing against `state`: the always bucket, then the bucket of each atom set
    /// in `state` in ascending order.
    pub fn candidates(&self, state: &WorldState) -> Candidates<'_> {
        Candidates {
            index: self,
            atoms: state.iter_ones(),
            current: self.always().iter(),
        }
    }
}

/// Allocation-free candidate enumeration. See [`CandidateIndex::candidates`].
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    index: &'a CandidateIndex,
    atoms: Ones,
    current: slice::Iter<'a, ActionId>,
}

impl Iterator for Candidates<'_> {
    type Item = ActionId;

    fn next(&mut self) -> Option<ActionId> {
        loop {
            if let Some(action) = self.current.next() {
                return Some(*action);
            }
            let atom = self.atoms.next()?;
            self.current = self.index.bucket(atom.index()).iter();
        }
    }
}

/// Immutable, flat action tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLibrary {
    names: Vec<String>,
    pre: Vec<Condition>,
    post: Vec<Condition>,
    costs: Vec<u32>,
    executors: Vec<ExecutorKind>,
    orders: Vec<OrderSpec>,
    binding_ranges: Vec<(u32, u32)>,
    bindings: Vec<ParamBinding>,
    index: CandidateIndex,
}

impl ActionLibrary {
    pub fn compile(definitions: Vec<ActionDefinition>) -> Self {
        let n = definitions.len();
        let mut names = Vec::with_capacity(n);
        let mut pre = Vec::with_capacity(n);
        let mut post = Vec::with_capacity(n);
        let mut costs = Vec::with_capacity(n);
        let mut executors = Vec::with_capacity(n);
        let mut orders = Vec::with_capacity(n);
        let mut binding_ranges = Vec::with_capacity(n);
        let mut bindings = Vec::new();

        for def in definitions {
            names.push(def.name);
            pre.push(def.pre);
            post.push(def.post);
            costs.push(def.cost);
            executors.push(def.executor);
            orders.push(def.order);
            let start = bindings.len() as u32;
            bindings.extend(def.bindings);
            binding_ranges.push((start, bindings.len() as u32 - start));
        }

        let index = CandidateIndex::build(&pre);
        tracing::debug!(
            actions = n,
            always = index.always().len(),
            "compiled action library"
        );

        Self {
            names,
            pre,
            post,
            costs,
            executors,
            orders,
            binding_ranges,
            bindings,
            index,
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, action: ActionId) -> bool {
        action.index() < self.names.len()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = ActionId> {
        (0..self.names.len() as u32).map(ActionId)
    }

    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| ActionId(i as u32))
    }

    pub fn name(&self, action: ActionId) -> Option<&str> {
        self.names.get(action.index()).map(String::as_str)
    }

    pub fn precondition(&self, action: ActionId) -> Option<&Condition> {
        self.pre.get(action.index())
    }

    pub fn postcondition(&self, action: ActionId) -> Option<&Condition> {
        self.post.get(action.index())
    }

    pub fn cost(&self, action: ActionId) -> Option<u32> {
        self.costs.get(action.index()).copied()
    }

    pub fn executor(&self, action: ActionId) -> Option<ExecutorKind> {
        self.executors.get(action.index()).copied()
    }

    pub fn order(&self, action: ActionId) -> Option<&OrderSpec> {
        self.orders.get(action.index())
    }

    pub fn bindings(&self, action: ActionId) -> &[ParamBinding] {
        match self.binding_ranges.get(action.index()) {
            Some(&(start, len)) => &self.bindings[start as usize..(start + len) as usize],
            None => &[],
        }
    }

    /// `false` for unknown ids.
    #[inline]
    pub fn is_applicable(&self, action: ActionId, state: &WorldState) -> bool {
        self.pre
            .get(action.index())
            .is_some_and(|pre| state.matches(pre))
    }

    /// State after `action`'s postcondition. Unknown ids leave the state unchanged.
    #[inline]
    pub fn apply_post(&self, action: ActionId, state: &WorldState) -> WorldState {
        match self.post.get(action.index()) {
            Some(post) => state.apply(post),
            None => *state,
        }
    }

    pub fn index(&self) -> &CandidateIndex {
        &self.index
    }

    pub fn candidates(&self, state: &WorldState) -> Candidates<'_> {
        self.index.candidates(state)
    }

    /// Actions whose full precondition holds in `state`, in candidate order.
    pub fn applicable<'a>(&'a self, state: &'a WorldState) -> impl Iterator<Item = ActionId> + 'a {
        self.candidates(state)
            .filter(move |a| self.is_applicable(*a, state))
    }

    /// Sum of costs over `plan`; `None` if any id is unknown.
    pub fn plan_cost(&self, plan: &[ActionId]) -> Option<u64> {
        plan.iter()
            .map(|a| self.cost(*a).map(u64::from))
            .sum()
    }
}
