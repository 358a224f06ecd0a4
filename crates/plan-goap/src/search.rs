//! Fixed-capacity search structures backing the A* planner.
//!
//! Nodes are addressed by `u32` index into parallel arrays; parent links are indices too.

use core::cmp::Ordering;

use plan_core::{ActionId, WorldState};

pub(crate) const NO_PARENT: u32 = u32::MAX;
const NO_ACTION: ActionId = ActionId(u32::MAX);

#[derive(Debug)]
pub(crate) struct NodePool {
    states: Vec<WorldState>,
    parents: Vec<u32>,
    actions: Vec<ActionId>,
    g: Vec<u32>,
    capacity: usize,
}

impl NodePool {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            states: Vec::with_capacity(capacity),
            parents: Vec::with_capacity(capacity),
            actions: Vec::with_capacity(capacity),
            g: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub(crate) fn reset(&mut self) {
        self.states.clear();
        self.parents.clear();
        self.actions.clear();
        self.g.clear();
    }

    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    pub(crate) fn len(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn alloc_root(&mut self, state: WorldState) -> Option<u32> {
        self.alloc(state, NO_PARENT, NO_ACTION, 0)
    }

    /// `None` once `capacity` nodes are live.
    pub(crate) fn alloc(
        &mut self,
        state: WorldState,
        parent: u32,
        action: ActionId,
        g: u32,
    ) -> Option<u32> {
        if self.states.len() >= self.capacity {
            return None;
        }
        let index = self.states.len() as u32;
        self.states.push(state);
        self.parents.push(parent);
        self.actions.push(action);
        self.g.push(g);
        Some(index)
    }

    /// Record a cheaper path to an existing node.
    pub(crate) fn relax(&mut self, node: u32, parent: u32, action: ActionId, g: u32) {
        let i = node as usize;
        self.parents[i] = parent;
        self.actions[i] = action;
        self.g[i] = g;
    }

    pub(crate) fn state(&self, node: u32) -> WorldState {
        self.states[node as usize]
    }

    pub(crate) fn g(&self, node: u32) -> u32 {
        self.g[node as usize]
    }

    pub(crate) fn parent(&self, node: u32) -> u32 {
        self.parents[node as usize]
    }

    pub(crate) fn action(&self, node: u32) -> ActionId {
        self.actions[node as usize]
    }

    /// Number of actions on the path from the root to `node`.
    pub(crate) fn depth(&self, node: u32) -> usize {
        let mut depth = 0;
        let mut current = node;
        while self.parent(current) != NO_PARENT {
            depth += 1;
            current = self.parent(current);
        }
        depth
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Slot {
    generation: u32,
    node: u32,
}

pub(crate) enum Probe {
    Found(u32),
    Vacant(usize),
    Full,
}

/// Open-addressing `state -> node` map with linear probing.
///
/// Slots carry the generation they were written in; bumping the generation empties the table
/// without touching memory.
#[derive(Debug)]
pub(crate) struct VisitedTable {
    slots: Vec<Slot>,
    mask: usize,
    generation: u32,
}

impl VisitedTable {
    /// Power-of-two slot count, at least twice `node_capacity`.
    pub(crate) fn for_nodes(node_capacity: usize) -> Self {
        let len = node_capacity.saturating_mul(2).max(2).next_power_of_two();
        Self {
            slots: vec![Slot::default(); len],
            mask: len - 1,
            generation: 1,
        }
    }

    pub(crate) fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub(crate) fn reset(&mut self) {
        self.generation = self.generation.wrapping_add(1);
        if self.generation == 0 {
            self.slots.fill(Slot::default());
            self.generation = 1;
        }
    }

    pub(crate) fn probe(&self, state: &WorldState, nodes: &NodePool) -> Probe {
        let start = state.state_hash() as usize & self.mask;
        for i in 0..self.slots.len() {
            let index = (start + i) & self.mask;
            let slot = self.slots[index];
            if slot.generation != self.generation {
                return Probe::Vacant(index);
            }
            if nodes.state(slot.node) == *state {
                return Probe::Found(slot.node);
            }
        }
        Probe::Full
    }

    pub(crate) fn occupy(&mut self, index: usize, node: u32) {
        self.slots[index] = Slot {
            generation: self.generation,
            node,
        };
    }
}

/// Open-list entry. Ordered so `BinaryHeap` pops the lowest `(f, g, seq)` first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct OpenEntry {
    pub(crate) f: u32,
    pub(crate) g: u32,
    pub(crate) seq: u32,
    pub(crate) node: u32,
}

impl OpenEntry {
    fn key(&self) -> (u32, u32, u32) {
        (self.f, self.g, self.seq)
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap behave like a min-heap.
        other.key().cmp(&self.key())
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
