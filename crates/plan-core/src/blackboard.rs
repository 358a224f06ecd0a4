use std::collections::BTreeMap;
use std::marker::PhantomData;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque handle to a gameplay entity. "No entity" is `None` at every API boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityRef(pub u64);

/// Serializes as its bare id.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent, bound = ""))]
pub struct BbKey<T: 'static> {
    id: u64,
    #[cfg_attr(feature = "serde", serde(skip))]
    _phantom: PhantomData<fn() -> T>,
}

impl<T: 'static> Copy for BbKey<T> {}

impl<T: 'static> Clone for BbKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> BbKey<T> {
    pub const fn new(id: u64) -> Self {
        Self {
            id,
            _phantom: PhantomData,
        }
    }

    pub fn id(self) -> u64 {
        self.id
    }
}

pub type IntKey = BbKey<i32>;
pub type EntityKey = BbKey<EntityRef>;

/// Read access to an agent's int/entity blackboard.
///
/// Gameplay code usually implements this over its own storage; [`Blackboard`] is the in-crate
/// implementation.
pub trait BlackboardView {
    fn int(&self, key: IntKey) -> Option<i32>;
    fn entity(&self, key: EntityKey) -> Option<EntityRef>;
}

mod sealed {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for super::EntityRef {}
}

/// Value types a [`Blackboard`] can store.
pub trait BbValue: sealed::Sealed + Copy + 'static {
    #[doc(hidden)]
    fn slots(bb: &Blackboard) -> &BTreeMap<u64, Self>;
    #[doc(hidden)]
    fn slots_mut(bb: &mut Blackboard) -> &mut BTreeMap<u64, Self>;
}

impl BbValue for i32 {
    fn slots(bb: &Blackboard) -> &BTreeMap<u64, Self> {
        &bb.ints
    }

    fn slots_mut(bb: &mut Blackboard) -> &mut BTreeMap<u64, Self> {
        &mut bb.ints
    }
}

impl BbValue for EntityRef {
    fn slots(bb: &Blackboard) -> &BTreeMap<u64, Self> {
        &bb.entities
    }

    fn slots_mut(bb: &mut Blackboard) -> &mut BTreeMap<u64, Self> {
        &mut bb.entities
    }
}

/// Typed int/entity key-value store.
///
/// Ints and entities live in separate maps, so the same numeric id may be used for one key of each
/// type without colliding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blackboard {
    ints: BTreeMap<u64, i32>,
    entities: BTreeMap<u64, EntityRef>,
}

impl Blackboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.ints.clear();
        self.entities.clear();
    }

    pub fn contains<T: BbValue>(&self, key: BbKey<T>) -> bool {
        T::slots(self).contains_key(&key.id)
    }

    pub fn set<T: BbValue>(&mut self, key: BbKey<T>, value: T) {
        T::slots_mut(self).insert(key.id, value);
    }

    pub fn get<T: BbValue>(&self, key: BbKey<T>) -> Option<T> {
        T::slots(self).get(&key.id).copied()
    }

    pub fn remove<T: BbValue>(&mut self, key: BbKey<T>) -> Option<T> {
        T::slots_mut(self).remove(&key.id)
    }
}

impl BlackboardView for Blackboard {
    fn int(&self, key: IntKey) -> Option<i32> {
        self.get(key)
    }

    fn entity(&self, key: EntityKey) -> Option<EntityRef> {
        self.get(key)
    }
}
