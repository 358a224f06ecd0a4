use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AtomError;
use crate::MAX_ATOMS;

/// Interned world-state fact. The id is the bit index inside a [`crate::WorldState`].
///
/// Backed by a `u8`, so every value is a valid atom; range checks happen in [`AtomRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AtomId(pub u8);

impl AtomId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) fn from_index(index: usize) -> Self {
        debug_assert!(index < MAX_ATOMS);
        Self(index as u8)
    }
}

/// Name ⇄ id interning for atoms.
///
/// Ids are handed out densely in registration order, so a config that lists atoms in a fixed order
/// always compiles to the same ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomRegistry {
    names: Vec<String>,
    ids: BTreeMap<String, AtomId>,
    capacity: usize,
}

impl Default for AtomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AtomRegistry {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ATOMS)
    }

    /// Registry holding at most `capacity` atoms (clamped to 256).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.min(MAX_ATOMS);
        Self {
            names: Vec::with_capacity(capacity),
            ids: BTreeMap::new(),
            capacity,
        }
    }

    /// Register every name in order. Duplicates resolve to the first id.
    pub fn from_names<I, N>(names: I) -> Result<Self, AtomError>
    where
        I: IntoIterator<Item = N>,
        N: AsRef<str>,
    {
        let mut registry = Self::new();
        for name in names {
            registry.get_or_add(name.as_ref())?;
        }
        Ok(registry)
    }

    pub fn get_or_add(&mut self, name: &str) -> Result<AtomId, AtomError> {
        if let Some(id) = self.ids.get(name) {
            return Ok(*id);
        }
        if self.names.len() >= self.capacity {
            return Err(AtomError::CapacityExceeded {
                name: name.to_string(),
                capacity: self.capacity,
            });
        }

        let id = AtomId::from_index(self.names.len());
        self.names.push(name.to_string());
        self.ids.insert(name.to_string(), id);
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<AtomId> {
        self.ids.get(name).copied()
    }

    pub fn name(&self, id: AtomId) -> Option<&str> {
        self.names.get(id.index()).map(String::as_str)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(id, name)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (AtomId, &str)> + '_ {
        self.names
            .iter()
            .enumerate()
            .map(|(i, name)| (AtomId::from_index(i), name.as_str()))
    }
}
