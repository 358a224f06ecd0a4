//! Fixed-width 256-bit world state and `(mask, values)` conditions.

use core::fmt;
use core::ops::{BitAnd, BitOr, BitXor, Not};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::AtomId;

/// Number of 64-bit words backing a [`WorldState`].
pub const WORDS: usize = 4;

/// Maximum number of atoms a [`WorldState`] can hold.
pub const MAX_ATOMS: usize = WORDS * 64;

/// A snapshot of every boolean fact an agent plans over.
///
/// Plain `Copy` value: four words, no heap. Equality, ordering and `Hash` are bit-for-bit.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldState {
    words: [u64; WORDS],
}

#[inline]
fn split(id: AtomId) -> (usize, u64) {
    let idx = id.index();
    (idx >> 6, 1u64 << (idx & 63))
}

impl WorldState {
    pub const EMPTY: WorldState = WorldState { words: [0; WORDS] };
    pub const FULL: WorldState = WorldState {
        words: [u64::MAX; WORDS],
    };

    pub const fn from_words(words: [u64; WORDS]) -> Self {
        Self { words }
    }

    pub const fn words(&self) -> [u64; WORDS] {
        self.words
    }

    /// Build a state with exactly the given atoms set.
    pub fn from_atoms(atoms: impl IntoIterator<Item = AtomId>) -> Self {
        let mut state = Self::EMPTY;
        for atom in atoms {
            state.set_bit(atom, true);
        }
        state
    }

    #[inline]
    pub fn set_bit(&mut self, id: AtomId, value: bool) {
        let (word, bit) = split(id);
        if value {
            self.words[word] |= bit;
        } else {
            self.words[word] &= !bit;
        }
    }

    #[inline]
    #[must_use]
    pub fn with_bit(mut self, id: AtomId, value: bool) -> Self {
        self.set_bit(id, value);
        self
    }

    #[inline]
    pub fn get_bit(&self, id: AtomId) -> bool {
        let (word, bit) = split(id);
        (self.words[word] & bit) != 0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.iter().all(|w| *w == 0)
    }

    #[inline]
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }

    /// Lowest-numbered atom that is set, if any.
    pub fn lowest_set_bit(&self) -> Option<AtomId> {
        self.words.iter().enumerate().find_map(|(i, w)| {
            (*w != 0).then(|| AtomId::from_index(i * 64 + w.trailing_zeros() as usize))
        })
    }

    /// Set atoms in ascending id order.
    pub fn iter_ones(&self) -> Ones {
        Ones {
            words: self.words,
            word: 0,
        }
    }

    /// `true` when every atom constrained by `condition` has the required value.
    #[inline]
    pub fn matches(&self, condition: &Condition) -> bool {
        (0..WORDS).all(|i| {
            let mask = condition.mask.words[i];
            (self.words[i] & mask) == (condition.values.words[i] & mask)
        })
    }

    /// Overwrite the atoms constrained by `effect` with its values.
    #[inline]
    #[must_use]
    pub fn apply(&self, effect: &Condition) -> Self {
        let mut words = [0u64; WORDS];
        for (i, out) in words.iter_mut().enumerate() {
            let mask = effect.mask.words[i];
            *out = (self.words[i] & !mask) | (effect.values.words[i] & mask);
        }
        Self { words }
    }

    /// Deterministic 64-bit hash over all four words.
    ///
    /// Independent of `std`'s randomly seeded hashers so probe sequences are identical run to run.
    #[inline]
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0x9E37_79B9_7F4A_7C15;
        for w in self.words {
            h = mix64(h ^ w);
        }
        h
    }

    #[inline]
    fn zip(self, other: Self, f: impl Fn(u64, u64) -> u64) -> Self {
        let mut words = [0u64; WORDS];
        for (i, out) in words.iter_mut().enumerate() {
            *out = f(self.words[i], other.words[i]);
        }
        Self { words }
    }
}

impl BitAnd for WorldState {
    type Output = WorldState;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.zip(rhs, |a, b| a & b)
    }
}

impl BitOr for WorldState {
    type Output = WorldState;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.zip(rhs, |a, b| a | b)
    }
}

impl BitXor for WorldState {
    type Output = WorldState;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.zip(rhs, |a, b| a ^ b)
    }
}

impl Not for WorldState {
    type Output = WorldState;

    fn not(self) -> Self::Output {
        let mut words = self.words;
        for w in words.iter_mut() {
            *w = !*w;
        }
        Self { words }
    }
}

impl fmt::Debug for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "WorldState({:016x}_{:016x}_{:016x}_{:016x})",
            self.words[3], self.words[2], self.words[1], self.words[0]
        )
    }
}

/// SplitMix64 finalizer.
#[inline]
fn mix64(mut x: u64) -> u64 {
    x ^= x >> 30;
    x = x.wrapping_mul(0xBF58476D1CE4E5B9);
    x ^= x >> 27;
    x = x.wrapping_mul(0x94D049BB133111EB);
    x ^ (x >> 31)
}

/// Iterator over the set atoms of a [`WorldState`].
#[derive(Debug, Clone)]
pub struct Ones {
    words: [u64; WORDS],
    word: usize,
}

impl Iterator for Ones {
    type Item = AtomId;

    fn next(&mut self) -> Option<AtomId> {
        while self.word < WORDS {
            let w = self.words[self.word];
            if w != 0 {
                self.words[self.word] = w & (w - 1);
                return Some(AtomId::from_index(
                    self.word * 64 + w.trailing_zeros() as usize,
                ));
            }
            self.word += 1;
        }
        None
    }
}

/// "These atoms must have these values", or, applied as an effect, "set these atoms to these
/// values".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Condition {
    pub mask: WorldState,
    pub values: WorldState,
}

impl Condition {
    pub const fn new(mask: WorldState, values: WorldState) -> Self {
        Self { mask, values }
    }

    /// Condition with no constrained atoms; matched by every state.
    pub const fn always() -> Self {
        Self {
            mask: WorldState::EMPTY,
            values: WorldState::EMPTY,
        }
    }

    #[must_use]
    pub fn require(mut self, atom: AtomId, value: bool) -> Self {
        self.mask.set_bit(atom, true);
        self.values.set_bit(atom, value);
        self
    }

    /// `Some(value)` when `atom` is constrained.
    pub fn get(&self, atom: AtomId) -> Option<bool> {
        self.mask
            .get_bit(atom)
            .then(|| self.values.get_bit(atom))
    }

    pub fn is_always(&self) -> bool {
        self.mask.is_empty()
    }

    /// Atoms required to be `true`.
    pub fn positive(&self) -> WorldState {
        self.mask & self.values
    }

    #[inline]
    pub fn is_satisfied_by(&self, state: &WorldState) -> bool {
        state.matches(self)
    }

    /// Number of constrained atoms whose value in `state` differs from the requirement.
    #[inline]
    pub fn unsatisfied_count(&self, state: &WorldState) -> u32 {
        ((*state ^ self.values) & self.mask).count_ones()
    }
}
