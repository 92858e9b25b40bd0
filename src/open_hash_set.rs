//! OpenHashSet: open addressing with linear probing and tombstones.
//!
//! Every key lives directly in a flat slot array. A lookup starts at
//! `hash mod capacity` and walks forward one slot at a time, wrapping
//! around:
//! - `Empty` ends the walk: the key is absent;
//! - `Deleted` is a tombstone left by `delete` and is walked through, so
//!   keys placed behind it stay reachable;
//! - the walk also stops after `capacity` slots, which bounds lookups in a
//!   table with no `Empty` slot left.
//!
//! Tombstones are only purged by a rehash. Besides the policy's grow and
//! shrink, an insertion that would use up an `Empty` slot while tombstones
//! outnumber the `Empty` slots left rehashes at the same capacity, so churn
//! at a constant size cannot wear every `Empty` slot down to a tombstone.
//! Rehashing allocates the new table before touching the old one, so an
//! allocation failure leaves the set unchanged.

use crate::alloc::try_filled;
use crate::config::SetConfig;
use crate::error::SetError;
use crate::hash::{bucket_index, string_hash};
use crate::policy::{LoadFactors, Resize, DEFAULT_INITIAL_CAPACITY};
use crate::simple_set::SimpleSet;
use core::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
enum Slot {
    Empty,
    Occupied(Box<str>),
    Deleted,
}

/// Result of walking the probe sequence for a key.
enum Probe {
    Found(usize),
    /// Key absent; first slot the key could be written to, if any.
    Absent(Option<usize>),
}

/// String set resolving collisions by linear probing.
#[derive(Clone)]
pub struct OpenHashSet {
    slots: Vec<Slot>,
    len: usize,
    tombstones: usize,
    factors: LoadFactors,
}

impl OpenHashSet {
    /// Empty set with 16 slots and thresholds `(0.75, 0.25)`.
    pub fn new() -> Self {
        Self {
            slots: vec![Slot::Empty; DEFAULT_INITIAL_CAPACITY],
            len: 0,
            tombstones: 0,
            factors: LoadFactors::default(),
        }
    }

    /// Empty set with 16 slots and the given thresholds.
    pub fn with_load_factors(upper: f32, lower: f32) -> Result<Self, SetError> {
        Self::with_config(SetConfig::new().with_load_factors(upper, lower))
    }

    pub fn with_config(config: SetConfig) -> Result<Self, SetError> {
        let (capacity, factors) = config.validate()?;
        Ok(Self {
            slots: try_filled(capacity, || Slot::Empty)?,
            len: 0,
            tombstones: 0,
            factors,
        })
    }

    /// Default-configured set holding every distinct key of `keys`, grown as
    /// if each key had been added one at a time.
    pub fn from_keys<I>(keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend(keys);
        set
    }

    pub fn upper_load_factor(&self) -> f32 {
        self.factors.upper()
    }

    pub fn lower_load_factor(&self) -> f32 {
        self.factors.lower()
    }

    /// Keys in slot order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.slots.iter(),
        }
    }

    fn probe(&self, key: &str) -> Probe {
        let capacity = self.slots.len();
        let mut idx = bucket_index(string_hash(key), capacity);
        let mut reusable = None;
        for _ in 0..capacity {
            match &self.slots[idx] {
                Slot::Empty => return Probe::Absent(reusable.or(Some(idx))),
                Slot::Deleted => {
                    reusable.get_or_insert(idx);
                }
                Slot::Occupied(k) if **k == *key => return Probe::Found(idx),
                Slot::Occupied(_) => {}
            }
            idx = (idx + 1) & (capacity - 1);
        }
        Probe::Absent(reusable)
    }

    fn allocate(&self, capacity: usize) -> Result<Vec<Slot>, SetError> {
        try_filled(capacity, || Slot::Empty).map_err(|e| {
            tracing::trace!(capacity, size = self.len, "open hash set rehash allocation failed");
            SetError::from(e)
        })
    }

    /// Moves every live key into `fresh` and makes it the table. Tombstones
    /// are dropped with the old table.
    fn install(&mut self, mut fresh: Vec<Slot>) {
        let from = self.slots.len();
        for slot in self.slots.drain(..) {
            if let Slot::Occupied(key) = slot {
                place(&mut fresh, key);
            }
        }
        tracing::debug!(
            from,
            to = fresh.len(),
            size = self.len,
            tombstones = self.tombstones,
            "open hash set rehashed"
        );
        self.slots = fresh;
        self.tombstones = 0;
    }

    /// Whether writing a new key to `idx` calls for a same-capacity rehash:
    /// the key would take an `Empty` slot and leave no more `Empty` slots
    /// than there are tombstones.
    fn purge_due(&self, idx: usize) -> bool {
        if self.tombstones == 0 || self.slots[idx] != Slot::Empty {
            return false;
        }
        // `idx` is Empty, so at least one slot is neither live nor a tombstone.
        let empty_after = self.capacity() - self.len - self.tombstones - 1;
        self.tombstones >= empty_after
    }
}

/// Writes `key` into the first `Empty` slot of its probe sequence. `slots`
/// must hold no tombstones and at least one `Empty` slot.
fn place(slots: &mut [Slot], key: Box<str>) {
    let mask = slots.len() - 1;
    let mut idx = bucket_index(string_hash(&key), slots.len());
    while slots[idx] != Slot::Empty {
        idx = (idx + 1) & mask;
    }
    slots[idx] = Slot::Occupied(key);
}

impl SimpleSet for OpenHashSet {
    fn try_add(&mut self, key: &str) -> Result<bool, SetError> {
        let vacancy = match self.probe(key) {
            Probe::Found(_) => return Ok(false),
            Probe::Absent(vacancy) => vacancy,
        };
        let size = self.len + 1;
        let capacity = self.capacity();
        let target = match (self.factors.after_insert(capacity, size)?, vacancy) {
            (Resize::GrowTo(grown), _) => grown,
            (_, Some(idx)) if self.purge_due(idx) => capacity,
            (_, Some(idx)) => {
                if self.slots[idx] == Slot::Deleted {
                    self.tombstones -= 1;
                }
                self.slots[idx] = Slot::Occupied(key.into());
                self.len = size;
                return Ok(true);
            }
            // No free slot means `len == capacity`, so `size / capacity > 1 >= upper`.
            (_, None) => unreachable!("full open hash set was not grown"),
        };
        let fresh = self.allocate(target)?;
        self.install(fresh);
        place(&mut self.slots, key.into());
        self.len = size;
        Ok(true)
    }

    fn try_delete(&mut self, key: &str) -> Result<bool, SetError> {
        let Probe::Found(idx) = self.probe(key) else {
            return Ok(false);
        };
        let size = self.len - 1;
        match self.factors.after_delete(self.capacity(), size) {
            Resize::ShrinkTo(capacity) => {
                let fresh = self.allocate(capacity)?;
                self.slots[idx] = Slot::Deleted;
                self.len = size;
                self.install(fresh);
            }
            _ => {
                self.slots[idx] = Slot::Deleted;
                self.len = size;
                self.tombstones += 1;
            }
        }
        Ok(true)
    }

    fn contains(&self, key: &str) -> bool {
        matches!(self.probe(key), Probe::Found(_))
    }

    fn size(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.slots.len()
    }
}

impl Default for OpenHashSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for OpenHashSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S: AsRef<str>> Extend<S> for OpenHashSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            self.add(key.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for OpenHashSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

/// Iterator over the keys of an `OpenHashSet`.
pub struct Iter<'a> {
    it: core::slice::Iter<'a, Slot>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.by_ref().find_map(|slot| match slot {
            Slot::Occupied(key) => Some(&**key),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a OpenHashSet {
    type Item = &'a str;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn tombstones(set: &OpenHashSet) -> usize {
        let n = set.slots.iter().filter(|s| **s == Slot::Deleted).count();
        assert_eq!(n, set.tombstones, "tombstone counter out of sync");
        n
    }

    fn empties(set: &OpenHashSet) -> usize {
        set.slots.iter().filter(|s| **s == Slot::Empty).count()
    }

    /// Slots a lookup of an absent `key` walks before reaching `Empty`.
    fn miss_walk(set: &OpenHashSet, key: &str) -> usize {
        let capacity = set.capacity();
        let mut idx = bucket_index(string_hash(key), capacity);
        let mut steps = 0;
        while steps < capacity && set.slots[idx] != Slot::Empty {
            idx = (idx + 1) & (capacity - 1);
            steps += 1;
        }
        steps
    }

    /// Four slots that never resize on their own until they overflow.
    fn tight() -> OpenHashSet {
        OpenHashSet::with_config(
            SetConfig::new()
                .with_initial_capacity(4)
                .with_load_factors(1.0, 0.0),
        )
        .unwrap()
    }

    /// Invariant: a completely full table still answers misses (probe is
    /// bounded by capacity) and hits.
    #[test]
    fn full_table_lookups_terminate() {
        let mut s = tight();
        for k in ["a", "b", "c", "d"] {
            assert!(s.add(k));
        }
        assert_eq!(s.capacity(), 4);
        assert!(s.slots.iter().all(|slot| matches!(slot, Slot::Occupied(_))));
        for k in ["a", "b", "c", "d"] {
            assert!(s.contains(k));
        }
        assert!(!s.contains("e"));
        assert!(!s.delete("e"));
    }

    /// Invariant: tombstones keep later keys of the probe chain reachable and
    /// are reused by the next insertion.
    #[test]
    fn tombstones_are_transparent_and_reused() {
        let mut s = tight();
        for k in ["a", "b", "c", "d"] {
            s.add(k);
        }
        assert!(s.delete("a"));
        assert_eq!(tombstones(&s), 1);
        for k in ["b", "c", "d"] {
            assert!(s.contains(k), "lost {k} behind a tombstone");
        }
        assert!(!s.contains("a"));

        assert!(s.add("a"));
        assert_eq!(tombstones(&s), 0);
        assert_eq!(s.capacity(), 4);
        assert_eq!(s.size(), 4);
    }

    /// Invariant: with no free slot left the insertion grows the table first;
    /// the rehash discards every tombstone.
    #[test]
    fn overflowing_insert_grows_and_purges() {
        let mut s = tight();
        for k in ["a", "b", "c", "d"] {
            s.add(k);
        }
        s.delete("b");
        s.add("e");
        assert!(s.add("f"));
        assert_eq!(s.capacity(), 8);
        assert_eq!(tombstones(&s), 0);
        let keys: BTreeSet<&str> = s.iter().collect();
        assert_eq!(keys, ["a", "c", "d", "e", "f"].into_iter().collect());
    }

    /// Invariant: a shrinking delete leaves a tombstone-free table without the
    /// deleted key.
    #[test]
    fn shrinking_delete_purges_tombstones() {
        let mut s = OpenHashSet::new();
        for i in 0..13 {
            s.add(&i.to_string());
        }
        for i in 0..5 {
            s.delete(&i.to_string());
        }
        assert_eq!(tombstones(&s), 5);
        assert!(s.delete("5"));
        assert_eq!(s.capacity(), 16);
        assert_eq!(tombstones(&s), 0);
        assert!(!s.contains("5"));
        for i in 6..13 {
            assert!(s.contains(&i.to_string()));
        }
    }

    /// Invariant: deleting the oldest key and adding a new one at a constant
    /// size never turns every `Empty` slot into a tombstone; the purge keeps
    /// the capacity and misses still stop at an `Empty` slot.
    #[test]
    fn churn_at_constant_size_keeps_empty_slots() {
        let mut s = OpenHashSet::new();
        for i in 0..1000 {
            s.add(&i.to_string());
        }
        assert_eq!(s.capacity(), 2048);
        for i in 0..20_000 {
            assert!(s.delete(&i.to_string()));
            assert!(s.add(&(i + 1000).to_string()));
            assert!(empties(&s) > 0, "no Empty slot left after round {i}");
        }
        assert_eq!(s.capacity(), 2048);
        assert_eq!(s.size(), 1000);
        assert!(tombstones(&s) < 1048);
        for i in 0..200 {
            let absent = format!("absent-{i}");
            assert!(!s.contains(&absent));
            assert!(miss_walk(&s, &absent) < s.capacity());
        }
        for i in 20_000..21_000 {
            assert!(s.contains(&i.to_string()));
        }
    }

    /// Invariant: even with `upper == 1.0`, where the policy never grows a
    /// table with free slots, tombstones are purged in place.
    #[test]
    fn churn_in_a_tight_table_purges_in_place() {
        let mut s = tight();
        for k in ["a", "b", "c"] {
            s.add(k);
        }
        for i in 0..50 {
            let old = if i == 0 { "a".to_string() } else { format!("k{}", i - 1) };
            assert!(s.delete(&old));
            assert!(s.add(&format!("k{i}")));
            assert_eq!(s.capacity(), 4);
            assert!(empties(&s) > 0);
            assert!(tombstones(&s) <= 1);
        }
        assert!(!s.contains("zzz"));
        assert!(miss_walk(&s, "zzz") < 4);
    }

    /// Invariant: a grow whose table cannot be allocated reports the error
    /// and leaves the set exactly as it was.
    #[test]
    fn failed_grow_leaves_set_untouched() {
        let mut s = OpenHashSet::new();
        for i in 0..12 {
            s.add(&i.to_string());
        }
        let before = s.slots.clone();
        crate::alloc::fail_allocations(true);
        let res = s.try_add("12");
        crate::alloc::fail_allocations(false);
        assert!(matches!(res, Err(SetError::AllocationFailed(_))));
        assert_eq!(s.slots, before);
        assert_eq!((s.size(), s.capacity()), (12, 16));
        assert!(!s.contains("12"));

        assert!(s.add("12"));
        assert_eq!(s.capacity(), 32);
    }

    /// Invariant: a shrinking delete whose table cannot be allocated keeps
    /// the key.
    #[test]
    fn failed_shrink_keeps_key() {
        let mut s = OpenHashSet::new();
        for i in 0..13 {
            s.add(&i.to_string());
        }
        for i in 0..5 {
            s.delete(&i.to_string());
        }
        crate::alloc::fail_allocations(true);
        let res = s.try_delete("5");
        crate::alloc::fail_allocations(false);
        assert!(matches!(res, Err(SetError::AllocationFailed(_))));
        assert!(s.contains("5"));
        assert_eq!((s.size(), s.capacity()), (8, 32));
        assert_eq!(tombstones(&s), 5);

        assert!(s.delete("5"));
        assert_eq!(s.capacity(), 16);
    }

    /// Invariant: the infallible `add` turns an allocation failure into a
    /// panic rather than a silent no-op.
    #[test]
    #[should_panic]
    fn add_panics_when_grow_cannot_allocate() {
        let mut s = OpenHashSet::new();
        for i in 0..12 {
            s.add(&i.to_string());
        }
        crate::alloc::fail_allocations(true);
        s.add("12");
    }

    #[test]
    fn debug_lists_keys() {
        let s = OpenHashSet::from_keys(["x"]);
        assert_eq!(format!("{:?}", s), r#"{"x"}"#);
    }
}
