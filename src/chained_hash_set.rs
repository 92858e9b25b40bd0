//! ChainedHashSet: closed addressing with one key vector per bucket.
//!
//! A key only ever lives in bucket `hash mod capacity`; collisions append
//! to that bucket and every operation scans that bucket alone. Buckets never
//! hold duplicates.
//!
//! Rehashing sizes every new bucket up front, so all allocation happens
//! before the first key moves and a failure leaves the set unchanged.

use crate::alloc::try_filled;
use crate::config::SetConfig;
use crate::error::SetError;
use crate::hash::{bucket_index, string_hash};
use crate::policy::{LoadFactors, Resize, DEFAULT_INITIAL_CAPACITY};
use crate::simple_set::SimpleSet;
use core::fmt;
use std::collections::TryReserveError;

type Bucket = Vec<Box<str>>;

/// String set resolving collisions by chaining.
#[derive(Clone)]
pub struct ChainedHashSet {
    buckets: Vec<Bucket>,
    len: usize,
    factors: LoadFactors,
}

impl ChainedHashSet {
    /// Empty set with 16 buckets and thresholds `(0.75, 0.25)`.
    pub fn new() -> Self {
        Self {
            buckets: vec![Bucket::new(); DEFAULT_INITIAL_CAPACITY],
            len: 0,
            factors: LoadFactors::default(),
        }
    }

    /// Empty set with 16 buckets and the given thresholds.
    pub fn with_load_factors(upper: f32, lower: f32) -> Result<Self, SetError> {
        Self::with_config(SetConfig::new().with_load_factors(upper, lower))
    }

    pub fn with_config(config: SetConfig) -> Result<Self, SetError> {
        let (capacity, factors) = config.validate()?;
        Ok(Self {
            buckets: try_filled(capacity, Bucket::new)?,
            len: 0,
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

    /// Keys bucket by bucket, each bucket in insertion order.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            it: self.buckets.iter().flatten(),
        }
    }

    fn bucket_of(&self, key: &str) -> usize {
        bucket_index(string_hash(key), self.buckets.len())
    }

    /// Allocates `capacity` buckets, each with room for the current keys that
    /// will land in it plus `incoming`.
    fn allocate(&self, capacity: usize, incoming: Option<&str>) -> Result<Vec<Bucket>, SetError> {
        let sized = || -> Result<Vec<Bucket>, TryReserveError> {
            let mut counts = try_filled(capacity, || 0usize)?;
            for key in self.iter().chain(incoming) {
                counts[bucket_index(string_hash(key), capacity)] += 1;
            }
            let mut fresh = try_filled(capacity, Bucket::new)?;
            for (bucket, n) in fresh.iter_mut().zip(counts) {
                bucket.try_reserve_exact(n)?;
            }
            Ok(fresh)
        };
        sized().map_err(|e| {
            tracing::trace!(capacity, size = self.len, "chained hash set rehash allocation failed");
            SetError::from(e)
        })
    }

    /// Redistributes every key into `fresh`, whose buckets are already sized.
    fn install(&mut self, mut fresh: Vec<Bucket>) {
        let from = self.buckets.len();
        let to = fresh.len();
        for key in self.buckets.drain(..).flatten() {
            fresh[bucket_index(string_hash(&key), to)].push(key);
        }
        tracing::debug!(from, to, size = self.len, "chained hash set resized");
        self.buckets = fresh;
    }
}

impl SimpleSet for ChainedHashSet {
    fn try_add(&mut self, key: &str) -> Result<bool, SetError> {
        if self.contains(key) {
            return Ok(false);
        }
        let size = self.len + 1;
        if let Resize::GrowTo(capacity) = self.factors.after_insert(self.capacity(), size)? {
            let fresh = self.allocate(capacity, Some(key))?;
            self.install(fresh);
        }
        let idx = self.bucket_of(key);
        self.buckets[idx].push(key.into());
        self.len = size;
        Ok(true)
    }

    fn try_delete(&mut self, key: &str) -> Result<bool, SetError> {
        let idx = self.bucket_of(key);
        let Some(pos) = self.buckets[idx].iter().position(|k| **k == *key) else {
            return Ok(false);
        };
        let size = self.len - 1;
        let shrink = match self.factors.after_delete(self.capacity(), size) {
            Resize::ShrinkTo(capacity) => Some(self.allocate(capacity, None)?),
            _ => None,
        };
        self.buckets[idx].remove(pos);
        self.len = size;
        if let Some(fresh) = shrink {
            self.install(fresh);
        }
        Ok(true)
    }

    fn contains(&self, key: &str) -> bool {
        self.buckets[self.bucket_of(key)]
            .iter()
            .any(|k| **k == *key)
    }

    fn size(&self) -> usize {
        self.len
    }

    fn capacity(&self) -> usize {
        self.buckets.len()
    }
}

impl Default for ChainedHashSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ChainedHashSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<S: AsRef<str>> Extend<S> for ChainedHashSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for key in iter {
            self.add(key.as_ref());
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for ChainedHashSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_keys(iter)
    }
}

/// Iterator over the keys of a `ChainedHashSet`.
pub struct Iter<'a> {
    it: core::iter::Flatten<core::slice::Iter<'a, Bucket>>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a str;
    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.it.next().map(|key| &**key)
    }
}

impl<'a> IntoIterator for &'a ChainedHashSet {
    type Item = &'a str;
    type IntoIter = Iter<'a>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
