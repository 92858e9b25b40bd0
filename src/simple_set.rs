//! SimpleSet: the capability both collision strategies implement.

use crate::error::SetError;
use crate::policy::load;

/// A set of string keys with observable capacity.
///
/// Every reachable state satisfies:
/// - `contains(k)` iff `k` was added and not deleted since;
/// - `size()` counts exactly those keys;
/// - `capacity()` is a power of two >= 1 and changes only by doubling on
///   insertion or halving on deletion.
///
/// The trait is object safe, so callers can switch strategies behind a
/// `Box<dyn SimpleSet>`.
pub trait SimpleSet {
    /// Adds `key`. `Ok(false)` if it was already present. On `Err` the set is
    /// left exactly as it was.
    fn try_add(&mut self, key: &str) -> Result<bool, SetError>;

    /// Deletes `key`. `Ok(false)` if it was absent. On `Err` the set is left
    /// exactly as it was.
    fn try_delete(&mut self, key: &str) -> Result<bool, SetError>;

    fn contains(&self, key: &str) -> bool;

    /// Number of keys present.
    fn size(&self) -> usize;

    /// Number of slots (open addressing) or buckets (chaining).
    fn capacity(&self) -> usize;

    /// Adds `key`, returning `false` if it was already present.
    ///
    /// # Panics
    ///
    /// Panics if the table cannot grow, like the infallible insertion paths
    /// of the standard collections.
    fn add(&mut self, key: &str) -> bool {
        match self.try_add(key) {
            Ok(added) => added,
            Err(e) => panic!("SimpleSet::add: {e}"),
        }
    }

    /// Deletes `key`, returning `false` if it was absent.
    ///
    /// # Panics
    ///
    /// Panics if the shrunk table cannot be allocated.
    fn delete(&mut self, key: &str) -> bool {
        match self.try_delete(key) {
            Ok(deleted) => deleted,
            Err(e) => panic!("SimpleSet::delete: {e}"),
        }
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    fn load_factor(&self) -> f64 {
        load(self.size(), self.capacity())
    }
}
