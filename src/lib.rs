//! simple-hashset: string hash sets with two interchangeable collision
//! strategies and one shared resize policy.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small set of string keys with observable capacity, built so
//!   the collision strategy can be swapped without the caller noticing.
//! - Layers:
//!   - `hash`: the single deterministic string hash.
//!   - `policy`: `LoadFactors`, the pure grow/shrink decision both
//!     strategies consult after every size change.
//!   - `OpenHashSet`: flat slot array, linear probing, tombstones.
//!   - `ChainedHashSet`: one key vector per bucket.
//!   - `SimpleSet`: the trait both sets implement; callers only need it.
//!
//! Constraints
//! - Single-threaded; no interior mutability, no shared state.
//! - Capacity is a power of two >= 1. It doubles when an insertion pushes
//!   the load strictly above `upper` and halves (floored at 1) when a
//!   deletion pulls it strictly below `lower`.
//! - Resizing is eager: it happens inside the mutation that crossed the
//!   threshold.
//!
//! Rehashing invariants
//! - The new table is fully allocated before any key moves, and the swap is
//!   the last step. If allocation fails, `try_add`/`try_delete` return
//!   `SetError::AllocationFailed` and the set is exactly as before.
//! - A rehash re-inserts keys without consulting the policy and discards
//!   every tombstone.
//! - `OpenHashSet` also rehashes at its current capacity when an insertion
//!   would leave no more `Empty` slots than tombstones, so churn at a
//!   constant size keeps misses short. Capacity still only moves by policy.
//!
//! Notes and non-goals
//! - Keys are strings only; there is no pluggable hasher.
//! - Iteration order is whatever the table layout gives.
//! - A deletion at capacity 1 never triggers a same-size rehash.

mod alloc;
pub mod chained_hash_set;
pub mod config;
pub mod error;
pub mod hash;
pub mod open_hash_set;
pub mod policy;
mod simple_set;
mod simple_set_proptest;

// Public surface
pub use chained_hash_set::ChainedHashSet;
pub use config::SetConfig;
pub use error::SetError;
pub use hash::string_hash;
pub use open_hash_set::OpenHashSet;
pub use policy::{
    LoadFactors, Resize, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOWER_LOAD_FACTOR,
    DEFAULT_UPPER_LOAD_FACTOR,
};
pub use simple_set::SimpleSet;
