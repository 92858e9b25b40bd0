//! Error taxonomy shared by both set variants.

use std::collections::TryReserveError;

/// Failures reported by construction and by the fallible mutation paths.
///
/// Adding a duplicate, deleting an absent key and querying an empty set are
/// not errors; those outcomes are reported through `bool` results.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum SetError {
    #[error("invalid load factors: upper {upper}, lower {lower} (need 0 <= lower < upper <= 1)")]
    InvalidLoadFactors { upper: f32, lower: f32 },
    #[error("initial capacity {0} is not a power of two >= 1")]
    InvalidCapacity(usize),
    #[error("table capacity overflow")]
    CapacityOverflow,
    #[error("failed to allocate table for rehash: {0}")]
    AllocationFailed(#[from] TryReserveError),
}
