//! Load-factor resize policy shared by both set variants.
//!
//! The policy is a pure function of `(capacity, size after the mutation)`
//! and the configured thresholds. It never looks at the table itself, so
//! both collision strategies resize at exactly the same points.

use crate::error::SetError;

/// Capacity a freshly constructed set starts with.
pub const DEFAULT_INITIAL_CAPACITY: usize = 16;
/// Load above which an insertion doubles the capacity.
pub const DEFAULT_UPPER_LOAD_FACTOR: f32 = 0.75;
/// Load below which a deletion halves the capacity.
pub const DEFAULT_LOWER_LOAD_FACTOR: f32 = 0.25;

/// Outcome of a policy check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Resize {
    Keep,
    GrowTo(usize),
    ShrinkTo(usize),
}

/// Validated `(upper, lower)` thresholds with `0 <= lower < upper <= 1`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LoadFactors {
    upper: f32,
    lower: f32,
}

impl LoadFactors {
    pub fn new(upper: f32, lower: f32) -> Result<Self, SetError> {
        // Written so that NaN fails every comparison and is rejected.
        let valid = lower >= 0.0 && lower < upper && upper <= 1.0;
        if !valid {
            return Err(SetError::InvalidLoadFactors { upper, lower });
        }
        Ok(Self { upper, lower })
    }

    pub fn upper(&self) -> f32 {
        self.upper
    }

    pub fn lower(&self) -> f32 {
        self.lower
    }

    /// Decides whether an insertion that left `size` keys in a table of
    /// `capacity` must double the table.
    pub fn after_insert(&self, capacity: usize, size: usize) -> Result<Resize, SetError> {
        if load(size, capacity) > f64::from(self.upper) {
            let grown = capacity
                .checked_mul(2)
                .ok_or(SetError::CapacityOverflow)?;
            return Ok(Resize::GrowTo(grown));
        }
        Ok(Resize::Keep)
    }

    /// Decides whether a deletion that left `size` keys in a table of
    /// `capacity` must halve the table. Never goes below one slot, and never
    /// halves into a table whose load would exceed `upper`.
    pub fn after_delete(&self, capacity: usize, size: usize) -> Resize {
        if load(size, capacity) < f64::from(self.lower) {
            let shrunk = (capacity / 2).max(1);
            if shrunk != capacity && load(size, shrunk) <= f64::from(self.upper) {
                return Resize::ShrinkTo(shrunk);
            }
        }
        Resize::Keep
    }
}

impl Default for LoadFactors {
    fn default() -> Self {
        Self {
            upper: DEFAULT_UPPER_LOAD_FACTOR,
            lower: DEFAULT_LOWER_LOAD_FACTOR,
        }
    }
}

/// `size / capacity`; capacity is always >= 1.
#[inline]
pub(crate) fn load(size: usize, capacity: usize) -> f64 {
    size as f64 / capacity as f64
}
