//! Construction options for both set variants.

use crate::error::SetError;
use crate::policy::{
    LoadFactors, DEFAULT_INITIAL_CAPACITY, DEFAULT_LOWER_LOAD_FACTOR, DEFAULT_UPPER_LOAD_FACTOR,
};

/// Unvalidated construction options. Defaults match `OpenHashSet::new()` and
/// `ChainedHashSet::new()`; `validate` is run by `with_config`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SetConfig {
    pub initial_capacity: usize,
    pub upper_load_factor: f32,
    pub lower_load_factor: f32,
}

impl SetConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }

    pub fn with_load_factors(mut self, upper: f32, lower: f32) -> Self {
        self.upper_load_factor = upper;
        self.lower_load_factor = lower;
        self
    }

    /// Checks the options and returns the starting capacity together with
    /// the resize policy.
    pub fn validate(&self) -> Result<(usize, LoadFactors), SetError> {
        if !self.initial_capacity.is_power_of_two() {
            return Err(SetError::InvalidCapacity(self.initial_capacity));
        }
        let factors = LoadFactors::new(self.upper_load_factor, self.lower_load_factor)?;
        Ok((self.initial_capacity, factors))
    }
}

impl Default for SetConfig {
    fn default() -> Self {
        Self {
            initial_capacity: DEFAULT_INITIAL_CAPACITY,
            upper_load_factor: DEFAULT_UPPER_LOAD_FACTOR,
            lower_load_factor: DEFAULT_LOWER_LOAD_FACTOR,
        }
    }
}
