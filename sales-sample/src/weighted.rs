//! Table driven categorical sampling.
//!
//! Each table is built from explicit `(value, weight)` pairs so a value can never drift
//! out of line with its weight.

use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;

use crate::error::GenError;

#[derive(Debug, Clone)]
pub struct WeightedTable<T> {
    values: Vec<T>,
    index: WeightedIndex<f64>,
}

impl<T: Copy> WeightedTable<T> {
    /// # Errors
    /// Errors when `entries` is empty, a weight is negative or not finite, or every weight is zero
    pub fn new(entries: &[(T, f64)]) -> Result<Self, GenError> {
        let index = WeightedIndex::new(entries.iter().map(|&(_, weight)| weight))
            .map_err(|e| GenError::InvalidWeights(e.to_string()))?;
        Ok(WeightedTable {
            values: entries.iter().map(|&(value, _)| value).collect(),
            index,
        })
    }

    /// Every value equally likely.
    ///
    /// # Errors
    /// Errors when `values` is empty
    pub fn uniform(values: &[T]) -> Result<Self, GenError> {
        let entries: Vec<(T, f64)> = values.iter().map(|&value| (value, 1.0)).collect();
        Self::new(&entries)
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> T {
        self.values[self.index.sample(rng)]
    }

    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }
}
