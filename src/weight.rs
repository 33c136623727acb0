//! Per-dimension distance multipliers.
//!
//! A weight above 1 makes a dimension matter more, below 1 less, and 0 ignores
//! it. Undefined entries and indices past the end read as 1.
//!
//! A negative weight subtracts that dimension's term from the squared sum. See
//! [`weighted_distance`](crate::distance::weighted_distance) for how a negative
//! sum is turned back into a real distance.

use serde::{Deserialize, Serialize};

use crate::error::{KnnError, Result};

/// Sparse, growable weight vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Option<f64>>", into = "Vec<Option<f64>>")]
pub struct Weight {
    entries: Vec<Option<f64>>,
}

impl Weight {
    /// Create a weight from explicit entries.
    ///
    /// # Errors
    ///
    /// [`KnnError::TypeMismatch`] if an entry is NaN or infinite.
    pub fn new(entries: Vec<Option<f64>>) -> Result<Self> {
        check_entries(&entries)?;
        Ok(Self { entries })
    }

    /// Create a weight where every listed dimension is defined.
    pub fn from_slice(entries: &[f64]) -> Result<Self> {
        Self::new(entries.iter().copied().map(Some).collect())
    }

    pub fn entries(&self) -> &[Option<f64>] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Effective multiplier for dimension `index`.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> f64 {
        self.entries.get(index).copied().flatten().unwrap_or(1.0)
    }

    /// Overwrite an existing entry.
    ///
    /// # Errors
    ///
    /// [`KnnError::IndexOutOfRange`] past the stored entries,
    /// [`KnnError::TypeMismatch`] for NaN or infinity.
    pub fn set(&mut self, index: usize, weight: Option<f64>) -> Result<()> {
        let len = self.entries.len();
        let slot = self
            .entries
            .get_mut(index)
            .ok_or(KnnError::IndexOutOfRange { index, len })?;
        check_entry(weight)?;
        *slot = weight;
        Ok(())
    }

    /// Reset an entry to undefined, i.e. weight 1.
    pub fn unset(&mut self, index: usize) -> Result<()> {
        self.set(index, None)
    }

    pub fn push(&mut self, weight: Option<f64>) -> Result<()> {
        check_entry(weight)?;
        self.entries.push(weight);
        Ok(())
    }

    /// Append several entries. Nothing is appended if any entry is rejected.
    pub fn extend(&mut self, weights: impl IntoIterator<Item = Option<f64>>) -> Result<()> {
        let weights: Vec<_> = weights.into_iter().collect();
        check_entries(&weights)?;
        self.entries.extend(weights);
        Ok(())
    }
}

fn check_entry(weight: Option<f64>) -> Result<()> {
    match weight {
        Some(w) if !w.is_finite() => Err(KnnError::TypeMismatch(
            "weight must be a finite number or undefined".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_entries(entries: &[Option<f64>]) -> Result<()> {
    entries.iter().try_for_each(|&w| check_entry(w))
}

impl TryFrom<Vec<Option<f64>>> for Weight {
    type Error = KnnError;

    fn try_from(entries: Vec<Option<f64>>) -> Result<Self> {
        Self::new(entries)
    }
}

impl From<Weight> for Vec<Option<f64>> {
    fn from(weight: Weight) -> Self {
        weight.entries
    }
}
