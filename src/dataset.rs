//! Named collections of values.
//!
//! A [`Dataset`] owns its values and is the unit groups are ranked by. After a
//! query, each dataset touched by the result carries its average distance to
//! that query.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{KnnError, Result};
use crate::plan::PlanId;
use crate::value::Value;

static NEXT_DATASET_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a dataset. Values and points refer to their dataset by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DatasetId(u64);

impl DatasetId {
    pub(crate) fn next() -> Self {
        Self(NEXT_DATASET_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An ordered collection of [`Value`]s.
#[derive(Debug)]
pub struct Dataset {
    id: DatasetId,
    display_name: Option<String>,
    values: Vec<Value>,
    plan: Option<PlanId>,
    average_dist: Option<f64>,
}

impl Dataset {
    pub fn new() -> Self {
        Self {
            id: DatasetId::next(),
            display_name: None,
            values: Vec::new(),
            plan: None,
            average_dist: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Label used by `Display` instead of the values.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Replace or clear the label.
    pub fn set_display_name(&mut self, name: Option<String>) {
        self.display_name = name;
    }

    /// Values in insertion order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Mutable access to one value, e.g. to replace its coordinates.
    pub fn value_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.values.get_mut(index)
    }

    /// Number of values. Dataset averages divide by this.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The plan this dataset was added to.
    pub fn plan(&self) -> Option<PlanId> {
        self.plan
    }

    /// Average distance to the last query whose result included this dataset.
    pub fn average_dist(&self) -> Option<f64> {
        self.average_dist
    }

    /// Largest dimension among the values.
    ///
    /// # Errors
    ///
    /// [`KnnError::EmptyDataset`] when there are no values.
    pub fn dimension(&self) -> Result<usize> {
        self.values
            .iter()
            .map(Value::dimension)
            .max()
            .ok_or(KnnError::EmptyDataset)
    }

    /// Take ownership of `value` and link it to this dataset.
    ///
    /// # Errors
    ///
    /// [`KnnError::ValueAlreadyLinked`] if the value (or the value it was
    /// cloned from) already belongs to a dataset.
    pub fn add_value(&mut self, mut value: Value) -> Result<()> {
        value.link(self.id)?;
        self.values.push(value);
        Ok(())
    }

    /// Add several values. Either all of them are added or none is.
    pub fn add_values(&mut self, values: impl IntoIterator<Item = Value>) -> Result<()> {
        let mut values: Vec<Value> = values.into_iter().collect();
        if values.iter().any(|v| v.dataset().is_some()) {
            return Err(KnnError::ValueAlreadyLinked);
        }
        for value in &mut values {
            value.link(self.id)?;
        }
        self.values.append(&mut values);
        Ok(())
    }

    /// Pad every value with `None` up to `target` dimensions, or up to the
    /// dataset's own dimension when `target` is `None`. Longer values are left
    /// untouched.
    ///
    /// # Errors
    ///
    /// [`KnnError::EmptyDataset`] when `target` is `None` and there are no
    /// values to take a dimension from.
    pub fn nonify(&mut self, target: Option<usize>) -> Result<()> {
        let target = match target {
            Some(t) => t,
            None => self.dimension()?,
        };
        debug!(dataset = %self.id, target, "nonify");
        for value in &mut self.values {
            value.nonify(target);
        }
        Ok(())
    }

    /// Check that every value belongs to this dataset, linking any unlinked
    /// value.
    ///
    /// # Errors
    ///
    /// [`KnnError::OwnershipConflict`] for the first value owned by another
    /// dataset.
    pub fn update(&mut self) -> Result<()> {
        for (index, value) in self.values.iter_mut().enumerate() {
            match value.dataset() {
                Some(id) if id == self.id => {}
                Some(_) => {
                    return Err(KnnError::OwnershipConflict {
                        dataset: self.id,
                        index,
                    })
                }
                None => value.link(self.id)?,
            }
        }
        Ok(())
    }

    pub(crate) fn link(&mut self, plan: PlanId) -> Result<()> {
        if self.plan.is_some() {
            return Err(KnnError::DatasetAlreadyLinked);
        }
        self.plan = Some(plan);
        Ok(())
    }

    /// Written once per query by the result being built.
    pub(crate) fn record_average_dist(&mut self, average: f64) {
        self.average_dist = Some(average);
    }

    /// Test hook: push a value without linking it.
    #[cfg(test)]
    pub(crate) fn push_unlinked(&mut self, value: Value) {
        self.values.push(value);
    }
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.display_name {
            return write!(f, "{name}");
        }
        write!(f, "[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            crate::value::fmt_coordinates(f, value.coordinates())?;
        }
        write!(f, "]")
    }
}
