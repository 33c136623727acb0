//! Per-query snapshots of values.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetId;
use crate::value::{fmt_coordinates, Coordinate, Value};

/// A value as it was when a query ran, with its distance to the query.
///
/// Points are created by [`Plan::neighbors`](crate::Plan::neighbors) and never
/// change afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    coordinates: Vec<Coordinate>,
    distance: f64,
    dataset: DatasetId,
    display_name: Option<String>,
}

impl Point {
    pub(crate) fn snapshot(value: &Value, dataset: DatasetId, distance: f64) -> Self {
        Self {
            coordinates: value.coordinates().to_vec(),
            distance,
            dataset,
            display_name: value.display_name().map(str::to_owned),
        }
    }

    /// Coordinates of the value at query time, after any padding.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Distance to the query. Negative only when the query ran with
    /// `use_abs = false` and a negative weight dominated the sum.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    /// Dataset the value belonged to.
    pub fn dataset(&self) -> DatasetId {
        self.dataset
    }

    /// Name of the value at query time.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{name}"),
            None => fmt_coordinates(f, &self.coordinates),
        }
    }
}
