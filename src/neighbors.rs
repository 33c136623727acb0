//! Ranked output of a query.
//!
//! Building a [`Neighbors`] does three things:
//! 1. averages every point distance,
//! 2. averages distances per dataset and records that average on the dataset,
//! 3. sorts datasets and points ascending by distance.
//!
//! The per-dataset average divides by the dataset's **total** size, not by
//! the number of its points present in the result.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, DatasetId};
use crate::error::{KnnError, Result};
use crate::point::Point;

/// A dataset's standing in one result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetDistance {
    pub dataset: DatasetId,
    pub display_name: Option<String>,
    /// Sum of this dataset's point distances over its size.
    pub average_dist: f64,
    /// Number of values in the dataset when the result was built.
    pub len: usize,
}

/// Points and datasets ranked against one query.
///
/// Only a query builds a result, so it serializes but does not deserialize:
///
/// ```compile_fail
/// let _: easyknn::Neighbors = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct Neighbors {
    neighbors: Vec<Point>,
    dataset_neighbors: Vec<DatasetDistance>,
    average_dist: f64,
}

impl Neighbors {
    /// Rank `points` and record per-dataset averages on `datasets`.
    ///
    /// Ties keep their input order for both points and datasets.
    ///
    /// # Errors
    ///
    /// [`KnnError::EmptyResult`] for zero points,
    /// [`KnnError::UnknownDataset`] if a point's dataset is not in `datasets`.
    pub(crate) fn new(mut points: Vec<Point>, datasets: &mut [Dataset]) -> Result<Self> {
        if points.is_empty() {
            return Err(KnnError::EmptyResult);
        }

        let average_dist = points.iter().map(Point::distance).sum::<f64>() / points.len() as f64;

        // Sums per dataset, in order of first appearance.
        let mut order: Vec<DatasetId> = Vec::new();
        let mut sums: HashMap<DatasetId, f64> = HashMap::new();
        for point in &points {
            let id = point.dataset();
            match sums.get_mut(&id) {
                Some(sum) => *sum += point.distance(),
                None => {
                    order.push(id);
                    sums.insert(id, point.distance());
                }
            }
        }

        let mut dataset_neighbors = Vec::with_capacity(order.len());
        for id in order {
            let dataset = datasets
                .iter_mut()
                .find(|d| d.id() == id)
                .ok_or(KnnError::UnknownDataset(id))?;
            let average = sums[&id] / dataset.len() as f64;
            dataset.record_average_dist(average);
            dataset_neighbors.push(DatasetDistance {
                dataset: id,
                display_name: dataset.display_name().map(str::to_owned),
                average_dist: average,
                len: dataset.len(),
            });
        }

        dataset_neighbors.sort_by(|a, b| a.average_dist.total_cmp(&b.average_dist));
        points.sort_by(|a, b| a.distance().total_cmp(&b.distance()));

        Ok(Self {
            neighbors: points,
            dataset_neighbors,
            average_dist,
        })
    }

    /// Every point, nearest first.
    pub fn neighbors(&self) -> &[Point] {
        &self.neighbors
    }

    /// Every dataset with at least one point, nearest first.
    pub fn dataset_neighbors(&self) -> &[DatasetDistance] {
        &self.dataset_neighbors
    }

    /// Mean distance over all points.
    pub fn average_dist(&self) -> f64 {
        self.average_dist
    }

    /// The `k` nearest points, or for negative `k` the `|k|` farthest,
    /// farthest first. `k` past the end returns everything.
    pub fn nearest_neighbor(&self, k: isize) -> Vec<&Point> {
        take_k(&self.neighbors, k)
    }

    /// The `k` nearest datasets; same conventions as
    /// [`nearest_neighbor`](Self::nearest_neighbor).
    pub fn nearest_dataset(&self, k: isize) -> Vec<&DatasetDistance> {
        take_k(&self.dataset_neighbors, k)
    }
}

fn take_k<T>(ranked: &[T], k: isize) -> Vec<&T> {
    let n = k.unsigned_abs();
    if k >= 0 {
        ranked.iter().take(n).collect()
    } else {
        ranked.iter().rev().take(n).collect()
    }
}
