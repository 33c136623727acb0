//! Query coordinator: owns datasets and the distance cache.
//!
//! # Quick Start
//!
//! ```rust
//! use easyknn::{Dataset, Plan, Value};
//!
//! let mut dataset = Dataset::new();
//! dataset.add_values([
//!     Value::from_slice(&[1.0, 2.0, 3.0])?,
//!     Value::from_slice(&[4.0, 5.0, 6.0])?,
//! ])?;
//!
//! let mut plan = Plan::new();
//! plan.add_dataset(dataset)?;
//!
//! let result = plan.neighbors(&Value::from_slice(&[1.0, 2.0, 4.0])?)?;
//! assert_eq!(result.nearest_neighbor(1)[0].coordinates()[2], Some(3.0));
//! # Ok::<(), easyknn::KnnError>(())
//! ```
//!
//! Queries are brute force: every value of every dataset is compared with the
//! query, O(n·d) per call.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dataset::{Dataset, DatasetId};
use crate::distance::{CacheStats, DistanceCache};
use crate::error::{KnnError, Result};
use crate::neighbors::Neighbors;
use crate::point::Point;
use crate::value::Value;
use crate::weight::Weight;

static NEXT_PLAN_ID: AtomicU64 = AtomicU64::new(0);

/// Identity of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlanId(u64);

impl PlanId {
    fn next() -> Self {
        Self(NEXT_PLAN_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Options for [`Plan::neighbors_with`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighborsParams {
    /// Reuse and store distances in the plan's cache.
    pub memoize: bool,

    /// Pad every dataset with `None` up to the query's dimension first.
    pub nonify: bool,

    /// Per-dimension multipliers. Empty means every dimension weighs 1.
    pub weight: Weight,

    /// Report distances from a negative weighted sum as positive. When off,
    /// such distances are negative and rank nearer than 0.
    pub use_abs: bool,
}

impl Default for NeighborsParams {
    fn default() -> Self {
        Self {
            memoize: true,
            nonify: true,
            weight: Weight::default(),
            use_abs: true,
        }
    }
}

/// Owns datasets and answers nearest-neighbor queries against them.
///
/// Not synchronized: each query writes the cache and each touched dataset's
/// average distance, so share a plan across threads only behind a lock.
#[derive(Debug)]
pub struct Plan {
    id: PlanId,
    datasets: Vec<Dataset>,
    cache: DistanceCache,
}

impl Plan {
    pub fn new() -> Self {
        Self {
            id: PlanId::next(),
            datasets: Vec::new(),
            cache: DistanceCache::new(),
        }
    }

    pub fn id(&self) -> PlanId {
        self.id
    }

    pub fn datasets(&self) -> &[Dataset] {
        &self.datasets
    }

    pub fn dataset(&self, id: DatasetId) -> Option<&Dataset> {
        self.datasets.iter().find(|d| d.id() == id)
    }

    pub fn dataset_mut(&mut self, id: DatasetId) -> Option<&mut Dataset> {
        self.datasets.iter_mut().find(|d| d.id() == id)
    }

    /// Take ownership of `dataset`.
    ///
    /// # Errors
    ///
    /// [`KnnError::DatasetAlreadyLinked`] if the dataset was already given to a plan.
    pub fn add_dataset(&mut self, mut dataset: Dataset) -> Result<DatasetId> {
        dataset.link(self.id)?;
        let id = dataset.id();
        debug!(plan = %self.id, dataset = %id, len = dataset.len(), "add dataset");
        self.datasets.push(dataset);
        Ok(id)
    }

    /// Add several datasets. Either all of them are added or none is.
    pub fn add_datasets(
        &mut self,
        datasets: impl IntoIterator<Item = Dataset>,
    ) -> Result<Vec<DatasetId>> {
        let mut datasets: Vec<Dataset> = datasets.into_iter().collect();
        if datasets.iter().any(|d| d.plan().is_some()) {
            return Err(KnnError::DatasetAlreadyLinked);
        }
        let mut ids = Vec::with_capacity(datasets.len());
        for dataset in &mut datasets {
            dataset.link(self.id)?;
            ids.push(dataset.id());
        }
        debug!(plan = %self.id, count = ids.len(), "add datasets");
        self.datasets.append(&mut datasets);
        Ok(ids)
    }

    /// Total number of values across datasets.
    pub fn num_values(&self) -> usize {
        self.datasets.iter().map(Dataset::len).sum()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forget every memoized distance.
    pub fn clear_cache(&mut self) {
        debug!(plan = %self.id, entries = self.cache.len(), "clear distance cache");
        self.cache.clear();
    }

    /// Rank every value against `value` with default [`NeighborsParams`].
    pub fn neighbors(&mut self, value: &Value) -> Result<Neighbors> {
        self.neighbors_with(value, &NeighborsParams::default())
    }

    /// Rank every value of every dataset against `value`.
    ///
    /// # Errors
    ///
    /// - [`KnnError::EmptyResult`] if the plan holds no values
    /// - [`KnnError::DimensionMismatch`] if `nonify` is off and a value is
    ///   shorter than the query
    /// - [`KnnError::OwnershipConflict`] if a dataset holds a value owned
    ///   elsewhere
    pub fn neighbors_with(&mut self, value: &Value, params: &NeighborsParams) -> Result<Neighbors> {
        debug!(
            plan = %self.id,
            datasets = self.datasets.len(),
            values = self.num_values(),
            dimension = value.dimension(),
            "neighbors query"
        );

        // Every dataset must pass its ownership check before any is padded.
        for dataset in &mut self.datasets {
            dataset.update()?;
        }
        if params.nonify {
            for dataset in &mut self.datasets {
                dataset.nonify(Some(value.dimension()))?;
            }
        }

        let mut points = Vec::with_capacity(self.num_values());
        for dataset in &self.datasets {
            for candidate in dataset.values() {
                let distance = self.cache.distance(
                    value.coordinates(),
                    candidate.coordinates(),
                    &params.weight,
                    params.memoize,
                    params.use_abs,
                )?;
                points.push(Point::snapshot(candidate, dataset.id(), distance));
            }
        }

        let result = Neighbors::new(points, &mut self.datasets)?;
        let stats = self.cache.stats();
        debug!(
            plan = %self.id,
            average_dist = result.average_dist(),
            cache_hits = stats.hits,
            cache_misses = stats.misses,
            "neighbors done"
        );
        Ok(result)
    }
}

impl Default for Plan {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value(xs: &[f64]) -> Value {
        Value::from_slice(xs).unwrap()
    }

    #[test]
    fn dataset_cannot_join_two_plans() {
        let mut first = Plan::new();
        let mut second = Plan::new();
        let id = first.add_dataset(Dataset::new()).unwrap();
        assert_eq!(first.dataset(id).unwrap().plan(), Some(first.id()));

        // A dataset moved into a plan can't be added again by value, so link
        // one by hand.
        let mut linked = Dataset::new();
        linked.link(first.id()).unwrap();
        assert_eq!(second.add_dataset(linked), Err(KnnError::DatasetAlreadyLinked));
        assert!(second.datasets().is_empty());
    }

    #[test]
    fn add_datasets_is_all_or_nothing() {
        let mut plan = Plan::new();
        let mut linked = Dataset::new();
        linked.link(PlanId::next()).unwrap();

        let result = plan.add_datasets([Dataset::new(), linked]);
        assert_eq!(result, Err(KnnError::DatasetAlreadyLinked));
        assert!(plan.datasets().is_empty());

        let ids = plan.add_datasets([Dataset::new(), Dataset::new()]).unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(plan.datasets().len(), 2);
    }

    #[test]
    fn empty_plan_query_fails() {
        let mut plan = Plan::new();
        assert_eq!(
            plan.neighbors(&value(&[1.0])).err(),
            Some(KnnError::EmptyResult)
        );

        plan.add_dataset(Dataset::new()).unwrap();
        assert_eq!(
            plan.neighbors(&value(&[1.0])).err(),
            Some(KnnError::EmptyResult)
        );
    }

    #[test]
    fn nonify_aligns_short_values() {
        let mut ds = Dataset::new();
        ds.add_value(value(&[1.0, 2.0])).unwrap();
        let mut plan = Plan::new();
        let id = plan.add_dataset(ds).unwrap();

        let result = plan.neighbors(&value(&[1.0, 2.0, 3.0])).unwrap();
        assert_eq!(result.neighbors()[0].coordinates(), &[Some(1.0), Some(2.0), None]);
        assert_eq!(result.neighbors()[0].distance(), 0.0);
        assert_eq!(plan.dataset(id).unwrap().values()[0].dimension(), 3);
    }

    #[test]
    fn without_nonify_short_values_fail() {
        let mut ds = Dataset::new();
        ds.add_value(value(&[1.0, 2.0])).unwrap();
        let mut plan = Plan::new();
        plan.add_dataset(ds).unwrap();

        let params = NeighborsParams {
            nonify: false,
            ..Default::default()
        };
        assert_eq!(
            plan.neighbors_with(&value(&[1.0, 2.0, 3.0]), &params).err(),
            Some(KnnError::DimensionMismatch {
                query_dim: 3,
                point_dim: 2
            })
        );
    }

    #[test]
    fn ownership_conflict_leaves_every_dataset_unpadded() {
        let mut first = Dataset::new();
        first.add_value(value(&[1.0])).unwrap();

        let mut owner = Dataset::new();
        owner.add_value(value(&[5.0])).unwrap();
        let mut second = Dataset::new();
        second.push_unlinked(owner.values()[0].clone());

        let mut plan = Plan::new();
        let ids = plan.add_datasets([first, second]).unwrap();

        assert_eq!(
            plan.neighbors(&value(&[1.0, 2.0, 3.0])).err(),
            Some(KnnError::OwnershipConflict {
                dataset: ids[1],
                index: 0
            })
        );
        assert_eq!(plan.dataset(ids[0]).unwrap().values()[0].dimension(), 1);
        assert_eq!(plan.dataset(ids[1]).unwrap().values()[0].dimension(), 1);
        assert_eq!(plan.cache_len(), 0);
    }

    #[test]
    fn memoized_queries_hit_the_cache() {
        let mut ds = Dataset::new();
        ds.add_values([value(&[0.0, 0.0]), value(&[3.0, 4.0])]).unwrap();
        let mut plan = Plan::new();
        plan.add_dataset(ds).unwrap();
        let query = value(&[0.0, 1.0]);

        let first = plan.neighbors(&query).unwrap();
        assert_eq!(plan.cache_len(), 2);
        let second = plan.neighbors(&query).unwrap();
        assert_eq!(plan.cache_stats(), CacheStats { hits: 2, misses: 2 });

        for (a, b) in first.neighbors().iter().zip(second.neighbors()) {
            assert_eq!(a.distance().to_bits(), b.distance().to_bits());
        }

        plan.clear_cache();
        assert_eq!(plan.cache_len(), 0);
        let third = plan.neighbors(&query).unwrap();
        assert_eq!(first.average_dist(), third.average_dist());
    }

    #[test]
    fn memoize_off_leaves_cache_empty() {
        let mut ds = Dataset::new();
        ds.add_value(value(&[1.0])).unwrap();
        let mut plan = Plan::new();
        plan.add_dataset(ds).unwrap();

        let params = NeighborsParams {
            memoize: false,
            ..Default::default()
        };
        plan.neighbors_with(&value(&[2.0]), &params).unwrap();
        assert_eq!(plan.cache_len(), 0);
    }

    #[test]
    fn query_records_dataset_averages() {
        let mut near = Dataset::new().with_name("near");
        near.add_values([value(&[1.0]), value(&[2.0])]).unwrap();
        let mut far = Dataset::new().with_name("far");
        far.add_values([value(&[10.0]), value(&[20.0])]).unwrap();

        let mut plan = Plan::new();
        let ids = plan.add_datasets([far, near]).unwrap();

        let result = plan.neighbors(&value(&[0.0])).unwrap();
        let best = result.nearest_dataset(1)[0];
        assert_eq!(best.display_name.as_deref(), Some("near"));
        assert_eq!(best.average_dist, 1.5);
        assert_eq!(plan.dataset(ids[0]).unwrap().average_dist(), Some(15.0));
    }

    #[test]
    fn params_default_from_partial_json() {
        let params: NeighborsParams =
            serde_json::from_str(r#"{"use_abs": false, "weight": [1.0, null, 2.0]}"#).unwrap();
        assert!(params.memoize);
        assert!(params.nonify);
        assert!(!params.use_abs);
        assert_eq!(params.weight.get(1), 1.0);
        assert_eq!(params.weight.get(2), 2.0);
    }
}
