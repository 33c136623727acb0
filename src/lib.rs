//! easyknn: brute-force k-nearest-neighbor ranking over grouped, partial vectors.
//!
//! - [`Value`]: a point whose coordinates may be undefined (`None`)
//! - [`Dataset`]: an owned, ordered group of values
//! - [`Weight`]: per-dimension multipliers, 1 by default
//! - [`Plan`]: owns datasets and a distance cache, answers queries
//! - [`Neighbors`]: one query's ranked [`Point`]s and datasets
//!
//! Ownership flows one way: a plan owns its datasets, a dataset owns its
//! values. Values and points refer back to their dataset by [`DatasetId`].
//!
//! # Critical Nuances
//!
//! ## Missing dimensions
//!
//! A dimension undefined on either side is skipped, and the sum is not
//! renormalized. Two values sharing one defined dimension can be at distance
//! 0 even if they differ everywhere else.
//!
//! ## Negative weights
//!
//! A negative weight can make the squared sum negative. The distance is then
//! the magnitude of the imaginary root, negated when `use_abs` is off. Negative
//! distances rank nearer than 0, which lets a negative weight mean "prefer
//! larger values along this axis".
//!
//! ## Stale cache
//!
//! Cached distances are keyed by the two coordinate lists only. After
//! changing the weight or `use_abs` between queries, call
//! [`Plan::clear_cache`].
//!
//! ## Group averages
//!
//! A dataset's average distance divides by its total size, and is written on
//! the dataset by each query that includes it. See [`neighbors`].

pub mod dataset;
pub mod distance;
pub mod error;
pub mod neighbors;
pub mod plan;
pub mod point;
pub mod value;
pub mod weight;

// Re-exports
pub use dataset::{Dataset, DatasetId};
pub use distance::{weighted_distance, CacheStats, DistanceCache};
pub use error::{KnnError, Result};
pub use neighbors::{DatasetDistance, Neighbors};
pub use plan::{NeighborsParams, Plan, PlanId};
pub use point::Point;
pub use value::{Coordinate, Value};
pub use weight::Weight;
