//! Weighted Euclidean distance over partial vectors, with memoization.
//!
//! ## Important nuance
//!
//! Dimensions where either side is `None` are skipped. The sum is **not**
//! renormalized by the number of compared dimensions, so a sparse value is
//! not penalized for its missing coordinates beyond contributing fewer terms.
//!
//! Negative weights can make the squared sum negative. Its square root is then
//! imaginary; we report its magnitude, negated unless `use_abs` is set. Ranking
//! treats such negative distances as nearer than 0.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{KnnError, Result};
use crate::value::Coordinate;
use crate::weight::Weight;

/// Weighted Euclidean distance from query `a` to candidate `b`.
///
/// Iterates over `a`'s dimensions; `b` may be longer, but not shorter.
///
/// # Errors
///
/// [`KnnError::DimensionMismatch`] if `b` has fewer coordinates than `a`.
///
/// # Example
///
/// ```rust
/// use easyknn::distance::weighted_distance;
/// use easyknn::Weight;
///
/// let a = [Some(1.0), Some(2.0), Some(2.0)];
/// let b = [Some(2.0), Some(2.0), Some(2.0)];
/// let d = weighted_distance(&a, &b, &Weight::default(), true).unwrap();
/// assert_eq!(d, 1.0);
/// ```
pub fn weighted_distance(
    a: &[Coordinate],
    b: &[Coordinate],
    weight: &Weight,
    use_abs: bool,
) -> Result<f64> {
    if b.len() < a.len() {
        return Err(KnnError::DimensionMismatch {
            query_dim: a.len(),
            point_dim: b.len(),
        });
    }

    let sum: f64 = a
        .iter()
        .zip(b)
        .enumerate()
        .filter_map(|(i, pair)| match pair {
            (Some(x), Some(y)) => Some((x - y) * (x - y) * weight.get(i)),
            _ => None,
        })
        .fold(0.0, |acc, term| acc + term);

    Ok(fold_root(sum, use_abs))
}

/// Square root of `sum`, reduced to a real number when `sum < 0`.
#[inline]
fn fold_root(sum: f64, use_abs: bool) -> f64 {
    if sum >= 0.0 {
        return sum.sqrt();
    }
    let magnitude = (-sum).sqrt();
    debug!(sum, use_abs, "negative weighted sum, folding to a real distance");
    if use_abs {
        magnitude
    } else {
        -magnitude
    }
}

/// Cache key: both coordinate lists, bit for bit.
///
/// `-0.0` is stored as `0.0` so the two compare equal, as they do numerically.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    query: Vec<Option<u64>>,
    point: Vec<Option<u64>>,
}

impl CacheKey {
    fn new(query: &[Coordinate], point: &[Coordinate]) -> Self {
        Self {
            query: query.iter().map(|c| c.map(canonical_bits)).collect(),
            point: point.iter().map(|c| c.map(canonical_bits)).collect(),
        }
    }
}

#[inline]
fn canonical_bits(x: f64) -> u64 {
    if x == 0.0 {
        0.0_f64.to_bits()
    } else {
        x.to_bits()
    }
}

/// Hit/miss counters for a [`DistanceCache`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Memoized distances keyed by the (query, point) coordinate pair.
///
/// The key does not include the weight or `use_abs`. Entries are never
/// invalidated on their own: clear the cache after changing either, or after
/// mutating values whose old coordinates may come back.
#[derive(Debug, Default)]
pub struct DistanceCache {
    entries: HashMap<CacheKey, f64>,
    stats: CacheStats,
}

impl DistanceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distance between `query` and `point`, served from the cache when
    /// `memoize` is set and the pair was seen before.
    ///
    /// With `memoize` off the cache is neither read nor written.
    pub fn distance(
        &mut self,
        query: &[Coordinate],
        point: &[Coordinate],
        weight: &Weight,
        memoize: bool,
        use_abs: bool,
    ) -> Result<f64> {
        if !memoize {
            return weighted_distance(query, point, weight, use_abs);
        }

        let key = CacheKey::new(query, point);
        if let Some(&d) = self.entries.get(&key) {
            self.stats.hits += 1;
            trace!(distance = d, "distance cache hit");
            return Ok(d);
        }

        let d = weighted_distance(query, point, weight, use_abs)?;
        self.stats.misses += 1;
        self.entries.insert(key, d);
        Ok(d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats = CacheStats::default();
    }
}
