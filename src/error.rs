//! Error types for easyknn.

use thiserror::Error;

use crate::dataset::DatasetId;

/// Errors raised by value construction, ownership binding and queries.
///
/// Every variant is a local precondition failure. Nothing here is retried
/// internally; callers decide what to do.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KnnError {
    /// Coordinates are empty or contain only undefined entries.
    #[error("coordinates cannot be empty or only undefined values")]
    NoDimension,

    /// A coordinate is NaN or infinite.
    #[error("coordinate {index} is not a finite number")]
    InvalidCoordinate { index: usize },

    /// The value already belongs to a dataset.
    #[error("a single value cannot be in two different datasets")]
    ValueAlreadyLinked,

    /// The dataset already belongs to a plan.
    #[error("this dataset is already linked to a plan")]
    DatasetAlreadyLinked,

    /// A member of a dataset is owned by another dataset.
    #[error("value {index} of dataset {dataset} is owned by another dataset")]
    OwnershipConflict { dataset: DatasetId, index: usize },

    /// Weight write past the stored entries.
    #[error("weight index {index} is out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    /// A weight entry is not a finite number.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// The candidate has fewer coordinates than the query.
    #[error("dimension mismatch: query has {query_dim} dimensions, point has {point_dim}")]
    DimensionMismatch { query_dim: usize, point_dim: usize },

    /// The dataset has no values, so it has no dimension.
    #[error("dataset is empty")]
    EmptyDataset,

    /// A result was built from zero points.
    #[error("no points to rank")]
    EmptyResult,

    /// A point refers to a dataset that was not supplied for aggregation.
    #[error("unknown dataset {0}")]
    UnknownDataset(DatasetId),
}

pub type Result<T> = std::result::Result<T, KnnError>;
