//! Points in k-dimensional space with optional coordinates.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::DatasetId;
use crate::error::{KnnError, Result};

/// One coordinate. `None` means the dimension is undefined for this value.
pub type Coordinate = Option<f64>;

/// A vector whose coordinates may be partially undefined.
///
/// The dimension is always `coordinates.len()`. A value is linked to at most
/// one [`Dataset`](crate::Dataset); the link is set once, when the dataset
/// takes the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ValueRepr")]
pub struct Value {
    coordinates: Vec<Coordinate>,
    display_name: Option<String>,
    #[serde(skip)]
    dataset: Option<DatasetId>,
}

/// Deserialized form; goes through the same validation as [`Value::new`].
#[derive(Deserialize)]
struct ValueRepr {
    coordinates: Vec<Coordinate>,
    #[serde(default)]
    display_name: Option<String>,
}

impl TryFrom<ValueRepr> for Value {
    type Error = KnnError;

    fn try_from(repr: ValueRepr) -> Result<Self> {
        let mut value = Value::new(repr.coordinates)?;
        value.display_name = repr.display_name;
        Ok(value)
    }
}

impl Value {
    /// Create a value from coordinates.
    ///
    /// # Errors
    ///
    /// [`KnnError::NoDimension`] if `coordinates` is empty or all `None`,
    /// [`KnnError::InvalidCoordinate`] if any coordinate is NaN or infinite.
    pub fn new(coordinates: Vec<Coordinate>) -> Result<Self> {
        validate(&coordinates)?;
        Ok(Self {
            coordinates,
            display_name: None,
            dataset: None,
        })
    }

    /// Create a value from fully defined coordinates.
    pub fn from_slice(coordinates: &[f64]) -> Result<Self> {
        Self::new(coordinates.iter().copied().map(Some).collect())
    }

    /// Attach a display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    /// Coordinates in dimension order, `None` where undefined.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Number of coordinates, defined or not.
    pub fn dimension(&self) -> usize {
        self.coordinates.len()
    }

    /// Label shown by `Display` in place of the coordinates.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Replace or clear the label. Points already taken keep the old one.
    pub fn set_display_name(&mut self, name: Option<String>) {
        self.display_name = name;
    }

    /// The dataset this value belongs to, if it was added to one.
    pub fn dataset(&self) -> Option<DatasetId> {
        self.dataset
    }

    /// Replace every coordinate. The previous coordinates are kept on error.
    pub fn set_coordinates(&mut self, coordinates: Vec<Coordinate>) -> Result<()> {
        validate(&coordinates)?;
        self.coordinates = coordinates;
        Ok(())
    }

    /// Pad with `None` up to `target` dimensions. Never truncates.
    pub fn nonify(&mut self, target: usize) {
        let pad = target.saturating_sub(self.coordinates.len());
        self.coordinates.extend(std::iter::repeat(None).take(pad));
    }

    pub(crate) fn link(&mut self, dataset: DatasetId) -> Result<()> {
        if self.dataset.is_some() {
            return Err(KnnError::ValueAlreadyLinked);
        }
        self.dataset = Some(dataset);
        Ok(())
    }
}

fn validate(coordinates: &[Coordinate]) -> Result<()> {
    if coordinates.iter().all(Option::is_none) {
        return Err(KnnError::NoDimension);
    }
    if let Some(index) = coordinates
        .iter()
        .position(|c| c.is_some_and(|x| !x.is_finite()))
    {
        return Err(KnnError::InvalidCoordinate { index });
    }
    Ok(())
}

/// Writes `[1, 2, None]` style coordinate lists.
pub(crate) fn fmt_coordinates(f: &mut fmt::Formatter<'_>, coordinates: &[Coordinate]) -> fmt::Result {
    write!(f, "[")?;
    for (i, c) in coordinates.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        match c {
            Some(x) => write!(f, "{x}")?,
            None => write!(f, "None")?,
        }
    }
    write!(f, "]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.display_name {
            Some(name) => write!(f, "{name}"),
            None => fmt_coordinates(f, &self.coordinates),
        }
    }
}
