//! Ordered route geometry

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::errors::DomainError;

/// An ordered, non-empty sequence of coordinates
///
/// The first point is the origin snapped to the road network, the last point
/// is the snapped destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coordinate>", into = "Vec<Coordinate>")]
pub struct Polyline(Vec<Coordinate>);

impl Polyline {
    /// Create a polyline from its points
    ///
    /// # Errors
    ///
    /// Returns `DomainError::EmptyPolyline` when `points` is empty.
    pub fn new(points: Vec<Coordinate>) -> Result<Self, DomainError> {
        if points.is_empty() {
            return Err(DomainError::EmptyPolyline);
        }
        Ok(Self(points))
    }

    /// All points in travel order
    #[must_use]
    pub fn points(&self) -> &[Coordinate] {
        &self.0
    }

    /// Snapped origin
    #[must_use]
    pub fn start(&self) -> Coordinate {
        self.0[0]
    }

    /// Snapped destination
    #[must_use]
    pub fn end(&self) -> Coordinate {
        self.0[self.0.len() - 1]
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Summed great-circle length of all segments in meters
    #[must_use]
    pub fn length_meters(&self) -> f64 {
        self.0
            .windows(2)
            .map(|pair| pair[0].distance_meters(&pair[1]))
            .sum()
    }
}

impl TryFrom<Vec<Coordinate>> for Polyline {
    type Error = DomainError;

    fn try_from(points: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Self::new(points)
    }
}

impl From<Polyline> for Vec<Coordinate> {
    fn from(polyline: Polyline) -> Self {
        polyline.0
    }
}
