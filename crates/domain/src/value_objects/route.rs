//! Computed route

use serde::{Deserialize, Serialize};

use super::{Coordinate, Polyline};

/// A computed travel path between two coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    /// Geometry in travel order
    pub polyline: Polyline,
    /// Travel distance reported by the routing service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<f64>,
    /// Travel time reported by the routing service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_secs: Option<f64>,
}

impl Route {
    /// Create a route with geometry only
    #[must_use]
    pub const fn new(polyline: Polyline) -> Self {
        Self {
            polyline,
            distance_meters: None,
            duration_secs: None,
        }
    }

    /// Attach service-reported distance and duration
    #[must_use]
    pub fn with_metrics(mut self, distance_meters: f64, duration_secs: f64) -> Self {
        self.distance_meters = Some(distance_meters);
        self.duration_secs = Some(duration_secs);
        self
    }

    /// Distance in meters, falling back to the polyline length
    #[must_use]
    pub fn distance_or_estimate(&self) -> f64 {
        self.distance_meters
            .unwrap_or_else(|| self.polyline.length_meters())
    }

    /// Snapped origin
    #[must_use]
    pub fn start(&self) -> Coordinate {
        self.polyline.start()
    }

    /// Snapped destination
    #[must_use]
    pub fn end(&self) -> Coordinate {
        self.polyline.end()
    }
}
