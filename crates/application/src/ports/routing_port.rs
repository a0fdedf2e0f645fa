//! Routing port
//!
//! Computes a driving route between two resolved coordinates.

use async_trait::async_trait;
use domain::{Coordinate, RouteResult};
#[cfg(test)]
use mockall::automock;

/// Port for route computation
///
/// Both endpoints must be known; callers never pass an unset origin.
/// Every failure is returned as `RouteResult::Failed` with its reason.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RoutingPort: Send + Sync {
    /// Compute a route from `origin` to `destination`
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> RouteResult;
}
