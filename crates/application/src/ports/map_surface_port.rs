//! Map surface port
//!
//! The capability handed to the engine for drawing. The engine never touches
//! rendering primitives beyond these two calls.

use domain::Coordinate;
#[cfg(test)]
use mockall::automock;

use crate::services::MapView;

/// Port for the map rendering collaborator
#[cfg_attr(test, automock)]
pub trait MapSurfacePort: Send + Sync {
    /// Move the viewport to `center`
    fn recenter(&self, center: Coordinate);

    /// Draw markers, route line, loading indicator and banner
    fn render(&self, view: &MapView);
}

/// Surface that draws nothing, for headless use
#[derive(Debug, Default, Clone, Copy)]
pub struct NullMapSurface;

impl MapSurfacePort for NullMapSurface {
    fn recenter(&self, _center: Coordinate) {}

    fn render(&self, _view: &MapView) {}
}
