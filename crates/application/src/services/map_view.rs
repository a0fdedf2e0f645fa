//! Render-ready projection of the engine state

use domain::{Coordinate, EngineState, ErrorKind, Route, SearchPhase};
use serde::Serialize;

/// What the map surface should show
///
/// Failed searches keep every marker that could be resolved; a missing route
/// line never blanks the destination marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// Viewport center: the origin when known, otherwise the fallback
    pub center: Coordinate,
    /// Start marker
    pub origin_marker: Option<Coordinate>,
    /// End marker
    pub destination_marker: Option<Coordinate>,
    /// Route line to draw
    pub route: Option<Route>,
    /// Spinner while a lookup is outstanding
    pub loading: bool,
    /// User-visible error banner
    pub banner: Option<ErrorKind>,
    /// Lifecycle phase the view was projected from
    pub phase: SearchPhase,
}

impl MapView {
    /// Project `state` into a view, centering on `fallback_center` when the
    /// origin is unknown
    #[must_use]
    pub fn project(state: &EngineState, fallback_center: Coordinate) -> Self {
        Self {
            center: state.origin.unwrap_or(fallback_center),
            origin_marker: state.origin,
            destination_marker: state.destination,
            route: state.route.route().cloned(),
            loading: state.phase.is_loading(),
            banner: state.last_error.filter(|kind| kind.is_user_visible()),
            phase: state.phase,
        }
    }

    /// Banner text, if any
    #[must_use]
    pub fn banner_message(&self) -> Option<&'static str> {
        self.banner.map(ErrorKind::message)
    }
}
