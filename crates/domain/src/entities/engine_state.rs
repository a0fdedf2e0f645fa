//! Engine state - the single source of truth rendered by the map view

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{Coordinate, Route};

/// Lifecycle of one destination search
///
/// `Idle -> ResolvingDestination -> RoutePending -> Routed | Failed`. A new
/// search restarts the lifecycle from any phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// No search issued yet
    #[default]
    Idle,
    /// Waiting for the geocoding lookup
    ResolvingDestination,
    /// Waiting for the routing service
    RoutePending,
    /// Terminal success
    Routed,
    /// Terminal failure; see `EngineState::last_error`
    Failed,
}

impl SearchPhase {
    /// Whether an adapter call is outstanding for the current generation
    #[must_use]
    pub const fn is_loading(self) -> bool {
        matches!(self, Self::ResolvingDestination | Self::RoutePending)
    }

    /// Whether the lifecycle has reached `Routed` or `Failed`
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Routed | Self::Failed)
    }
}

impl fmt::Display for SearchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Idle => "idle",
            Self::ResolvingDestination => "resolving destination",
            Self::RoutePending => "route pending",
            Self::Routed => "routed",
            Self::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Route slot of the engine state
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteStatus {
    /// No route to show
    #[default]
    Unset,
    /// A route request is in flight
    Pending,
    /// Route ready to draw
    Computed {
        /// The computed route
        route: Route,
    },
}

impl RouteStatus {
    /// The computed route, if any
    #[must_use]
    pub const fn route(&self) -> Option<&Route> {
        match self {
            Self::Computed { route } => Some(route),
            Self::Unset | Self::Pending => None,
        }
    }

    /// Whether the slot is `Unset`
    #[must_use]
    pub const fn is_unset(&self) -> bool {
        matches!(self, Self::Unset)
    }
}

/// Error taxonomy surfaced through `EngineState::last_error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No device position; the map silently uses the fallback center
    GeolocationUnavailable,
    /// The typed origin did not resolve
    OriginNotFound,
    /// The destination did not resolve
    DestinationNotFound,
    /// The routing service produced no route
    RouteUnavailable,
}

impl ErrorKind {
    /// Whether the view should show a banner for this error
    #[must_use]
    pub const fn is_user_visible(self) -> bool {
        !matches!(self, Self::GeolocationUnavailable)
    }

    /// Banner text for user-visible errors
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::GeolocationUnavailable => "Current location unavailable",
            Self::OriginNotFound => "No results for the starting point",
            Self::DestinationNotFound => "No results for that address",
            Self::RouteUnavailable => "Could not compute a route",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything the view needs to render, owned and written by the engine only
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EngineState {
    /// Route start; `None` until a position is known
    pub origin: Option<Coordinate>,
    /// Resolved destination
    pub destination: Option<Coordinate>,
    /// Route slot
    pub route: RouteStatus,
    /// Last failure of the current search
    pub last_error: Option<ErrorKind>,
    /// Set when the last failure came from the transport rather than the data
    pub transport_error: bool,
    /// Search lifecycle phase
    pub phase: SearchPhase,
    /// Incremented on every new request; in-flight results carry the value
    /// they were issued under
    pub generation: u64,
}

impl EngineState {
    /// Fresh state at application start
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a result issued under `generation` may still be applied
    #[must_use]
    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    /// Compare two states ignoring the generation counter
    #[must_use]
    pub fn same_outcome(&self, other: &Self) -> bool {
        self.origin == other.origin
            && self.destination == other.destination
            && self.route == other.route
            && self.last_error == other.last_error
            && self.transport_error == other.transport_error
            && self.phase == other.phase
    }
}
