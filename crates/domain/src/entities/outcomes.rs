//! Outcomes of geocoding, routing and geolocation lookups
//!
//! Adapters never surface errors across the engine boundary. Every failure is
//! folded into one of these values, with enough detail kept for logging.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::value_objects::{Coordinate, Route};

/// Why a geocoding lookup produced no coordinate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", content = "detail", rename_all = "snake_case")]
pub enum MissReason {
    /// Query was empty after trimming; no lookup was made
    EmptyQuery,
    /// The service answered but had no usable candidate
    NoMatch,
    /// The service could not be reached or answered with an error status
    Transport(String),
}

/// Result of resolving free text to a coordinate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GeocodeResult {
    /// First candidate of the lookup
    Found {
        /// Resolved position
        coordinate: Coordinate,
    },
    /// Nothing usable came back
    NotFound {
        /// Detail for logging and the transport-error flag
        miss: MissReason,
    },
}

impl GeocodeResult {
    /// Shorthand for a successful lookup
    #[must_use]
    pub const fn found(coordinate: Coordinate) -> Self {
        Self::Found { coordinate }
    }

    /// Shorthand for a miss
    #[must_use]
    pub const fn not_found(miss: MissReason) -> Self {
        Self::NotFound { miss }
    }

    /// The resolved coordinate, if any
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Found { coordinate } => Some(*coordinate),
            Self::NotFound { .. } => None,
        }
    }

    /// Whether the miss was caused by the transport rather than the data
    #[must_use]
    pub const fn is_transport_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound {
                miss: MissReason::Transport(_)
            }
        )
    }
}

/// Classification of a routing failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteFailureKind {
    /// The service found no path between the endpoints
    NoPath,
    /// Network error, timeout or error status
    Transport,
    /// The response could not be interpreted
    Malformed,
}

impl fmt::Display for RouteFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPath => write!(f, "no path"),
            Self::Transport => write!(f, "transport"),
            Self::Malformed => write!(f, "malformed response"),
        }
    }
}

/// Why a route could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteFailure {
    /// Failure class
    pub kind: RouteFailureKind,
    /// Human-readable detail, kept for logs
    pub reason: String,
}

impl RouteFailure {
    /// Create a failure of the given kind
    #[must_use]
    pub fn new(kind: RouteFailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for RouteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.reason)
    }
}

/// Result of a route computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteResult {
    /// A path was found
    Computed {
        /// The route geometry and metrics
        route: Route,
    },
    /// No path could be produced
    Failed {
        /// Failure detail
        failure: RouteFailure,
    },
}

impl RouteResult {
    /// Shorthand for a successful computation
    #[must_use]
    pub const fn computed(route: Route) -> Self {
        Self::Computed { route }
    }

    /// Shorthand for a failure
    #[must_use]
    pub fn failed(kind: RouteFailureKind, reason: impl Into<String>) -> Self {
        Self::Failed {
            failure: RouteFailure::new(kind, reason),
        }
    }
}

/// Result of a single-shot device position request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PositionFix {
    /// The device position
    Acquired {
        /// Current position
        coordinate: Coordinate,
    },
    /// Denied, disabled or failed
    Unavailable {
        /// Detail for logging
        reason: String,
    },
}

impl PositionFix {
    /// Shorthand for an acquired fix
    #[must_use]
    pub const fn acquired(coordinate: Coordinate) -> Self {
        Self::Acquired { coordinate }
    }

    /// Shorthand for an unavailable fix
    #[must_use]
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// The acquired coordinate, if any
    #[must_use]
    pub const fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Acquired { coordinate } => Some(*coordinate),
            Self::Unavailable { .. } => None,
        }
    }
}
