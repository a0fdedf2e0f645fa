//! Pure transition core of the route coordination engine
//!
//! Every request handler and completion handler mutates the owned
//! [`EngineState`] and returns the side effects the runner must perform.
//! Nothing here awaits, so the whole lifecycle is testable without a runtime.

use domain::{
    Coordinate, EngineState, ErrorKind, GeocodeResult, MissReason, PositionFix, RouteFailureKind,
    RouteResult, RouteStatus, SearchPhase, SearchQuery,
};
use tracing::{debug, info, warn};

/// Work the runner must start after a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Geocode the destination, and the typed origin when present
    Resolve {
        /// Generation the lookup belongs to
        generation: u64,
        /// Typed origin, already trimmed
        origin_text: Option<String>,
        /// Destination text, already trimmed
        destination_text: String,
    },
    /// Ask the routing service for a route
    ComputeRoute {
        /// Generation the request belongs to
        generation: u64,
        /// Route start
        origin: Coordinate,
        /// Route end
        destination: Coordinate,
    },
    /// Move the map viewport
    Recenter(Coordinate),
}

/// Result of an asynchronous operation, delivered back to the core
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    /// Geocoding finished
    Resolved {
        /// Generation the lookup was issued under
        generation: u64,
        /// Outcome for the typed origin, `None` when none was typed
        origin: Option<GeocodeResult>,
        /// Outcome for the destination
        destination: GeocodeResult,
    },
    /// Routing finished
    Routed {
        /// Generation the request was issued under
        generation: u64,
        /// Origin the route was requested from
        origin: Coordinate,
        /// Outcome of the routing call
        result: RouteResult,
    },
    /// A device position request finished
    Located {
        /// Generation current when the position was requested
        requested_at: u64,
        /// Outcome of the request
        fix: PositionFix,
    },
}

/// Owner of the engine state and its transitions
#[derive(Debug, Default)]
pub struct EngineCore {
    state: EngineState,
    /// Generation of the latest search with a typed origin
    typed_origin_generation: u64,
}

impl EngineCore {
    /// Core with a fresh, unset state
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the current state
    #[must_use]
    pub const fn state(&self) -> &EngineState {
        &self.state
    }

    /// Start a new search, superseding whatever is in flight
    ///
    /// A blank destination fails immediately with `DestinationNotFound` and
    /// produces no lookup.
    pub fn search(&mut self, query: &SearchQuery) -> Vec<Effect> {
        let generation = self.begin_generation();
        self.state.destination = None;
        self.state.route = RouteStatus::Unset;

        let Some(destination_text) = query.destination_text() else {
            info!(generation, "Blank destination, nothing to resolve");
            self.fail(ErrorKind::DestinationNotFound);
            return Vec::new();
        };

        if query.origin_text().is_some() {
            self.typed_origin_generation = generation;
        }

        info!(generation, destination = %destination_text, "Search requested");
        self.state.phase = SearchPhase::ResolvingDestination;
        vec![Effect::Resolve {
            generation,
            origin_text: query.origin_text().map(str::to_owned),
            destination_text: destination_text.to_owned(),
        }]
    }

    /// Use a place picked on the map as the destination, skipping geocoding
    pub fn select_place(&mut self, destination: Coordinate) -> Vec<Effect> {
        let generation = self.begin_generation();
        info!(generation, %destination, "Place selected");
        self.state.destination = Some(destination);
        self.state.route = RouteStatus::Unset;

        let mut effects = vec![Effect::Recenter(destination)];
        effects.extend(self.route_to_destination(destination));
        effects
    }

    /// Store a new origin and re-route when a finished search is on screen
    ///
    /// Never re-routes while a lookup is in flight; the pending resolution
    /// picks the new origin up, and a route from an older origin is redone
    /// once it lands.
    pub fn update_origin(&mut self, origin: Coordinate) -> Vec<Effect> {
        if self.state.origin == Some(origin) {
            debug!(%origin, "Origin unchanged");
            return Vec::new();
        }
        self.state.origin = Some(origin);

        let destination = self.state.destination;
        match destination {
            Some(destination) if self.state.phase.is_terminal() => {
                let generation = self.begin_generation();
                info!(generation, %origin, "Origin moved, re-routing");
                self.request_route(generation, origin, destination)
            },
            Some(_) => Vec::new(),
            None => vec![Effect::Recenter(origin)],
        }
    }

    /// Apply a completed asynchronous operation
    ///
    /// Returns `None` when the completion belongs to a superseded generation
    /// and was discarded without touching the state.
    pub fn apply(&mut self, completion: Completion) -> Option<Vec<Effect>> {
        match completion {
            Completion::Resolved {
                generation,
                origin,
                destination,
            } => {
                if !self.accepts(generation, SearchPhase::ResolvingDestination) {
                    return None;
                }
                Some(self.on_resolved(origin, destination))
            },
            Completion::Routed {
                generation,
                origin,
                result,
            } => {
                if !self.accepts(generation, SearchPhase::RoutePending) {
                    return None;
                }
                self.on_routed(result);
                Some(self.follow_moved_origin(origin))
            },
            Completion::Located { requested_at, fix } => {
                if requested_at < self.typed_origin_generation {
                    debug!(
                        requested_at,
                        typed = self.typed_origin_generation,
                        "Discarding position requested before a typed origin"
                    );
                    return None;
                }
                Some(self.on_located(fix))
            },
        }
    }

    fn on_resolved(
        &mut self,
        origin: Option<GeocodeResult>,
        destination: GeocodeResult,
    ) -> Vec<Effect> {
        let mut origin_missing = false;
        match origin {
            Some(GeocodeResult::Found { coordinate }) => self.state.origin = Some(coordinate),
            Some(GeocodeResult::NotFound { miss }) => {
                origin_missing = true;
                self.note_miss("origin", &miss);
            },
            None => {},
        }

        let destination = match destination {
            GeocodeResult::Found { coordinate } => coordinate,
            GeocodeResult::NotFound { miss } => {
                self.note_miss("destination", &miss);
                self.fail(ErrorKind::DestinationNotFound);
                return Vec::new();
            },
        };

        self.state.destination = Some(destination);
        let mut effects = vec![Effect::Recenter(destination)];
        if origin_missing {
            self.fail(ErrorKind::OriginNotFound);
        } else {
            effects.extend(self.route_to_destination(destination));
        }
        effects
    }

    fn on_routed(&mut self, result: RouteResult) {
        match result {
            RouteResult::Computed { route } => {
                debug!(
                    generation = self.state.generation,
                    points = route.polyline.len(),
                    "Route computed"
                );
                self.state.route = RouteStatus::Computed { route };
                self.state.last_error = None;
                self.state.transport_error = false;
                self.state.phase = SearchPhase::Routed;
            },
            RouteResult::Failed { failure } => {
                warn!(
                    generation = self.state.generation,
                    kind = %failure.kind,
                    reason = %failure.reason,
                    "Route unavailable"
                );
                self.state.transport_error =
                    failure.kind == RouteFailureKind::Transport;
                self.fail(ErrorKind::RouteUnavailable);
            },
        }
    }

    /// Re-route when the origin moved while the route was pending
    fn follow_moved_origin(&mut self, requested_from: Coordinate) -> Vec<Effect> {
        match (self.state.origin, self.state.destination) {
            (Some(origin), Some(destination)) if origin != requested_from => {
                let generation = self.begin_generation();
                info!(generation, %origin, "Origin moved while routing, re-routing");
                self.request_route(generation, origin, destination)
            },
            _ => Vec::new(),
        }
    }

    fn on_located(&mut self, fix: PositionFix) -> Vec<Effect> {
        match fix {
            PositionFix::Acquired { coordinate } => self.update_origin(coordinate),
            PositionFix::Unavailable { reason } => {
                // Soft failure: the view keeps its fallback center, no banner
                info!(%reason, "Current location unavailable");
                Vec::new()
            },
        }
    }

    /// Route from the known origin, or park in `Failed` until one arrives
    fn route_to_destination(&mut self, destination: Coordinate) -> Vec<Effect> {
        match self.state.origin {
            Some(origin) => self.request_route(self.state.generation, origin, destination),
            None => {
                info!(
                    generation = self.state.generation,
                    "No origin yet, routing blocked"
                );
                self.fail(ErrorKind::GeolocationUnavailable);
                Vec::new()
            },
        }
    }

    fn request_route(
        &mut self,
        generation: u64,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Vec<Effect> {
        self.state.phase = SearchPhase::RoutePending;
        self.state.route = RouteStatus::Pending;
        self.state.last_error = None;
        self.state.transport_error = false;
        vec![Effect::ComputeRoute {
            generation,
            origin,
            destination,
        }]
    }

    fn begin_generation(&mut self) -> u64 {
        self.state.generation += 1;
        self.state.last_error = None;
        self.state.transport_error = false;
        self.state.generation
    }

    fn fail(&mut self, kind: ErrorKind) {
        self.state.phase = SearchPhase::Failed;
        self.state.route = RouteStatus::Unset;
        self.state.last_error = Some(kind);
    }

    fn note_miss(&mut self, which: &str, miss: &MissReason) {
        if let MissReason::Transport(detail) = miss {
            warn!(generation = self.state.generation, which, %detail, "Geocoding transport failure");
            self.state.transport_error = true;
        } else {
            info!(generation = self.state.generation, which, ?miss, "Geocoding found nothing");
        }
    }

    fn accepts(&self, generation: u64, expected: SearchPhase) -> bool {
        if !self.state.is_current(generation) {
            debug!(
                stale = generation,
                current = self.state.generation,
                "Discarding superseded result"
            );
            return false;
        }
        if self.state.phase != expected {
            debug!(generation, phase = %self.state.phase, "Discarding unexpected result");
            return false;
        }
        true
    }
}
