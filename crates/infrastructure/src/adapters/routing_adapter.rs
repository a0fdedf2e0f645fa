//! Routing adapter - Implements RoutingPort using integration_navigation

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::RoutingPort;
use async_trait::async_trait;
use domain::{Coordinate, RouteFailureKind, RouteResult};
use integration_navigation::{NavigationError, OsrmConfig, OsrmRoutingClient, RoutingClient};
use tracing::{debug, instrument, warn};

/// Adapter for route computation using OSRM
pub struct RoutingAdapter {
    client: Arc<dyn RoutingClient>,
}

impl std::fmt::Debug for RoutingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoutingAdapter")
            .field("client", &"dyn RoutingClient")
            .finish()
    }
}

impl RoutingAdapter {
    /// Create an adapter backed by OSRM
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &OsrmConfig) -> Result<Self, ApplicationError> {
        let client = OsrmRoutingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter over any routing client
    pub fn with_client(client: Arc<dyn RoutingClient>) -> Self {
        Self { client }
    }

    /// Classify a client failure
    const fn failure_kind(error: &NavigationError) -> RouteFailureKind {
        match error {
            NavigationError::NoRouteFound { .. } => RouteFailureKind::NoPath,
            NavigationError::ParseError(_) | NavigationError::LocationUnavailable(_) => {
                RouteFailureKind::Malformed
            },
            NavigationError::ConnectionFailed(_)
            | NavigationError::RequestFailed(_)
            | NavigationError::RateLimitExceeded { .. }
            | NavigationError::Timeout { .. } => RouteFailureKind::Transport,
        }
    }
}

#[async_trait]
impl RoutingPort for RoutingAdapter {
    #[instrument(skip(self), fields(from = %origin, to = %destination))]
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> RouteResult {
        match self.client.route(origin, destination).await {
            Ok(route) => {
                debug!(points = route.polyline.len(), "Route computed");
                RouteResult::computed(route)
            },
            Err(e) => {
                let kind = Self::failure_kind(&e);
                warn!(%kind, error = %e, "Routing failed");
                RouteResult::failed(kind, e.to_string())
            },
        }
    }
}
