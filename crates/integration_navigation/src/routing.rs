//! OSRM routing client
//!
//! Requests a driving route between two coordinates from an
//! [OSRM](https://project-osrm.org) server and returns the full GeoJSON
//! geometry as a [`Route`].

use std::time::Duration;

use async_trait::async_trait;
use domain::{Coordinate, Polyline, Route};
use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::config::OsrmConfig;
use crate::error::NavigationError;
use crate::models::OsrmResponse;

/// Trait for routing service clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Compute a route from `origin` to `destination`
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, NavigationError>;
}

/// OSRM HTTP routing client
#[derive(Debug)]
pub struct OsrmRoutingClient {
    client: Client,
    config: OsrmConfig,
}

impl OsrmRoutingClient {
    /// Create a new OSRM routing client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &OsrmConfig) -> Result<Self, NavigationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!("Wayfinder/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| NavigationError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    /// `{base}/route/v1/{profile}/{lon},{lat};{lon},{lat}`
    fn route_url(&self, origin: Coordinate, destination: Coordinate) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            origin.longitude(),
            origin.latitude(),
            destination.longitude(),
            destination.latitude(),
        )
    }

    /// Parse the raw OSRM JSON response into a route
    fn parse_route_response(body: &str) -> Result<Route, NavigationError> {
        let raw: OsrmResponse =
            serde_json::from_str(body).map_err(|e| NavigationError::ParseError(e.to_string()))?;

        if raw.code != "Ok" {
            warn!(code = %raw.code, message = ?raw.message, "OSRM returned no route");
            return Err(NavigationError::NoRouteFound { code: raw.code });
        }

        let Some(first) = raw.routes.into_iter().next() else {
            return Err(NavigationError::NoRouteFound {
                code: "NoRoute".to_string(),
            });
        };

        let points = first
            .geometry
            .coordinates
            .into_iter()
            .map(|[lon, lat]| Coordinate::new(lat, lon))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| NavigationError::ParseError(e.to_string()))?;
        let polyline =
            Polyline::new(points).map_err(|e| NavigationError::ParseError(e.to_string()))?;

        Ok(Route {
            polyline,
            distance_meters: first.distance,
            duration_secs: first.duration,
        })
    }
}

#[async_trait]
impl RoutingClient for OsrmRoutingClient {
    #[instrument(skip(self), fields(from = %origin, to = %destination))]
    async fn route(
        &self,
        origin: Coordinate,
        destination: Coordinate,
    ) -> Result<Route, NavigationError> {
        let url = self.route_url(origin, destination);
        let params = [("overview", "full"), ("geometries", "geojson")];

        debug!(?url, "Requesting route");

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NavigationError::Timeout {
                        timeout_secs: self.config.timeout_secs,
                    }
                } else {
                    NavigationError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(NavigationError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| NavigationError::ParseError(e.to_string()))?;

        if !status.is_success() {
            // OSRM answers unroutable input with 400 and a JSON `code`
            if status == reqwest::StatusCode::BAD_REQUEST
                && let Err(err @ NavigationError::NoRouteFound { .. }) =
                    Self::parse_route_response(&body)
            {
                return Err(err);
            }
            return Err(NavigationError::RequestFailed(format!("HTTP {status}")));
        }

        let route = Self::parse_route_response(&body)?;
        debug!(
            points = route.polyline.len(),
            distance = ?route.distance_meters,
            "Route found"
        );
        Ok(route)
    }
}
