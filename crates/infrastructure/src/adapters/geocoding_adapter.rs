//! Geocoding adapter - Implements GeocodingPort using integration_navigation

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::GeocodingPort;
use async_trait::async_trait;
use domain::{GeocodeResult, MissReason};
use integration_navigation::{
    GeocodingClient, GeocodingError, NominatimConfig, NominatimGeocodingClient,
};
use tracing::{debug, instrument, warn};

/// Adapter for address lookups using Nominatim
pub struct GeocodingAdapter {
    client: Arc<dyn GeocodingClient>,
}

impl std::fmt::Debug for GeocodingAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingAdapter")
            .field("client", &"dyn GeocodingClient")
            .finish()
    }
}

impl GeocodingAdapter {
    /// Create an adapter backed by Nominatim
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &NominatimConfig) -> Result<Self, ApplicationError> {
        let client = NominatimGeocodingClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create an adapter over any geocoding client
    pub fn with_client(client: Arc<dyn GeocodingClient>) -> Self {
        Self { client }
    }

    /// Normalize a client failure into a miss reason
    fn miss_reason(error: &GeocodingError) -> MissReason {
        match error {
            GeocodingError::EmptyAddress => MissReason::EmptyQuery,
            GeocodingError::AddressNotFound(_) | GeocodingError::ParseError(_) => {
                MissReason::NoMatch
            },
            GeocodingError::ConnectionFailed(_)
            | GeocodingError::RequestFailed(_)
            | GeocodingError::Timeout => MissReason::Transport(error.to_string()),
        }
    }
}

#[async_trait]
impl GeocodingPort for GeocodingAdapter {
    #[instrument(skip(self))]
    async fn geocode(&self, text: &str) -> GeocodeResult {
        let text = text.trim();
        if text.is_empty() {
            return GeocodeResult::not_found(MissReason::EmptyQuery);
        }

        match self.client.geocode(text).await {
            Ok(coordinate) => {
                debug!(%coordinate, "Address resolved");
                GeocodeResult::found(coordinate)
            },
            Err(e) => {
                if e.is_transport() {
                    warn!(error = %e, "Geocoding service unreachable");
                } else {
                    debug!(error = %e, "Address not resolved");
                }
                GeocodeResult::not_found(Self::miss_reason(&e))
            },
        }
    }
}
