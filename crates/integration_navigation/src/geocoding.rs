//! Address search against a Nominatim server
//!
//! One search per call, best match only. Consecutive searches from the same
//! client are spaced by `min_interval_ms` to honour the public instance's
//! usage policy. Nothing is cached.

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use reqwest::Client;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, instrument};

use crate::config::NominatimConfig;
use crate::models::NominatimPlace;

/// Why an address could not be turned into a coordinate
#[derive(Debug, Error)]
pub enum GeocodingError {
    /// Nominatim could not be reached
    #[error("Nominatim unreachable: {0}")]
    ConnectionFailed(String),

    /// Nominatim answered with a non-success status
    #[error("Nominatim returned {0}")]
    RequestFailed(String),

    /// The response body was not a list of places
    #[error("Unreadable Nominatim response: {0}")]
    ParseError(String),

    /// The search matched nothing
    #[error("No place matches '{0}'")]
    AddressNotFound(String),

    /// Address was blank after trimming
    #[error("Address must not be empty")]
    EmptyAddress,

    /// The configured timeout elapsed
    #[error("Nominatim did not answer in time")]
    Timeout,
}

impl GeocodingError {
    /// Whether the failure came from the network rather than the data
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::RequestFailed(_) | Self::Timeout
        )
    }
}

impl From<reqwest::Error> for GeocodingError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::ConnectionFailed(error.to_string())
        }
    }
}

/// Free-text address lookup
#[async_trait]
pub trait GeocodingClient: Send + Sync {
    /// Coordinate of the best match for `address`
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodingError>;
}

/// Serializes requests so that two of them never start closer than `spacing`
#[derive(Debug)]
struct RequestGate {
    spacing: Duration,
    last_start: Mutex<Option<Instant>>,
}

impl RequestGate {
    fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last_start: Mutex::new(None),
        }
    }

    async fn wait_turn(&self) {
        let mut last_start = self.last_start.lock().await;
        if let Some(earliest) = last_start.map(|start| start + self.spacing)
            && earliest > Instant::now()
        {
            debug!(wait = ?(earliest - Instant::now()), "Waiting for Nominatim slot");
            tokio::time::sleep_until(earliest).await;
        }
        *last_start = Some(Instant::now());
    }
}

/// [`GeocodingClient`] for the Nominatim `/search` endpoint
#[derive(Debug)]
pub struct NominatimGeocodingClient {
    http: Client,
    search_url: String,
    country_filter: Option<String>,
    gate: RequestGate,
}

impl NominatimGeocodingClient {
    /// Build a client from `config`
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &NominatimConfig) -> Result<Self, GeocodingError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeocodingError::ConnectionFailed(e.to_string()))?;

        let country_filter = config.country_filter.trim();
        Ok(Self {
            http,
            search_url: format!("{}/search", config.base_url.trim_end_matches('/')),
            country_filter: (!country_filter.is_empty()).then(|| country_filter.to_string()),
            gate: RequestGate::new(Duration::from_millis(config.min_interval_ms)),
        })
    }

    fn search_params<'a>(&'a self, address: &'a str) -> Vec<(&'static str, &'a str)> {
        let mut params = vec![("q", address), ("format", "jsonv2"), ("limit", "1")];
        if let Some(countries) = &self.country_filter {
            params.push(("countrycodes", countries.as_str()));
        }
        params
    }

    fn best_match(places: &[NominatimPlace], address: &str) -> Result<Coordinate, GeocodingError> {
        let Some(place) = places.first() else {
            return Err(GeocodingError::AddressNotFound(address.to_string()));
        };
        debug!(name = ?place.display_name, "Best Nominatim match");
        place.coordinate().map_err(GeocodingError::ParseError)
    }
}

#[async_trait]
impl GeocodingClient for NominatimGeocodingClient {
    #[instrument(skip(self))]
    async fn geocode(&self, address: &str) -> Result<Coordinate, GeocodingError> {
        let address = address.trim();
        if address.is_empty() {
            return Err(GeocodingError::EmptyAddress);
        }

        self.gate.wait_turn().await;

        let response = self
            .http
            .get(&self.search_url)
            .query(&self.search_params(address))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodingError::RequestFailed(format!("HTTP {status}")));
        }

        let places: Vec<NominatimPlace> = response
            .json()
            .await
            .map_err(|e| GeocodingError::ParseError(e.to_string()))?;

        let coordinate = Self::best_match(&places, address)?;
        debug!(%address, %coordinate, "Address resolved");
        Ok(coordinate)
    }
}
