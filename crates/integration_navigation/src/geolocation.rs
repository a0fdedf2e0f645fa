//! IP-based geolocation client
//!
//! Resolves the caller's approximate position with a single lookup against an
//! ip-api style service. Accuracy is city level at best.

use std::time::Duration;

use async_trait::async_trait;
use domain::Coordinate;
use reqwest::Client;
use tracing::{debug, instrument};

use crate::config::IpLocationConfig;
use crate::error::NavigationError;
use crate::models::IpLookupResponse;

/// Trait for device position lookups
#[async_trait]
pub trait GeolocationClient: Send + Sync {
    /// Look up the current position once
    async fn locate(&self) -> Result<Coordinate, NavigationError>;
}

/// Geolocation client backed by an IP lookup service
#[derive(Debug)]
pub struct IpGeolocationClient {
    client: Client,
    config: IpLocationConfig,
}

impl IpGeolocationClient {
    /// Create a new IP geolocation client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &IpLocationConfig) -> Result<Self, NavigationError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| NavigationError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    fn parse_lookup(body: &str) -> Result<Coordinate, NavigationError> {
        let raw: IpLookupResponse =
            serde_json::from_str(body).map_err(|e| NavigationError::ParseError(e.to_string()))?;

        if raw.status != "success" {
            return Err(NavigationError::LocationUnavailable(
                raw.message.unwrap_or(raw.status),
            ));
        }

        match (raw.lat, raw.lon) {
            (Some(lat), Some(lon)) => {
                Coordinate::new(lat, lon).map_err(|e| NavigationError::ParseError(e.to_string()))
            },
            _ => Err(NavigationError::ParseError(
                "lookup succeeded without coordinates".to_string(),
            )),
        }
    }
}

#[async_trait]
impl GeolocationClient for IpGeolocationClient {
    #[instrument(skip(self))]
    async fn locate(&self) -> Result<Coordinate, NavigationError> {
        debug!(url = %self.config.base_url, "Looking up position by IP");

        let response = self
            .client
            .get(&self.config.base_url)
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

        if !response.status().is_success() {
            return Err(NavigationError::RequestFailed(format!(
                "HTTP {}",
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| NavigationError::ParseError(e.to_string()))?;

        let position = Self::parse_lookup(&body)?;
        debug!(%position, "Position found");
        Ok(position)
    }
}
