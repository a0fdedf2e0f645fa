//! Location providers - Implement LocationPort
//!
//! A desktop has no GPS. The position comes from configuration, from an IP
//! lookup, or not at all.

use std::sync::Arc;

use application::error::ApplicationError;
use application::ports::LocationPort;
use async_trait::async_trait;
use domain::{Coordinate, PositionFix};
use integration_navigation::{GeolocationClient, IpGeolocationClient, IpLocationConfig};
use tracing::{debug, info, instrument};

use crate::config::{LocationConfig, LocationProviderKind};

/// Always answers with a configured position
#[derive(Debug, Clone, Copy)]
pub struct FixedLocationProvider {
    position: Coordinate,
}

impl FixedLocationProvider {
    /// Create a provider for `position`
    pub const fn new(position: Coordinate) -> Self {
        Self { position }
    }
}

#[async_trait]
impl LocationPort for FixedLocationProvider {
    async fn current_position(&self) -> PositionFix {
        PositionFix::acquired(self.position)
    }
}

/// Looks the position up once per request via the caller's IP address
pub struct IpLocationProvider {
    client: Arc<dyn GeolocationClient>,
}

impl std::fmt::Debug for IpLocationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpLocationProvider")
            .field("client", &"dyn GeolocationClient")
            .finish()
    }
}

impl IpLocationProvider {
    /// Create a provider using an ip-api style service
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to initialize.
    pub fn new(config: &IpLocationConfig) -> Result<Self, ApplicationError> {
        let client = IpGeolocationClient::new(config)
            .map_err(|e| ApplicationError::Configuration(e.to_string()))?;
        Ok(Self::with_client(Arc::new(client)))
    }

    /// Create a provider over any geolocation client
    pub fn with_client(client: Arc<dyn GeolocationClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LocationPort for IpLocationProvider {
    #[instrument(skip(self))]
    async fn current_position(&self) -> PositionFix {
        match self.client.locate().await {
            Ok(position) => PositionFix::acquired(position),
            Err(e) => {
                debug!(error = %e, "IP geolocation failed");
                PositionFix::unavailable(e.to_string())
            },
        }
    }
}

/// Never knows the position, like a denied permission prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledLocationProvider;

#[async_trait]
impl LocationPort for DisabledLocationProvider {
    async fn current_position(&self) -> PositionFix {
        PositionFix::unavailable("location disabled")
    }
}

/// Build the provider selected in `config`
///
/// # Errors
///
/// Returns an error if the fixed provider has no position or the IP client
/// cannot be created.
pub fn location_provider(config: &LocationConfig) -> Result<Arc<dyn LocationPort>, ApplicationError> {
    let provider: Arc<dyn LocationPort> = match config.provider {
        LocationProviderKind::Fixed => {
            let position = config.fixed_position()?;
            info!(%position, "Using fixed location");
            Arc::new(FixedLocationProvider::new(position))
        },
        LocationProviderKind::Ip => {
            info!(url = %config.ip.base_url, "Using IP geolocation");
            Arc::new(IpLocationProvider::new(&config.ip)?)
        },
        LocationProviderKind::Disabled => {
            info!("Location disabled");
            Arc::new(DisabledLocationProvider)
        },
    };
    Ok(provider)
}
