//! Application configuration
//!
//! Split into focused sections:
//! - `geocoding`: Nominatim settings
//! - `routing`: OSRM settings
//! - `location`: position provider selection
//! - `map`: fallback center and zoom
//! - `engine`: request timeout and startup behaviour
//! - `logging`: filter and output format
//!
//! Sources, later ones overriding earlier ones: built-in defaults, an optional
//! `wayfinder.toml` (or an explicit `--config` file), then `WAYFINDER_*`
//! environment variables with `__` between nested keys, e.g.
//! `WAYFINDER_ROUTING__PROFILE=foot`.

mod location;

use std::path::Path;

use application::EngineConfig;
use integration_navigation::{NominatimConfig, OsrmConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use location::{CoordinateConfig, LocationConfig, LocationProviderKind, MapConfig};

use crate::telemetry::LoggingConfig;

/// Environment variable prefix
pub const ENV_PREFIX: &str = "WAYFINDER";

/// Default configuration file name, looked up without extension
pub const DEFAULT_CONFIG_NAME: &str = "wayfinder";

/// Engine behaviour configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineAppConfig {
    /// Give up on an adapter call after this many seconds (unset waits forever)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Request the device position on startup
    #[serde(default = "default_true")]
    pub locate_on_start: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for EngineAppConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: None,
            locate_on_start: true,
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Geocoding service configuration
    #[serde(default)]
    pub geocoding: NominatimConfig,

    /// Routing service configuration
    #[serde(default)]
    pub routing: OsrmConfig,

    /// Device location configuration
    #[serde(default)]
    pub location: LocationConfig,

    /// Map viewport configuration
    #[serde(default)]
    pub map: MapConfig,

    /// Engine configuration
    #[serde(default)]
    pub engine: EngineAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from an optional file and the environment
    ///
    /// With `path`, that file must exist. Without it, `wayfinder.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_from(path, None)
    }

    /// Load with an explicit environment map instead of the process environment
    pub(crate) fn load_from(
        path: Option<&Path>,
        environment: Option<config::Map<String, String>>,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_NAME).required(false),
        };

        let builder = config::Config::builder()
            .add_source(file)
            // Override with environment variables (e.g., WAYFINDER_ROUTING__PROFILE)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true)
                    .source(environment),
            );

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate().map_err(config::ConfigError::Message)?;
        debug!(?path, "Configuration loaded");
        Ok(config)
    }

    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            geocoding: NominatimConfig::for_testing(),
            routing: OsrmConfig::for_testing(),
            location: LocationConfig {
                provider: LocationProviderKind::Disabled,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Validate every section
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        self.geocoding
            .validate()
            .map_err(|e| format!("geocoding: {e}"))?;
        self.routing.validate().map_err(|e| format!("routing: {e}"))?;
        self.location.validate()?;
        self.map.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Engine settings with the map fallback center applied
    #[must_use]
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            request_timeout_secs: self.engine.request_timeout_secs,
            locate_on_start: self.engine.locate_on_start,
            fallback_center: self.map.fallback_coordinate(),
        }
    }
}
