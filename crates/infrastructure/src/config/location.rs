//! Location and map configurations

use std::fmt;

use application::error::ApplicationError;
use domain::Coordinate;
use integration_navigation::IpLocationConfig;
use serde::{Deserialize, Serialize};

/// Geographic coordinate configuration (latitude/longitude pair)
///
/// Configured as inline table: `{ latitude = 23.8103, longitude = 90.4125 }`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CoordinateConfig {
    /// Latitude (-90.0 to 90.0)
    pub latitude: f64,
    /// Longitude (-180.0 to 180.0)
    pub longitude: f64,
}

impl CoordinateConfig {
    /// Convert to the domain value object
    ///
    /// Returns `None` if coordinates are invalid.
    #[must_use]
    pub fn to_coordinate(&self) -> Option<Coordinate> {
        Coordinate::new(self.latitude, self.longitude).ok()
    }
}

impl From<Coordinate> for CoordinateConfig {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude(),
            longitude: coordinate.longitude(),
        }
    }
}

// ==============================
// Location Configuration
// ==============================

/// Source of the device position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationProviderKind {
    /// A configured home position
    Fixed,
    /// Approximate position from an IP lookup (default)
    #[default]
    Ip,
    /// No position; the map stays on the fallback center
    Disabled,
}

impl fmt::Display for LocationProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed => write!(f, "fixed"),
            Self::Ip => write!(f, "ip"),
            Self::Disabled => write!(f, "disabled"),
        }
    }
}

/// Device location configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationConfig {
    /// Which provider answers position requests
    #[serde(default)]
    pub provider: LocationProviderKind,

    /// Position for the `fixed` provider
    #[serde(default)]
    pub fixed: Option<CoordinateConfig>,

    /// IP lookup service settings
    #[serde(default)]
    pub ip: IpLocationConfig,
}

impl LocationConfig {
    /// Position of the fixed provider
    ///
    /// # Errors
    ///
    /// Returns an error if no valid fixed position is configured.
    pub fn fixed_position(&self) -> Result<Coordinate, ApplicationError> {
        self.fixed
            .as_ref()
            .ok_or_else(|| {
                ApplicationError::Configuration(
                    "location.fixed is required when location.provider = \"fixed\"".to_string(),
                )
            })?
            .to_coordinate()
            .ok_or_else(|| {
                ApplicationError::Configuration("location.fixed is out of range".to_string())
            })
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        match self.provider {
            LocationProviderKind::Fixed => {
                self.fixed_position().map_err(|e| e.to_string())?;
            },
            LocationProviderKind::Ip => {
                self.ip.validate().map_err(|e| format!("location.ip: {e}"))?;
            },
            LocationProviderKind::Disabled => {},
        }
        Ok(())
    }
}

// ==============================
// Map Configuration
// ==============================

/// Map viewport configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Center used while the origin is unknown
    #[serde(default = "default_fallback_center")]
    pub fallback_center: CoordinateConfig,

    /// Initial zoom level (1-19)
    #[serde(default = "default_zoom")]
    pub zoom: u8,
}

fn default_fallback_center() -> CoordinateConfig {
    CoordinateConfig::from(Coordinate::dhaka())
}

const fn default_zoom() -> u8 {
    14
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            fallback_center: default_fallback_center(),
            zoom: default_zoom(),
        }
    }
}

impl MapConfig {
    /// Fallback center as a domain coordinate
    #[must_use]
    pub fn fallback_coordinate(&self) -> Coordinate {
        self.fallback_center
            .to_coordinate()
            .unwrap_or_else(Coordinate::dhaka)
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.fallback_center.to_coordinate().is_none() {
            return Err("map.fallback_center is out of range".to_string());
        }

        if !(1..=19).contains(&self.zoom) {
            return Err("map.zoom must be between 1 and 19".to_string());
        }

        Ok(())
    }
}
