//! Raw wire models of the navigation services
//!
//! Deserialization targets only; clients convert them into domain types.

use domain::Coordinate;
use serde::Deserialize;

/// One Nominatim search hit (`format=jsonv2`)
///
/// Nominatim sends coordinates as decimal strings.
#[derive(Debug, Deserialize)]
pub(crate) struct NominatimPlace {
    pub(crate) lat: String,
    pub(crate) lon: String,
    #[serde(default)]
    pub(crate) display_name: Option<String>,
}

impl NominatimPlace {
    /// Parsed and range-checked position of the hit
    pub(crate) fn coordinate(&self) -> Result<Coordinate, String> {
        let latitude: f64 = self
            .lat
            .trim()
            .parse()
            .map_err(|_| format!("latitude {:?} is not a number", self.lat))?;
        let longitude: f64 = self
            .lon
            .trim()
            .parse()
            .map_err(|_| format!("longitude {:?} is not a number", self.lon))?;
        Coordinate::new(latitude, longitude).map_err(|e| e.to_string())
    }
}

/// OSRM `/route/v1` response
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmResponse {
    pub(crate) code: String,
    pub(crate) message: Option<String>,
    #[serde(default)]
    pub(crate) routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OsrmRoute {
    pub(crate) geometry: OsrmGeometry,
    pub(crate) distance: Option<f64>,
    pub(crate) duration: Option<f64>,
}

/// GeoJSON `LineString`; positions are `[longitude, latitude]`
#[derive(Debug, Deserialize)]
pub(crate) struct OsrmGeometry {
    pub(crate) coordinates: Vec<[f64; 2]>,
}

/// ip-api style lookup response
#[derive(Debug, Deserialize)]
pub(crate) struct IpLookupResponse {
    pub(crate) status: String,
    pub(crate) message: Option<String>,
    pub(crate) lat: Option<f64>,
    pub(crate) lon: Option<f64>,
}
