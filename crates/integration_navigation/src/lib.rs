//! Navigation integrations for Wayfinder
//!
//! Provides address geocoding via [Nominatim/OpenStreetMap](https://nominatim.openstreetmap.org),
//! driving routes via an [OSRM](https://project-osrm.org) server, and a coarse
//! device position via an IP geolocation service.
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern. [`GeocodingClient`] converts
//! free-form addresses to coordinates ([`NominatimGeocodingClient`]),
//! [`RoutingClient`] computes routes between two coordinates
//! ([`OsrmRoutingClient`]) and [`GeolocationClient`] looks up the caller's
//! approximate position ([`IpGeolocationClient`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_navigation::{OsrmConfig, OsrmRoutingClient, RoutingClient};
//!
//! let client = OsrmRoutingClient::new(&OsrmConfig::default())?;
//! let route = client.route(origin, destination).await?;
//! println!("{} points", route.polyline.len());
//! ```

mod config;
mod error;
mod geocoding;
mod geolocation;
mod models;
mod routing;

pub use config::{IpLocationConfig, NominatimConfig, OsrmConfig};
pub use error::NavigationError;
pub use geocoding::{GeocodingClient, GeocodingError, NominatimGeocodingClient};
pub use geolocation::{GeolocationClient, IpGeolocationClient};
pub use routing::{OsrmRoutingClient, RoutingClient};
