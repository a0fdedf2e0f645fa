//! Port definitions for application layer
//!
//! Ports are interfaces that define how the engine interacts with external
//! systems. Adapters in the infrastructure layer implement these ports.

mod geocoding_port;
mod location_port;
mod map_surface_port;
mod routing_port;

#[cfg(test)]
pub use geocoding_port::MockGeocodingPort;
pub use geocoding_port::GeocodingPort;
#[cfg(test)]
pub use location_port::MockLocationPort;
pub use location_port::LocationPort;
#[cfg(test)]
pub use map_surface_port::MockMapSurfacePort;
pub use map_surface_port::{MapSurfacePort, NullMapSurface};
#[cfg(test)]
pub use routing_port::MockRoutingPort;
pub use routing_port::RoutingPort;
