//! Infrastructure adapters
//!
//! Adapters connect application ports to the navigation clients.

mod geocoding_adapter;
mod location_adapter;
mod routing_adapter;

pub use geocoding_adapter::GeocodingAdapter;
pub use location_adapter::{
    DisabledLocationProvider, FixedLocationProvider, IpLocationProvider, location_provider,
};
pub use routing_adapter::RoutingAdapter;
