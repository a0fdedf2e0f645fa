//! Value objects - Immutable types with validation

mod coordinate;
mod polyline;
mod route;

pub use coordinate::{Coordinate, InvalidCoordinates};
pub use polyline::Polyline;
pub use route::Route;
