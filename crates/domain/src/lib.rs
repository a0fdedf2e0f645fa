//! Domain layer for Wayfinder
//!
//! Contains the value objects, lookup outcomes and engine state shared by
//! every other crate. This layer performs no I/O and defines the ubiquitous
//! language: coordinates, polylines, routes, phases and generations.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
