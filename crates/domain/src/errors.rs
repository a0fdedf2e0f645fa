//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// A polyline needs at least one point
    #[error("Polyline must contain at least one coordinate")]
    EmptyPolyline,
}
