//! Geocoding port
//!
//! Resolves free text to a coordinate.

use async_trait::async_trait;
use domain::GeocodeResult;
#[cfg(test)]
use mockall::automock;

/// Port for address lookups
///
/// Implementations trim the text, answer `NotFound(EmptyQuery)` for blank
/// input without touching the network, and fold every failure into
/// `NotFound`. Only the first candidate is returned.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeocodingPort: Send + Sync {
    /// Resolve `text` to the coordinate of its best match
    async fn geocode(&self, text: &str) -> GeocodeResult;
}
