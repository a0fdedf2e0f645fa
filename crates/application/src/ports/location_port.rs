//! Device location port

use async_trait::async_trait;
use domain::PositionFix;
#[cfg(test)]
use mockall::automock;

/// Port for the device position
///
/// Single-shot: one call, one answer, no automatic retry.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationPort: Send + Sync {
    /// Acquire the current position
    async fn current_position(&self) -> PositionFix;
}
