//! Engine configuration

use std::time::Duration;

use domain::Coordinate;
use serde::{Deserialize, Serialize};

/// Configuration for the route coordination engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Abort adapter calls after this many seconds (`None` waits forever)
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    /// Request the device position as soon as the engine starts
    #[serde(default = "default_locate_on_start")]
    pub locate_on_start: bool,

    /// Map center used while the origin is unknown
    #[serde(default = "default_fallback_center")]
    pub fallback_center: Coordinate,
}

const fn default_locate_on_start() -> bool {
    true
}

const fn default_fallback_center() -> Coordinate {
    Coordinate::dhaka()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: None,
            locate_on_start: default_locate_on_start(),
            fallback_center: default_fallback_center(),
        }
    }
}

impl EngineConfig {
    /// Timeout applied to each adapter call, if configured
    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Set the adapter call timeout
    #[must_use]
    pub const fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Skip the initial position request
    #[must_use]
    pub const fn without_initial_locate(mut self) -> Self {
        self.locate_on_start = false;
        self
    }
}
