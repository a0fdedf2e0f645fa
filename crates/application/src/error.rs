//! Application-level errors

use thiserror::Error;

/// Errors that can occur in the application layer
///
/// Lookup failures are not errors here; they travel as result values
/// (`GeocodeResult`, `RouteResult`, `PositionFix`).
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// The engine task has stopped and no longer accepts commands
    #[error("Route engine is not running")]
    EngineStopped,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_message() {
        let err = ApplicationError::Configuration("location.fixed is out of range".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: location.fixed is out of range"
        );
    }

    #[test]
    fn engine_stopped_message() {
        assert!(
            ApplicationError::EngineStopped
                .to_string()
                .contains("not running")
        );
    }
}
