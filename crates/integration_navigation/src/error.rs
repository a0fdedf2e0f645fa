//! Navigation error types

use thiserror::Error;

/// Errors that can occur during routing and geolocation lookups
#[derive(Debug, Error)]
pub enum NavigationError {
    /// Connection to the service failed
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// HTTP request returned a non-success status
    #[error("Request failed: {0}")]
    RequestFailed(String),

    /// Failed to parse the service response
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded, retry after {retry_after_secs:?} seconds")]
    RateLimitExceeded {
        /// Seconds to wait before retrying (if provided by API)
        retry_after_secs: Option<u64>,
    },

    /// The routing service answered but found no path
    #[error("No route found: {code}")]
    NoRouteFound {
        /// Service status code, e.g. `NoRoute`
        code: String,
    },

    /// The geolocation service could not place the caller
    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    /// Request timeout
    #[error("Request timed out after {timeout_secs} seconds")]
    Timeout {
        /// The timeout duration in seconds
        timeout_secs: u64,
    },
}

impl NavigationError {
    /// Whether the failure came from the network rather than the data
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_)
                | Self::RequestFailed(_)
                | Self::Timeout { .. }
                | Self::RateLimitExceeded { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_errors() {
        assert!(NavigationError::ConnectionFailed("test".to_string()).is_transport());
        assert!(NavigationError::RequestFailed("HTTP 503".to_string()).is_transport());
        assert!(NavigationError::Timeout { timeout_secs: 10 }.is_transport());
        assert!(
            NavigationError::RateLimitExceeded {
                retry_after_secs: Some(60)
            }
            .is_transport()
        );
    }

    #[test]
    fn test_data_errors() {
        assert!(!NavigationError::ParseError("test".to_string()).is_transport());
        assert!(
            !NavigationError::NoRouteFound {
                code: "NoRoute".to_string()
            }
            .is_transport()
        );
        assert!(!NavigationError::LocationUnavailable("private range".to_string()).is_transport());
    }

    #[test]
    fn test_error_display() {
        let err = NavigationError::NoRouteFound {
            code: "NoRoute".to_string(),
        };
        assert!(err.to_string().contains("NoRoute"));

        let err = NavigationError::Timeout { timeout_secs: 10 };
        assert!(err.to_string().contains("10"));
    }
}
