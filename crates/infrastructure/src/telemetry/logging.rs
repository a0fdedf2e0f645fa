//! Tracing subscriber initialization
//!
//! Console logging through a `tracing-subscriber` registry with an
//! [`EnvFilter`] and a human-readable or JSON `fmt` layer.

use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Output format of the console log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per event
    Json,
}

/// Configuration for logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "application=debug,reqwest=warn")
    #[serde(default = "default_log_filter")]
    pub filter: String,

    /// Console output format
    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_filter() -> String {
    "warn,application=info,infrastructure=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
            format: LogFormat::default(),
        }
    }
}

impl LoggingConfig {
    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the filter directive cannot be parsed.
    pub fn validate(&self) -> Result<(), String> {
        EnvFilter::try_new(&self.filter)
            .map(|_| ())
            .map_err(|e| format!("logging.filter is invalid: {e}"))
    }
}

/// Initialize the global subscriber
///
/// `RUST_LOG` wins over `filter_override`, which wins over the configured
/// filter. Logs go to stderr so command output on stdout stays clean.
///
/// # Example
///
/// ```ignore
/// use infrastructure::telemetry::{LoggingConfig, init_logging};
///
/// init_logging(&LoggingConfig::default(), None)?;
/// ```
pub fn init_logging(
    config: &LoggingConfig,
    filter_override: Option<&str>,
) -> Result<(), TelemetryError> {
    let directives = filter_override.unwrap_or(&config.filter);
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(directives).map_err(|e| TelemetryError::Filter(e.to_string()))?,
    };

    let fmt_layer = match config.format {
        LogFormat::Text => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| TelemetryError::Init(e.to_string()))?;

    info!(format = ?config.format, "Logging initialized");
    Ok(())
}

/// Error type for logging initialization
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// Failed to initialize tracing subscriber
    #[error("Failed to initialize tracing: {0}")]
    Init(String),

    /// Filter directives could not be parsed
    #[error("Invalid log filter: {0}")]
    Filter(String),
}
