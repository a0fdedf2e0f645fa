//! Logging setup

mod logging;

pub use logging::{LogFormat, LoggingConfig, TelemetryError, init_logging};
