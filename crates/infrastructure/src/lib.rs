//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on top of the
//! navigation clients, and owns configuration loading and logging setup.

pub mod adapters;
pub mod config;
pub mod telemetry;

pub use adapters::*;
pub use config::{
    AppConfig, CoordinateConfig, EngineAppConfig, LocationConfig, LocationProviderKind, MapConfig,
};
pub use telemetry::{LogFormat, LoggingConfig, TelemetryError, init_logging};
