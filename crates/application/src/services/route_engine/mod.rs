//! Route coordination engine
//!
//! Sequences geolocation, destination geocoding, route computation and map
//! recentering. [`EngineCore`] holds the state machine; [`RouteEngine`] runs
//! it on a single task and performs the effects it asks for.

mod config;
mod runner;
mod transitions;

pub use config::EngineConfig;
pub use runner::{EngineCommand, EngineHandle, RouteEngine};
pub use transitions::{Completion, Effect, EngineCore};
