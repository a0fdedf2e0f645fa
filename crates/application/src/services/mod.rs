//! Application services - Use case implementations

mod map_view;
mod route_engine;

pub use map_view::MapView;
pub use route_engine::{
    Completion, Effect, EngineCommand, EngineConfig, EngineCore, EngineHandle, RouteEngine,
};
