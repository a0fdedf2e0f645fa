//! Domain entities - engine state and the outcomes of external lookups

mod engine_state;
mod outcomes;
mod search_query;

pub use engine_state::{EngineState, ErrorKind, RouteStatus, SearchPhase};
pub use outcomes::{GeocodeResult, MissReason, PositionFix, RouteFailure, RouteFailureKind, RouteResult};
pub use search_query::SearchQuery;
