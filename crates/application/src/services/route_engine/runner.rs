//! Async runner for the engine core
//!
//! One task owns the [`EngineCore`] and is the only writer of the state.
//! Adapter calls run as spawned tasks and report back through a completion
//! channel tagged with the generation they were issued under; the runner
//! applies completions in arrival order and the core discards stale ones.

use std::sync::Arc;
use std::time::Duration;

use domain::{
    Coordinate, EngineState, GeocodeResult, MissReason, RouteFailureKind, RouteResult, SearchQuery,
};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::config::EngineConfig;
use super::transitions::{Completion, Effect, EngineCore};
use crate::error::ApplicationError;
use crate::ports::{GeocodingPort, LocationPort, MapSurfacePort, RoutingPort};
use crate::services::MapView;

/// Requests accepted by the engine
#[derive(Debug)]
pub enum EngineCommand {
    /// Start a new destination search
    Search {
        /// Typed origin and destination
        query: SearchQuery,
        /// Receives the generation assigned to the search
        ack: Option<oneshot::Sender<u64>>,
    },
    /// Route to a coordinate picked on the map
    SelectPlace {
        /// Picked destination
        destination: Coordinate,
        /// Receives the generation assigned to the selection
        ack: Option<oneshot::Sender<u64>>,
    },
    /// A new origin from outside (user-set or a fresh fix)
    UpdateOrigin(Coordinate),
    /// Request the device position once
    Locate,
    /// Stop the engine
    Exit,
}

/// The route coordination engine with its collaborators
pub struct RouteEngine {
    core: EngineCore,
    geocoder: Arc<dyn GeocodingPort>,
    router: Arc<dyn RoutingPort>,
    locator: Arc<dyn LocationPort>,
    surface: Arc<dyn MapSurfacePort>,
    config: EngineConfig,
}

impl std::fmt::Debug for RouteEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteEngine")
            .field("state", self.core.state())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RouteEngine {
    /// Create an engine over the given adapters
    pub fn new(
        geocoder: Arc<dyn GeocodingPort>,
        router: Arc<dyn RoutingPort>,
        locator: Arc<dyn LocationPort>,
        surface: Arc<dyn MapSurfacePort>,
        config: EngineConfig,
    ) -> Self {
        Self {
            core: EngineCore::new(),
            geocoder,
            router,
            locator,
            surface,
            config,
        }
    }

    /// Start the engine task
    ///
    /// The returned handle sends commands and observes state snapshots. The
    /// join handle resolves to the final state once the engine exits.
    pub fn spawn(self) -> (EngineHandle, JoinHandle<EngineState>) {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(self.core.state().clone());
        let task = tokio::spawn(self.run(command_rx, state_tx));
        (
            EngineHandle {
                commands: command_tx,
                state: state_rx,
            },
            task,
        )
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<EngineCommand>,
        state_tx: watch::Sender<EngineState>,
    ) -> EngineState {
        let (completion_tx, mut completions) = mpsc::unbounded_channel();
        info!(timeout = ?self.config.request_timeout(), "Route engine started");

        self.publish(&state_tx);
        self.surface.recenter(self.config.fallback_center);
        if self.config.locate_on_start {
            self.spawn_locate(&completion_tx);
        }

        loop {
            tokio::select! {
                Some(completion) = completions.recv() => {
                    if let Some(effects) = self.core.apply(completion) {
                        self.publish(&state_tx);
                        self.perform(effects, &completion_tx);
                    }
                },
                command = commands.recv() => {
                    let Some(command) = command else {
                        debug!("All engine handles dropped");
                        break;
                    };
                    if matches!(command, EngineCommand::Exit) {
                        break;
                    }
                    self.handle(command, &state_tx, &completion_tx);
                },
            }
        }

        info!(generation = self.core.state().generation, "Route engine stopped");
        self.core.state().clone()
    }

    fn handle(
        &mut self,
        command: EngineCommand,
        state_tx: &watch::Sender<EngineState>,
        completion_tx: &mpsc::UnboundedSender<Completion>,
    ) {
        let (effects, ack) = match command {
            EngineCommand::Search { query, ack } => (self.core.search(&query), ack),
            EngineCommand::SelectPlace { destination, ack } => {
                (self.core.select_place(destination), ack)
            },
            EngineCommand::UpdateOrigin(origin) => (self.core.update_origin(origin), None),
            EngineCommand::Locate => {
                self.spawn_locate(completion_tx);
                return;
            },
            EngineCommand::Exit => return,
        };

        // Publish before acknowledging so waiters never observe an older state
        self.publish(state_tx);
        if let Some(ack) = ack {
            // The requester may have given up waiting
            let _ = ack.send(self.core.state().generation);
        }
        self.perform(effects, completion_tx);
    }

    fn publish(&self, state_tx: &watch::Sender<EngineState>) {
        let state = self.core.state();
        state_tx.send_replace(state.clone());
        self.surface
            .render(&MapView::project(state, self.config.fallback_center));
    }

    fn perform(&self, effects: Vec<Effect>, completion_tx: &mpsc::UnboundedSender<Completion>) {
        for effect in effects {
            match effect {
                Effect::Resolve {
                    generation,
                    origin_text,
                    destination_text,
                } => self.spawn_resolve(generation, origin_text, destination_text, completion_tx),
                Effect::ComputeRoute {
                    generation,
                    origin,
                    destination,
                } => self.spawn_route(generation, origin, destination, completion_tx),
                Effect::Recenter(center) => self.surface.recenter(center),
            }
        }
    }

    fn spawn_resolve(
        &self,
        generation: u64,
        origin_text: Option<String>,
        destination_text: String,
        completion_tx: &mpsc::UnboundedSender<Completion>,
    ) {
        let geocoder = Arc::clone(&self.geocoder);
        let limit = self.config.request_timeout();
        let completion_tx = completion_tx.clone();

        tokio::spawn(async move {
            let origin = match origin_text {
                Some(text) => Some(geocode_within(geocoder.as_ref(), &text, limit).await),
                None => None,
            };
            let destination = geocode_within(geocoder.as_ref(), &destination_text, limit).await;
            deliver(
                &completion_tx,
                Completion::Resolved {
                    generation,
                    origin,
                    destination,
                },
            );
        });
    }

    fn spawn_route(
        &self,
        generation: u64,
        origin: Coordinate,
        destination: Coordinate,
        completion_tx: &mpsc::UnboundedSender<Completion>,
    ) {
        let router = Arc::clone(&self.router);
        let limit = self.config.request_timeout();
        let completion_tx = completion_tx.clone();

        tokio::spawn(async move {
            let result = route_within(router.as_ref(), origin, destination, limit).await;
            deliver(
                &completion_tx,
                Completion::Routed {
                    generation,
                    origin,
                    result,
                },
            );
        });
    }

    fn spawn_locate(&self, completion_tx: &mpsc::UnboundedSender<Completion>) {
        let locator = Arc::clone(&self.locator);
        let requested_at = self.core.state().generation;
        let completion_tx = completion_tx.clone();

        tokio::spawn(async move {
            let fix = locator.current_position().await;
            deliver(&completion_tx, Completion::Located { requested_at, fix });
        });
    }
}

fn deliver(completion_tx: &mpsc::UnboundedSender<Completion>, completion: Completion) {
    if completion_tx.send(completion).is_err() {
        debug!("Engine stopped, dropping completion");
    }
}

async fn geocode_within(
    geocoder: &dyn GeocodingPort,
    text: &str,
    limit: Option<Duration>,
) -> GeocodeResult {
    let Some(limit) = limit else {
        return geocoder.geocode(text).await;
    };
    tokio::time::timeout(limit, geocoder.geocode(text))
        .await
        .unwrap_or_else(|_| {
            GeocodeResult::not_found(MissReason::Transport(format!(
                "geocoding timed out after {}s",
                limit.as_secs()
            )))
        })
}

async fn route_within(
    router: &dyn RoutingPort,
    origin: Coordinate,
    destination: Coordinate,
    limit: Option<Duration>,
) -> RouteResult {
    let Some(limit) = limit else {
        return router.route(origin, destination).await;
    };
    tokio::time::timeout(limit, router.route(origin, destination))
        .await
        .unwrap_or_else(|_| {
            RouteResult::failed(
                RouteFailureKind::Transport,
                format!("routing timed out after {}s", limit.as_secs()),
            )
        })
}

/// Cloneable handle to a running engine
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::UnboundedSender<EngineCommand>,
    state: watch::Receiver<EngineState>,
}

impl EngineHandle {
    /// Start a search and return the generation it was assigned
    pub async fn search(&self, query: SearchQuery) -> Result<u64, ApplicationError> {
        let (ack, assigned) = oneshot::channel();
        self.send(EngineCommand::Search {
            query,
            ack: Some(ack),
        })?;
        assigned.await.map_err(|_| ApplicationError::EngineStopped)
    }

    /// Route to a picked place and return the generation it was assigned
    pub async fn select_place(&self, destination: Coordinate) -> Result<u64, ApplicationError> {
        let (ack, assigned) = oneshot::channel();
        self.send(EngineCommand::SelectPlace {
            destination,
            ack: Some(ack),
        })?;
        assigned.await.map_err(|_| ApplicationError::EngineStopped)
    }

    /// Report a new origin
    pub fn update_origin(&self, origin: Coordinate) -> Result<(), ApplicationError> {
        self.send(EngineCommand::UpdateOrigin(origin))
    }

    /// Ask for a fresh device position
    pub fn locate(&self) -> Result<(), ApplicationError> {
        self.send(EngineCommand::Locate)
    }

    /// Stop the engine
    pub fn exit(&self) -> Result<(), ApplicationError> {
        self.send(EngineCommand::Exit)
    }

    /// Latest published state
    #[must_use]
    pub fn snapshot(&self) -> EngineState {
        self.state.borrow().clone()
    }

    /// Receiver notified after every applied transition
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<EngineState> {
        self.state.clone()
    }

    /// Wait until the published state satisfies `predicate`
    pub async fn wait_until(
        &self,
        predicate: impl FnMut(&EngineState) -> bool,
    ) -> Result<EngineState, ApplicationError> {
        let mut receiver = self.state.clone();
        let state = receiver
            .wait_for(predicate)
            .await
            .map_err(|_| ApplicationError::EngineStopped)?;
        Ok(state.clone())
    }

    /// Wait until the search issued under `generation` stops loading or is
    /// superseded by a newer request
    pub async fn settled(&self, generation: u64) -> Result<EngineState, ApplicationError> {
        self.wait_until(|state| {
            state.generation > generation
                || (state.generation == generation && !state.phase.is_loading())
        })
        .await
    }

    fn send(&self, command: EngineCommand) -> Result<(), ApplicationError> {
        self.commands
            .send(command)
            .map_err(|_| ApplicationError::EngineStopped)
    }
}
