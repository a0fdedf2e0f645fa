//! Behavioural tests for the route coordination engine
//!
//! Adapter fakes complete after configurable delays so completion order can
//! be forced under tokio's paused clock.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use application::{
    EngineConfig, EngineCore, Completion, Effect, GeocodingPort, LocationPort, MapSurfacePort,
    MapView, RouteEngine, RoutingPort,
};
use async_trait::async_trait;
use domain::{
    Coordinate, ErrorKind, GeocodeResult, MissReason, Polyline, PositionFix, Route,
    RouteFailureKind, RouteResult, SearchPhase, SearchQuery,
};
use parking_lot::Mutex;
use proptest::prelude::*;

fn c(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

const ORIGIN: Coordinate = Coordinate::new_unchecked(23.81, 90.41);
const GULSHAN: Coordinate = Coordinate::new_unchecked(23.79, 90.41);
const BANANI: Coordinate = Coordinate::new_unchecked(23.794, 90.404);

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct DelayedGeocoder {
    answers: HashMap<String, (Duration, GeocodeResult)>,
    calls: Mutex<Vec<String>>,
}

impl DelayedGeocoder {
    fn answer(mut self, text: &str, after_ms: u64, result: GeocodeResult) -> Self {
        self.answers
            .insert(text.to_string(), (Duration::from_millis(after_ms), result));
        self
    }
}

#[async_trait]
impl GeocodingPort for DelayedGeocoder {
    async fn geocode(&self, text: &str) -> GeocodeResult {
        self.calls.lock().push(text.to_string());
        match self.answers.get(text) {
            Some((delay, result)) => {
                tokio::time::sleep(*delay).await;
                result.clone()
            },
            None => GeocodeResult::not_found(MissReason::NoMatch),
        }
    }
}

/// Routes in a straight line; the delay depends on the destination
struct DelayedRouter {
    slow_destination: Option<Coordinate>,
    fail: bool,
    calls: Mutex<Vec<(Coordinate, Coordinate)>>,
}

impl DelayedRouter {
    fn new() -> Self {
        Self {
            slow_destination: None,
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl RoutingPort for DelayedRouter {
    async fn route(&self, origin: Coordinate, destination: Coordinate) -> RouteResult {
        self.calls.lock().push((origin, destination));
        let delay = if self.slow_destination == Some(destination) {
            Duration::from_millis(500)
        } else {
            Duration::from_millis(20)
        };
        tokio::time::sleep(delay).await;
        if self.fail {
            return RouteResult::failed(RouteFailureKind::NoPath, "NoRoute");
        }
        RouteResult::computed(Route::new(Polyline::new(vec![origin, destination]).unwrap()))
    }
}

struct FixedLocator(PositionFix);

#[async_trait]
impl LocationPort for FixedLocator {
    async fn current_position(&self) -> PositionFix {
        self.0.clone()
    }
}

/// Never answers, like a hung network call
struct HungGeocoder;

#[async_trait]
impl GeocodingPort for HungGeocoder {
    async fn geocode(&self, _text: &str) -> GeocodeResult {
        std::future::pending().await
    }
}

#[derive(Default)]
struct RecordingSurface {
    views: Mutex<Vec<MapView>>,
    centers: Mutex<Vec<Coordinate>>,
}

impl MapSurfacePort for RecordingSurface {
    fn recenter(&self, center: Coordinate) {
        self.centers.lock().push(center);
    }

    fn render(&self, view: &MapView) {
        self.views.lock().push(view.clone());
    }
}

fn start(
    geocoder: Arc<dyn GeocodingPort>,
    router: Arc<dyn RoutingPort>,
    fix: PositionFix,
    surface: Arc<RecordingSurface>,
    config: EngineConfig,
) -> application::EngineHandle {
    let (handle, _task) = RouteEngine::new(
        geocoder,
        router,
        Arc::new(FixedLocator(fix)),
        surface,
        config,
    )
    .spawn();
    handle
}

// ============================================================================
// Runner behaviour
// ============================================================================

#[tokio::test(start_paused = true)]
async fn late_geocode_of_older_search_is_discarded() {
    let geocoder = Arc::new(
        DelayedGeocoder::default()
            .answer("Banani", 500, GeocodeResult::found(BANANI))
            .answer("Gulshan", 50, GeocodeResult::found(GULSHAN)),
    );
    let router = Arc::new(DelayedRouter::new());
    let surface = Arc::new(RecordingSurface::default());
    let handle = start(
        geocoder.clone(),
        router.clone(),
        PositionFix::acquired(ORIGIN),
        surface.clone(),
        EngineConfig::default(),
    );
    handle.wait_until(|s| s.origin.is_some()).await.unwrap();

    let first = handle.search(SearchQuery::to("Banani")).await.unwrap();
    let second = handle.search(SearchQuery::to("Gulshan")).await.unwrap();
    assert_eq!(second, first + 1);

    tokio::time::sleep(Duration::from_secs(2)).await;

    let state = handle.snapshot();
    assert_eq!(state.generation, second);
    assert_eq!(state.phase, SearchPhase::Routed);
    assert_eq!(state.destination, Some(GULSHAN));
    assert_eq!(state.route.route().unwrap().end(), GULSHAN);

    assert_eq!(geocoder.calls.lock().len(), 2);
    assert_eq!(router.calls.lock().as_slice(), &[(ORIGIN, GULSHAN)]);
    assert!(
        surface
            .views
            .lock()
            .iter()
            .all(|view| view.destination_marker != Some(BANANI))
    );
}

#[tokio::test(start_paused = true)]
async fn late_route_of_older_search_is_discarded() {
    let geocoder = Arc::new(
        DelayedGeocoder::default()
            .answer("Banani", 10, GeocodeResult::found(BANANI))
            .answer("Gulshan", 10, GeocodeResult::found(GULSHAN)),
    );
    let router = Arc::new(DelayedRouter {
        slow_destination: Some(BANANI),
        ..DelayedRouter::new()
    });
    let surface = Arc::new(RecordingSurface::default());
    let handle = start(
        geocoder,
        router.clone(),
        PositionFix::acquired(ORIGIN),
        surface,
        EngineConfig::default(),
    );
    handle.wait_until(|s| s.origin.is_some()).await.unwrap();

    let first = handle.search(SearchQuery::to("Banani")).await.unwrap();
    handle
        .wait_until(|s| s.generation == first && s.phase == SearchPhase::RoutePending)
        .await
        .unwrap();
    let second = handle.search(SearchQuery::to("Gulshan")).await.unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;

    let state = handle.snapshot();
    assert_eq!(state.generation, second);
    assert_eq!(state.destination, Some(GULSHAN));
    assert_eq!(state.route.route().unwrap().end(), GULSHAN);
    assert_eq!(router.calls.lock().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn geocoding_miss_keeps_origin_and_shows_banner() {
    let geocoder = Arc::new(DelayedGeocoder::default());
    let surface = Arc::new(RecordingSurface::default());
    let handle = start(
        geocoder,
        Arc::new(DelayedRouter::new()),
        PositionFix::acquired(ORIGIN),
        surface.clone(),
        EngineConfig::default(),
    );
    handle.wait_until(|s| s.origin.is_some()).await.unwrap();

    let generation = handle.search(SearchQuery::to("Atlantis")).await.unwrap();
    let state = handle.settled(generation).await.unwrap();

    assert_eq!(state.origin, Some(ORIGIN));
    assert_eq!(state.last_error, Some(ErrorKind::DestinationNotFound));
    let last = surface.views.lock().last().cloned().unwrap();
    assert_eq!(last.banner_message(), Some("No results for that address"));
    assert_eq!(last.origin_marker, Some(ORIGIN));
}

#[tokio::test(start_paused = true)]
async fn partial_failure_keeps_destination_marker() {
    let geocoder =
        Arc::new(DelayedGeocoder::default().answer("Gulshan", 10, GeocodeResult::found(GULSHAN)));
    let router = Arc::new(DelayedRouter {
        fail: true,
        ..DelayedRouter::new()
    });
    let surface = Arc::new(RecordingSurface::default());
    let handle = start(
        geocoder,
        router,
        PositionFix::acquired(ORIGIN),
        surface.clone(),
        EngineConfig::default(),
    );
    handle.wait_until(|s| s.origin.is_some()).await.unwrap();

    let generation = handle.search(SearchQuery::to("Gulshan")).await.unwrap();
    let state = handle.settled(generation).await.unwrap();

    assert_eq!(state.phase, SearchPhase::Failed);
    assert_eq!(state.destination, Some(GULSHAN));
    assert!(state.route.is_unset());
    assert_eq!(state.last_error, Some(ErrorKind::RouteUnavailable));

    let last = surface.views.lock().last().cloned().unwrap();
    assert_eq!(last.destination_marker, Some(GULSHAN));
    assert!(last.route.is_none());
}

#[tokio::test(start_paused = true)]
async fn denied_location_centers_on_fallback_without_banner() {
    let surface = Arc::new(RecordingSurface::default());
    let handle = start(
        Arc::new(DelayedGeocoder::default()),
        Arc::new(DelayedRouter::new()),
        PositionFix::unavailable("permission denied"),
        surface.clone(),
        EngineConfig::default(),
    );
    tokio::time::sleep(Duration::from_millis(100)).await;

    let state = handle.snapshot();
    assert!(state.origin.is_none());
    assert!(state.last_error.is_none());

    let views = surface.views.lock();
    let last = views.last().unwrap();
    assert_eq!(last.center, Coordinate::dhaka());
    assert!(last.banner.is_none());
    assert_eq!(surface.centers.lock().first(), Some(&Coordinate::dhaka()));
}

#[tokio::test(start_paused = true)]
async fn identical_searches_settle_identically() {
    let geocoder =
        Arc::new(DelayedGeocoder::default().answer("Gulshan", 30, GeocodeResult::found(GULSHAN)));
    let surface = Arc::new(RecordingSurface::default());
    let handle = start(
        geocoder,
        Arc::new(DelayedRouter::new()),
        PositionFix::acquired(ORIGIN),
        surface,
        EngineConfig::default(),
    );
    handle.wait_until(|s| s.origin.is_some()).await.unwrap();

    let first = handle.search(SearchQuery::to("Gulshan")).await.unwrap();
    let first_state = handle.settled(first).await.unwrap();
    let second = handle.search(SearchQuery::to("Gulshan")).await.unwrap();
    let second_state = handle.settled(second).await.unwrap();

    assert!(first_state.same_outcome(&second_state));
    assert_ne!(first_state.generation, second_state.generation);
}

#[tokio::test(start_paused = true)]
async fn hung_lookup_stays_pending_without_timeout() {
    let handle = start(
        Arc::new(HungGeocoder),
        Arc::new(DelayedRouter::new()),
        PositionFix::acquired(ORIGIN),
        Arc::new(RecordingSurface::default()),
        EngineConfig::default(),
    );
    handle.search(SearchQuery::to("Gulshan")).await.unwrap();
    tokio::time::sleep(Duration::from_secs(3600)).await;

    assert_eq!(handle.snapshot().phase, SearchPhase::ResolvingDestination);
}

#[tokio::test(start_paused = true)]
async fn configured_timeout_turns_hung_lookup_into_miss() {
    let handle = start(
        Arc::new(HungGeocoder),
        Arc::new(DelayedRouter::new()),
        PositionFix::acquired(ORIGIN),
        Arc::new(RecordingSurface::default()),
        EngineConfig::default().with_request_timeout_secs(5),
    );
    let generation = handle.search(SearchQuery::to("Gulshan")).await.unwrap();
    let state = handle.settled(generation).await.unwrap();

    assert_eq!(state.phase, SearchPhase::Failed);
    assert_eq!(state.last_error, Some(ErrorKind::DestinationNotFound));
    assert!(state.transport_error);
}

#[tokio::test(start_paused = true)]
async fn selected_place_routes_without_geocoding() {
    let geocoder = Arc::new(DelayedGeocoder::default());
    let handle = start(
        geocoder.clone(),
        Arc::new(DelayedRouter::new()),
        PositionFix::acquired(ORIGIN),
        Arc::new(RecordingSurface::default()),
        EngineConfig::default(),
    );
    handle.wait_until(|s| s.origin.is_some()).await.unwrap();

    let generation = handle.select_place(c(23.78, 90.42)).await.unwrap();
    let state = handle.settled(generation).await.unwrap();

    assert_eq!(state.phase, SearchPhase::Routed);
    assert_eq!(state.destination, Some(c(23.78, 90.42)));
    assert!(geocoder.calls.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn origin_moved_during_slow_route_is_followed() {
    let moved = c(23.70, 90.30);
    let router = Arc::new(DelayedRouter {
        slow_destination: Some(GULSHAN),
        ..DelayedRouter::new()
    });
    let handle = start(
        Arc::new(DelayedGeocoder::default()),
        router.clone(),
        PositionFix::acquired(ORIGIN),
        Arc::new(RecordingSurface::default()),
        EngineConfig::default(),
    );
    handle.wait_until(|s| s.origin.is_some()).await.unwrap();

    let generation = handle.select_place(GULSHAN).await.unwrap();
    handle
        .wait_until(|s| s.phase == SearchPhase::RoutePending)
        .await
        .unwrap();
    handle.update_origin(moved).unwrap();

    tokio::time::sleep(Duration::from_secs(2)).await;

    let state = handle.snapshot();
    assert_eq!(state.generation, generation + 1);
    assert_eq!(state.phase, SearchPhase::Routed);
    assert_eq!(state.origin, Some(moved));
    assert_eq!(state.route.route().unwrap().start(), moved);
    assert_eq!(*router.calls.lock(), vec![(ORIGIN, GULSHAN), (moved, GULSHAN)]);
}

// ============================================================================
// Staleness guard over arbitrary completion orders
// ============================================================================

fn destination_for(index: usize) -> Coordinate {
    #[allow(clippy::cast_precision_loss)]
    let offset = index as f64 * 0.01;
    c(23.70 + offset, 90.40)
}

proptest! {
    #[test]
    fn only_the_latest_search_is_applied(
        order in (1usize..=6).prop_flat_map(|n| Just((0..n).collect::<Vec<_>>()).prop_shuffle())
    ) {
        let count = order.len();
        let mut core = EngineCore::new();
        core.apply(Completion::Located { requested_at: 0, fix: PositionFix::acquired(ORIGIN) });

        let mut generations = Vec::with_capacity(count);
        for index in 0..count {
            let effects = core.search(&SearchQuery::to(format!("place {index}")));
            let Some(Effect::Resolve { generation, .. }) = effects.first() else {
                panic!("search must resolve");
            };
            generations.push(*generation);
        }

        let mut route_requests = Vec::new();
        for index in order {
            let before = core.state().clone();
            let applied = core.apply(Completion::Resolved {
                generation: generations[index],
                origin: None,
                destination: GeocodeResult::found(destination_for(index)),
            });
            if index + 1 == count {
                let effects = applied.unwrap();
                route_requests.extend(effects.into_iter().filter_map(|effect| match effect {
                    Effect::ComputeRoute { generation, origin, destination } => {
                        Some((generation, origin, destination))
                    },
                    _ => None,
                }));
            } else {
                prop_assert!(applied.is_none());
                prop_assert_eq!(core.state(), &before);
            }
        }

        prop_assert_eq!(route_requests.len(), 1);
        let (generation, origin, destination) = route_requests[0];
        core.apply(Completion::Routed {
            generation,
            origin,
            result: RouteResult::computed(Route::new(Polyline::new(vec![origin, destination]).unwrap())),
        });

        let state = core.state();
        prop_assert_eq!(state.phase, SearchPhase::Routed);
        prop_assert_eq!(state.destination, Some(destination_for(count - 1)));
        prop_assert_eq!(state.route.route().unwrap().end(), destination_for(count - 1));
    }
}
