//! Integration tests for the navigation clients (wiremock-based)

use std::time::{Duration, Instant};

use domain::Coordinate;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_navigation::{
    GeocodingClient, GeocodingError, GeolocationClient, IpGeolocationClient, IpLocationConfig,
    NavigationError, NominatimConfig, NominatimGeocodingClient, OsrmConfig, OsrmRoutingClient,
    RoutingClient,
};

fn nominatim_for_mock(base_url: &str) -> NominatimConfig {
    NominatimConfig {
        base_url: base_url.to_string(),
        user_agent: "wayfinder-tests".to_string(),
        ..NominatimConfig::for_testing()
    }
}

fn osrm_for_mock(base_url: &str) -> OsrmConfig {
    OsrmConfig {
        base_url: base_url.to_string(),
        ..OsrmConfig::for_testing()
    }
}

fn c(lat: f64, lon: f64) -> Coordinate {
    Coordinate::new(lat, lon).unwrap()
}

const fn sample_route_json() -> &'static str {
    r#"{
        "code": "Ok",
        "routes": [{
            "geometry": {
                "type": "LineString",
                "coordinates": [[90.41, 23.81], [90.4105, 23.80], [90.41, 23.79]]
            },
            "legs": [],
            "distance": 2250.3,
            "duration": 310.9,
            "weight": 310.9
        }],
        "waypoints": []
    }"#
}

// ============================================================================
// Nominatim
// ============================================================================

#[tokio::test]
async fn test_geocode_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Gulshan"))
        .and(query_param("limit", "1"))
        .and(header("user-agent", "wayfinder-tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"lat": "23.79", "lon": "90.41", "display_name": "Gulshan, Dhaka"}]"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let coordinate = client.geocode("  Gulshan ").await.unwrap();

    assert_eq!(coordinate, c(23.79, 90.41));
}

#[tokio::test]
async fn test_geocode_sends_country_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("countrycodes", "bd"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"lat": "23.79", "lon": "90.41"}]"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        country_filter: "bd".to_string(),
        ..nominatim_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();
    assert!(client.geocode("Gulshan").await.is_ok());
}

#[tokio::test]
async fn test_geocode_no_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Atlantis").await.unwrap_err();

    assert!(matches!(err, GeocodingError::AddressNotFound(_)));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_geocode_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Gulshan").await.unwrap_err();

    assert!(matches!(err, GeocodingError::RequestFailed(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_geocode_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode("Gulshan").await.unwrap_err();

    assert!(matches!(err, GeocodingError::ParseError(_)));
}

#[tokio::test]
async fn test_geocode_respects_rate_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string(r#"[{"lat": "23.79", "lon": "90.41"}]"#),
        )
        .expect(2)
        .mount(&server)
        .await;

    let config = NominatimConfig {
        min_interval_ms: 300,
        ..nominatim_for_mock(&server.uri())
    };
    let client = NominatimGeocodingClient::new(&config).unwrap();

    let started = Instant::now();
    client.geocode("Gulshan").await.unwrap();
    client.geocode("Gulshan").await.unwrap();

    assert!(started.elapsed() >= Duration::from_millis(300));
}

#[tokio::test]
async fn test_geocode_blank_address_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(0)
        .mount(&server)
        .await;

    let client = NominatimGeocodingClient::new(&nominatim_for_mock(&server.uri())).unwrap();
    let err = client.geocode(" \t").await.unwrap_err();

    assert!(matches!(err, GeocodingError::EmptyAddress));
}

// ============================================================================
// OSRM
// ============================================================================

#[tokio::test]
async fn test_route_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route/v1/driving/90.41,23.81;90.41,23.79"))
        .and(query_param("overview", "full"))
        .and(query_param("geometries", "geojson"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let route = client
        .route(c(23.81, 90.41), c(23.79, 90.41))
        .await
        .unwrap();

    assert_eq!(route.polyline.len(), 3);
    assert_eq!(route.start(), c(23.81, 90.41));
    assert_eq!(route.end(), c(23.79, 90.41));
    assert_eq!(route.distance_meters, Some(2250.3));
}

#[tokio::test]
async fn test_route_uses_configured_profile() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/route/v1/foot/90.41,23.81;90.41,23.79"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_route_json()))
        .expect(1)
        .mount(&server)
        .await;

    let config = OsrmConfig {
        profile: "foot".to_string(),
        ..osrm_for_mock(&server.uri())
    };
    let client = OsrmRoutingClient::new(&config).unwrap();
    assert!(client.route(c(23.81, 90.41), c(23.79, 90.41)).await.is_ok());
}

#[tokio::test]
async fn test_route_no_route_in_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"code": "NoRoute", "message": "Impossible route"}"#),
        )
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client
        .route(c(23.81, 90.41), c(51.50, -0.12))
        .await
        .unwrap_err();

    assert!(matches!(err, NavigationError::NoRouteFound { ref code } if code == "NoRoute"));
    assert!(!err.is_transport());
}

#[tokio::test]
async fn test_route_bad_request_with_code() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_string(r#"{"code": "NoSegment", "message": "Could not find a matching segment"}"#),
        )
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client
        .route(c(23.81, 90.41), c(0.0, 0.0))
        .await
        .unwrap_err();

    assert!(matches!(err, NavigationError::NoRouteFound { ref code } if code == "NoSegment"));
}

#[tokio::test]
async fn test_route_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client
        .route(c(23.81, 90.41), c(23.79, 90.41))
        .await
        .unwrap_err();

    assert!(matches!(err, NavigationError::RequestFailed(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn test_route_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = OsrmRoutingClient::new(&osrm_for_mock(&server.uri())).unwrap();
    let err = client
        .route(c(23.81, 90.41), c(23.79, 90.41))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        NavigationError::RateLimitExceeded {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_route_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(sample_route_json())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let config = OsrmConfig {
        timeout_secs: 1,
        ..osrm_for_mock(&server.uri())
    };
    let client = OsrmRoutingClient::new(&config).unwrap();
    let err = client
        .route(c(23.81, 90.41), c(23.79, 90.41))
        .await
        .unwrap_err();

    assert!(err.is_transport());
}

// ============================================================================
// IP geolocation
// ============================================================================

#[tokio::test]
async fn test_locate_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"status": "success", "lat": 23.81, "lon": 90.41}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = IpLocationConfig {
        base_url: format!("{}/json", server.uri()),
        timeout_secs: 5,
    };
    let client = IpGeolocationClient::new(&config).unwrap();

    assert_eq!(client.locate().await.unwrap(), c(23.81, 90.41));
}

#[tokio::test]
async fn test_locate_failed_lookup() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"status": "fail", "message": "private range"}"#),
        )
        .mount(&server)
        .await;

    let config = IpLocationConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    let client = IpGeolocationClient::new(&config).unwrap();

    let err = client.locate().await.unwrap_err();
    assert!(matches!(err, NavigationError::LocationUnavailable(_)));
}

#[tokio::test]
async fn test_locate_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let config = IpLocationConfig {
        base_url: server.uri(),
        timeout_secs: 5,
    };
    let client = IpGeolocationClient::new(&config).unwrap();

    assert!(client.locate().await.unwrap_err().is_transport());
}
