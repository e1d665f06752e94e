//! Integration tests for `OsrmDurationProvider` against a mock OSRM server.

use h3o::{LatLng, Resolution};
use hexroute_core::{Cell, DurationError, DurationProvider, RouteDuration, TravelMode};
use hexroute_data::H3Grid;
use hexroute_data::routing::{OsrmDurationProvider, OsrmProviderConfig};
use rstest::{fixture, rstest};
use std::time::Duration;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ROUTE_PATH: &str = r"^/route/v1/driving/[-0-9.]+,[-0-9.]+;[-0-9.]+,[-0-9.]+$";

/// Mock server running on a runtime owned by the test.
struct OsrmStub {
    server: MockServer,
    runtime: Runtime,
}

impl OsrmStub {
    fn respond_with(&self, template: ResponseTemplate) {
        self.runtime.block_on(
            Mock::given(method("GET"))
                .and(path_regex(ROUTE_PATH))
                .and(query_param("overview", "false"))
                .respond_with(template)
                .mount(&self.server),
        );
    }

    fn provider(&self) -> OsrmDurationProvider<H3Grid> {
        let config = OsrmProviderConfig::new(self.server.uri())
            .with_timeout(Duration::from_millis(500))
            .with_user_agent("hexroute-tests");
        OsrmDurationProvider::with_config(config, H3Grid).expect("provider should build")
    }

    fn received(&self) -> usize {
        self.runtime
            .block_on(self.server.received_requests())
            .map_or(0, |requests| requests.len())
    }
}

#[fixture]
fn stub() -> OsrmStub {
    let runtime = Runtime::new().expect("test runtime");
    let server = runtime.block_on(MockServer::start());
    OsrmStub { runtime, server }
}

fn cell(lat: f64, lng: f64) -> Cell {
    let index = LatLng::new(lat, lng)
        .expect("valid coordinate")
        .to_cell(Resolution::Seven);
    Cell::new(index.to_string())
}

fn pair() -> (Cell, Cell) {
    (cell(-34.93, 138.60), cell(-34.88, 138.66))
}

#[rstest]
fn successful_routes_return_seconds(stub: OsrmStub) {
    stub.respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
        "code": "Ok",
        "routes": [{"duration": 612.4, "distance": 8123.0}]
    })));
    let (source, destination) = pair();

    let result = stub
        .provider()
        .duration(&source, &destination, &TravelMode::driving())
        .expect("route should resolve");

    assert_eq!(result, RouteDuration::Seconds(612.4));
    assert_eq!(stub.received(), 1);
}

#[rstest]
fn routing_failures_are_unavailable(stub: OsrmStub) {
    stub.respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
        "code": "NoSegment",
        "message": "Could not find a matching segment for any coordinate."
    })));
    let (source, destination) = pair();

    let result = stub
        .provider()
        .duration(&source, &destination, &TravelMode::driving())
        .expect("service failures are not errors");

    assert!(matches!(result, RouteDuration::Unavailable { ref code, .. } if code == "NoSegment"));
}

#[rstest]
fn error_statuses_without_a_route_body_are_fatal(stub: OsrmStub) {
    stub.respond_with(ResponseTemplate::new(503).set_body_string("maintenance"));
    let (source, destination) = pair();

    let err = stub
        .provider()
        .duration(&source, &destination, &TravelMode::driving())
        .expect_err("503 should fail");

    assert!(matches!(err, DurationError::Http { status: 503, .. }));
}

#[rstest]
fn undecodable_success_bodies_are_parse_errors(stub: OsrmStub) {
    stub.respond_with(ResponseTemplate::new(200).set_body_string("<html>"));
    let (source, destination) = pair();

    let err = stub
        .provider()
        .duration(&source, &destination, &TravelMode::driving())
        .expect_err("html should not parse");

    assert!(matches!(err, DurationError::Parse { .. }));
}

#[rstest]
fn slow_responses_time_out(stub: OsrmStub) {
    stub.respond_with(
        ResponseTemplate::new(200)
            .set_delay(Duration::from_secs(3))
            .set_body_json(serde_json::json!({"code": "Ok", "routes": []})),
    );
    let (source, destination) = pair();

    let err = stub
        .provider()
        .duration(&source, &destination, &TravelMode::driving())
        .expect_err("delay exceeds the timeout");

    assert!(matches!(err, DurationError::Timeout { timeout_secs: 0, .. }));
}

#[rstest]
fn identical_cells_never_reach_the_server(stub: OsrmStub) {
    let (source, _) = pair();

    let result = stub
        .provider()
        .duration(&source, &source, &TravelMode::driving())
        .expect("self-pair");

    assert_eq!(result, RouteDuration::ZERO);
    assert_eq!(stub.received(), 0);
}

#[tokio::test(flavor = "multi_thread")]
async fn works_inside_a_multi_threaded_runtime() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path_regex(ROUTE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "code": "Ok",
            "routes": [{"duration": 42.0}]
        })))
        .mount(&server)
        .await;
    let uri = server.uri();

    let result = tokio::task::spawn_blocking(move || {
        let provider = OsrmDurationProvider::new(uri, H3Grid).expect("provider should build");
        let (source, destination) = pair();
        provider.duration(&source, &destination, &TravelMode::driving())
    })
    .await
    .expect("blocking task should join")
    .expect("route should resolve");

    assert_eq!(result.seconds(), Some(42.0));
}
