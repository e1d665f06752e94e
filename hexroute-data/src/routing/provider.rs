//! `DurationProvider` backed by OSRM's Route API.
//!
//! Each query resolves both cells to their centroids through a [`CellGrid`]
//! and requests
//! `{base_url}/route/v1/{mode}/{lon},{lat};{lon},{lat}?overview=false`.
//!
//! # Error model
//!
//! A response whose body decodes as a route response is never an error: a
//! `code` other than `"Ok"`, an empty route list or an unusable duration all
//! become [`RouteDuration::Unavailable`]. Timeouts, connection failures,
//! error statuses without a routing body and undecodable success bodies are
//! [`DurationError`]s and abort the caller's run.

use std::time::Duration;

use geo::Coord;
use hexroute_core::{Cell, CellGrid, DurationError, DurationProvider, RouteDuration, TravelMode};
use log::debug;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};

use super::osrm::RouteResponse;

/// Error type for [`OsrmDurationProvider`] construction failures.
#[derive(Debug)]
pub enum ProviderBuildError {
    /// The reqwest client rejected its configuration.
    HttpClient(reqwest::Error),
    /// The private current-thread runtime could not start.
    Runtime(std::io::Error),
}

impl std::fmt::Display for ProviderBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HttpClient(err) => write!(f, "failed to build HTTP client: {err}"),
            Self::Runtime(err) => write!(f, "failed to build Tokio runtime: {err}"),
        }
    }
}

impl std::error::Error for ProviderBuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::HttpClient(err) => Some(err),
            Self::Runtime(err) => Some(err),
        }
    }
}

/// `User-Agent` header sent with every route request.
pub const DEFAULT_USER_AGENT: &str = "hexroute/0.1";

/// Public OSRM demo server. It only serves the `driving` profile.
pub const DEFAULT_BASE_URL: &str = "http://router.project-osrm.org";

/// Per-request timeout applied when none is configured.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for [`OsrmDurationProvider`].
#[derive(Debug, Clone)]
pub struct OsrmProviderConfig {
    /// Server root, without the `/route/v1` suffix.
    pub base_url: String,
    /// Connect and overall request timeout.
    pub timeout: Duration,
    /// `User-Agent` header value.
    pub user_agent: String,
}

impl Default for OsrmProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl OsrmProviderConfig {
    /// Target `base_url` with the default timeout and user agent.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Replace the timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replace the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Point-to-point duration provider using the OSRM Route API.
///
/// The provider owns a current-thread Tokio runtime reused across calls.
///
/// # Runtime behaviour
///
/// Outside any Tokio runtime the provider blocks on its own runtime. Inside a
/// multi-threaded runtime (detected via [`Handle::try_current()`] and
/// [`RuntimeFlavor::MultiThread`]) it uses that runtime's handle with
/// [`tokio::task::block_in_place`] to avoid nested runtime panics. Inside a
/// `current_thread` runtime it falls back to its own runtime, which can
/// deadlock if the caller's runtime drives IO this request depends on.
pub struct OsrmDurationProvider<G> {
    client: Client,
    config: OsrmProviderConfig,
    runtime: Runtime,
    grid: G,
}

impl<G: std::fmt::Debug> std::fmt::Debug for OsrmDurationProvider<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OsrmDurationProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .field("grid", &self.grid)
            .finish()
    }
}

impl<G: CellGrid> OsrmDurationProvider<G> {
    /// Create a provider with default timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the client or runtime cannot be built.
    pub fn new(base_url: impl Into<String>, grid: G) -> Result<Self, ProviderBuildError> {
        Self::with_config(OsrmProviderConfig::new(base_url), grid)
    }

    /// Create a provider with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderBuildError`] when the client or runtime cannot be built.
    pub fn with_config(config: OsrmProviderConfig, grid: G) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            runtime,
            grid,
        })
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &OsrmProviderConfig {
        &self.config
    }

    /// Build the Route API URL for one directional query.
    fn route_url(&self, origin: Coord, destination: Coord, mode: &TravelMode) -> String {
        format!(
            "{}/route/v1/{mode}/{},{};{},{}?overview=false",
            self.config.base_url.trim_end_matches('/'),
            origin.x,
            origin.y,
            destination.x,
            destination.y
        )
    }

    async fn fetch_duration(&self, url: &str) -> Result<RouteDuration, DurationError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;

        // OSRM reports routing failures as HTTP 400 with a JSON code, so try
        // the body before judging the status.
        match serde_json::from_slice::<RouteResponse>(&body) {
            Ok(parsed) => Ok(interpret(parsed)),
            Err(err) if status.is_success() => Err(DurationError::Parse {
                message: err.to_string(),
            }),
            Err(_) => Err(DurationError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("unexpected status")
                    .to_owned(),
            }),
        }
    }

    /// Convert a reqwest error to a `DurationError`.
    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> DurationError {
        if error.is_timeout() {
            return DurationError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }

        if let Some(status) = error.status() {
            return DurationError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }

        DurationError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Map a decoded response onto the recoverable outcomes.
fn interpret(response: RouteResponse) -> RouteDuration {
    if !response.is_ok() {
        return RouteDuration::Unavailable {
            code: response.code,
            message: response.message.unwrap_or_default(),
        };
    }
    match response.first_duration() {
        Some(seconds) if Duration::try_from_secs_f64(seconds).is_ok() => {
            RouteDuration::Seconds(seconds)
        }
        Some(seconds) => RouteDuration::Unavailable {
            code: "InvalidDuration".to_owned(),
            message: format!("route duration {seconds} is not usable"),
        },
        None => RouteDuration::Unavailable {
            code: response.code,
            message: "response contained no route duration".to_owned(),
        },
    }
}

impl<G: CellGrid> DurationProvider for OsrmDurationProvider<G> {
    /// Query OSRM for the duration from `source` to `destination`.
    ///
    /// # Runtime requirements
    ///
    /// See the type-level documentation: inside a Tokio runtime the runtime
    /// must be multi-threaded to avoid blocking it.
    fn duration(
        &self,
        source: &Cell,
        destination: &Cell,
        mode: &TravelMode,
    ) -> Result<RouteDuration, DurationError> {
        if source == destination {
            return Ok(RouteDuration::ZERO);
        }
        let origin = self.grid.centroid(source)?;
        let target = self.grid.centroid(destination)?;
        let url = self.route_url(origin, target, mode);
        debug!("requesting {url}");

        let future = self.fetch_duration(&url);
        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| handle.block_on(future))
            }
            // Outside Tokio, or on a current_thread runtime.
            _ => self.runtime.block_on(future),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexroute_core::GridError;
    use hexroute_core::test_support::GraphGrid;
    use rstest::{fixture, rstest};

    #[fixture]
    fn provider() -> OsrmDurationProvider<GraphGrid> {
        // Nothing listens on the discard port; any request would fail.
        OsrmDurationProvider::new("http://127.0.0.1:9/", GraphGrid::strict(&[("a", "b")]))
            .expect("provider should build")
    }

    fn response(code: &str, durations: &[Option<f64>]) -> RouteResponse {
        let routes: Vec<serde_json::Value> = durations
            .iter()
            .map(|duration| serde_json::json!({ "duration": duration }))
            .collect();
        serde_json::from_value(serde_json::json!({ "code": code, "routes": routes }))
            .expect("valid response")
    }

    #[rstest]
    fn route_url_formats_coordinates(provider: OsrmDurationProvider<GraphGrid>) {
        let url = provider.route_url(
            Coord { x: 138.6, y: -34.9 },
            Coord { x: 138.65, y: -34.85 },
            &TravelMode::driving(),
        );

        assert_eq!(
            url,
            "http://127.0.0.1:9/route/v1/driving/138.6,-34.9;138.65,-34.85?overview=false"
        );
    }

    #[rstest]
    fn identical_cells_skip_the_request(provider: OsrmDurationProvider<GraphGrid>) {
        let cell = Cell::from("a");
        let result = provider
            .duration(&cell, &cell, &TravelMode::driving())
            .expect("self-pair should not touch the network");
        assert_eq!(result, RouteDuration::ZERO);
    }

    #[rstest]
    fn unknown_cells_fail_before_the_request(provider: OsrmDurationProvider<GraphGrid>) {
        let err = provider
            .duration(&"a".into(), &"zz".into(), &TravelMode::driving())
            .expect_err("unknown cell should fail");
        assert!(matches!(err, DurationError::Grid(GridError::InvalidCell { .. })));
    }

    #[rstest]
    fn refused_connections_are_network_errors(provider: OsrmDurationProvider<GraphGrid>) {
        let err = provider
            .duration(&"a".into(), &"b".into(), &TravelMode::driving())
            .expect_err("nothing listens on the discard port");
        assert!(
            matches!(err, DurationError::Network { .. } | DurationError::Timeout { .. }),
            "unexpected error: {err:?}"
        );
    }

    #[rstest]
    #[case(response("Ok", &[Some(754.3)]), RouteDuration::Seconds(754.3))]
    #[case(response("Ok", &[Some(0.0)]), RouteDuration::Seconds(0.0))]
    #[case(response("Ok", &[Some(12.0), Some(99.0)]), RouteDuration::Seconds(12.0))]
    fn successful_responses_yield_the_first_route(
        #[case] parsed: RouteResponse,
        #[case] expected: RouteDuration,
    ) {
        assert_eq!(interpret(parsed), expected);
    }

    #[rstest]
    #[case(response("NoRoute", &[]), "NoRoute")]
    #[case(response("Ok", &[]), "Ok")]
    #[case(response("Ok", &[None]), "Ok")]
    #[case(response("Ok", &[Some(-5.0)]), "InvalidDuration")]
    #[case(response("Ok", &[Some(1e20)]), "InvalidDuration")]
    fn other_responses_are_unavailable(#[case] parsed: RouteResponse, #[case] expected: &str) {
        match interpret(parsed) {
            RouteDuration::Unavailable { code, .. } => assert_eq!(code, expected),
            RouteDuration::Seconds(seconds) => panic!("expected unavailable, got {seconds}"),
        }
    }

    #[rstest]
    fn config_overrides_are_kept(provider: OsrmDurationProvider<GraphGrid>) {
        let config = OsrmProviderConfig::new("http://osrm.internal:5000")
            .with_timeout(Duration::from_secs(5))
            .with_user_agent("hexroute-tests");

        assert_eq!(config.base_url, "http://osrm.internal:5000");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, "hexroute-tests");
        assert_eq!(provider.config().timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }

    #[rstest]
    fn default_config_targets_the_public_server() {
        let config = OsrmProviderConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }
}
