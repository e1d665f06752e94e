//! Response types for the OSRM Route service.
//!
//! See: <http://project-osrm.org/docs/v5.24.0/api/#route-service>

use serde::Deserialize;

/// OSRM Route API response.
///
/// Failures carry a `code` other than `"Ok"` and usually a `message`; they
/// are returned with HTTP 400 as well as 200.
#[derive(Debug, Deserialize)]
pub struct RouteResponse {
    /// Status code from OSRM.
    ///
    /// Common values:
    /// - `"Ok"` - Request was successful
    /// - `"NoRoute"` - No route between the coordinates
    /// - `"NoSegment"` - A coordinate could not be snapped to the network
    /// - `"InvalidQuery"` - Invalid query parameters
    pub code: String,

    /// Optional error message when `code` is not `"Ok"`.
    #[serde(default)]
    pub message: Option<String>,

    /// Routes ordered by preference; the first is the fastest.
    #[serde(default)]
    pub routes: Vec<RouteSummary>,
}

/// The parts of a route used for duration estimates.
#[derive(Debug, Deserialize)]
pub struct RouteSummary {
    /// Estimated travel time in seconds.
    pub duration: Option<f64>,
}

impl RouteResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.code == "Ok"
    }

    /// Duration of the preferred route, if any.
    #[must_use]
    pub fn first_duration(&self) -> Option<f64> {
        self.routes.first().and_then(|route| route.duration)
    }
}
