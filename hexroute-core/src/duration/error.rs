use thiserror::Error;

use crate::GridError;

/// Fatal errors from [`crate::duration::DurationProvider::duration`].
///
/// A service that answers with a failure status is not an error; it yields
/// [`crate::RouteDuration::Unavailable`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    /// A cell could not be resolved to a coordinate.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// The request exceeded its timeout.
    #[error("request to {url} timed out after {timeout_secs}s")]
    Timeout {
        /// Requested URL.
        url: String,
        /// Configured timeout in seconds.
        timeout_secs: u64,
    },
    /// The service returned an HTTP error status without a routing payload.
    #[error("request to {url} failed with status {status}: {message}")]
    Http {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
        /// Short description of the failure.
        message: String,
    },
    /// The request could not be delivered.
    #[error("network error contacting {url}: {message}")]
    Network {
        /// Requested URL.
        url: String,
        /// Transport error description.
        message: String,
    },
    /// The service answered with a payload that could not be decoded.
    #[error("failed to parse routing response: {message}")]
    Parse {
        /// Decoder error description.
        message: String,
    },
}
