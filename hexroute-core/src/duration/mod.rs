//! Resolve travel durations between pairs of grid cells.
//!
//! The [`DurationProvider`] trait abstracts a directional routing query for
//! one `(source, destination, mode)` triple. Implementations separate two
//! outcomes that callers treat differently:
//!
//! - [`RouteDuration::Unavailable`] is a recoverable "no result": the
//!   service answered but reported no usable route.
//! - [`DurationError`] is fatal: the request itself failed and the run
//!   should stop.

mod error;
mod provider;

pub use error::DurationError;
pub use provider::{DurationProvider, RouteDuration};
