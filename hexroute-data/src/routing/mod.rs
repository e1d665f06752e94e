//! OSRM route service client.
//!
//! [`OsrmDurationProvider`] implements [`hexroute_core::DurationProvider`]
//! by resolving both cells to centroids and issuing one Route API request per
//! pair. The core trait is synchronous; the provider blocks on its HTTP calls
//! internally so the matrix builder stays free of async code.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use hexroute_core::{Cell, DurationProvider, TravelMode};
//! use hexroute_data::H3Grid;
//! use hexroute_data::routing::{OsrmDurationProvider, OsrmProviderConfig};
//!
//! let config = OsrmProviderConfig::new("http://localhost:5000")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("my-app/1.0");
//! let provider = OsrmDurationProvider::with_config(config, H3Grid)?;
//!
//! let result = provider.duration(
//!     &Cell::from("87b91694effffff"),
//!     &Cell::from("87b916948ffffff"),
//!     &TravelMode::driving(),
//! )?;
//! println!("{:?}", result.seconds());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod osrm;
mod provider;

pub use osrm::{RouteResponse, RouteSummary};
pub use provider::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, OsrmDurationProvider, OsrmProviderConfig,
    ProviderBuildError,
};
