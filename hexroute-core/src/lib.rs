//! Core domain types for hexroute.
//!
//! The crate models the pieces needed to estimate travel durations between
//! cells of a hexagonal grid:
//!
//! - [`Cell`], [`CellSet`] and [`TravelMode`] name what is being routed.
//! - [`CellGrid`] enumerates k-disks and resolves cell centroids.
//! - [`DurationProvider`] resolves one directional pair to a duration.
//! - [`PersistentCache`] memoizes expensive calls durably through a
//!   [`CacheStore`].
//! - [`MatrixBuilder`] drives the above over a cell set and produces a
//!   symmetric [`DurationMatrix`].
//!
//! Adapters for concrete grids, routing services and cache files live in
//! `hexroute-data`; this crate performs no I/O of its own.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod cache;
mod cell;
pub mod duration;
mod grid;
pub mod matrix;

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-support")))]
pub mod test_support;

pub use cache::{
    CacheKey, CacheRecord, CacheStats, CacheStore, CacheStoreError, CacheValue, CachedDuration,
    PersistentCache, StoredRow, cached_duration,
};
pub use cell::{Cell, CellSet, TravelMode};
pub use duration::{DurationError, DurationProvider, RouteDuration};
pub use grid::{CellGrid, GridError, cells_in_disk, estimated_evaluations};
pub use matrix::{BuildSummary, DurationMatrix, MatrixBuilder, MatrixError, MatrixReport};
