//! Facade crate for hexroute.
//!
//! This crate re-exports the core domain types and, behind the `data` feature,
//! the adapters for H3 grids, OSRM routing and CSV cache files.

#![forbid(unsafe_code)]

pub use hexroute_core::{
    BuildSummary, CacheKey, CacheStore, CacheStoreError, CacheValue, Cell, CellGrid, CellSet,
    DurationError, DurationMatrix, DurationProvider, GridError, MatrixBuilder, MatrixError,
    MatrixReport, PersistentCache, RouteDuration, TravelMode, cached_duration,
};

#[cfg(feature = "data")]
pub use hexroute_data::{
    CsvCacheStore, H3Grid, OsrmDurationProvider, OsrmProviderConfig, load_cell_list,
    write_matrix_csv,
};
