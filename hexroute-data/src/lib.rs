//! Adapters connecting the hexroute core to files, H3 and routing services.
//!
//! Responsibilities:
//! - Persist cache records as CSV ([`CsvCacheStore`]).
//! - Resolve cells and k-disks on the H3 grid ([`H3Grid`]).
//! - Query OSRM for point-to-point durations ([`routing`]).
//! - Read cell sets from lists or region boundaries ([`cells`]) and export
//!   finished matrices ([`export`]).
//!
//! Boundaries:
//! - Domain rules (symmetry, memoization, neighbour bounding) live in
//!   `hexroute-core`.
//! - Filesystem access goes through `hexroute-fs`.

#![forbid(unsafe_code)]

mod cache_store;
pub mod cells;
pub mod export;
mod grid;
pub mod routing;

pub use cache_store::{CACHE_HEADER, CsvCacheStore};
pub use cells::{CellSourceError, apply_denylist, cover_polygon, load_cell_list, read_geojson_polygon};
pub use export::{ExportError, write_matrix_csv};
pub use grid::H3Grid;
pub use routing::{OsrmDurationProvider, OsrmProviderConfig, ProviderBuildError};
