//! Grid lookups: k-disk enumeration and centroid resolution.

use geo::Coord;
use thiserror::Error;

use crate::Cell;

/// Errors raised by [`CellGrid`] implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// The identifier does not name a cell of this grid.
    #[error("{cell:?} is not a valid grid cell: {message}")]
    InvalidCell {
        /// Identifier that failed to resolve.
        cell: String,
        /// Reason reported by the grid.
        message: String,
    },
}

/// Spatial lookups over a hexagonal grid.
///
/// Coordinates use WGS84 with `x = longitude` and `y = latitude`.
///
/// # Examples
///
/// ```
/// use geo::Coord;
/// use hexroute_core::{Cell, CellGrid, GridError};
///
/// /// A grid with a single isolated cell.
/// struct Singleton;
///
/// impl CellGrid for Singleton {
///     fn centroid(&self, _cell: &Cell) -> Result<Coord, GridError> {
///         Ok(Coord { x: 138.6, y: -34.9 })
///     }
///
///     fn disk(&self, cell: &Cell, _radius: u32) -> Result<Vec<Cell>, GridError> {
///         Ok(vec![cell.clone()])
///     }
/// }
///
/// let disk = Singleton.disk(&Cell::from("a"), 3)?;
/// assert_eq!(disk, vec![Cell::from("a")]);
/// # Ok::<(), GridError>(())
/// ```
pub trait CellGrid {
    /// Resolve a cell to its centroid.
    fn centroid(&self, cell: &Cell) -> Result<Coord, GridError>;

    /// Return every cell within grid distance `radius` of `cell`, including
    /// `cell` itself. Order is unspecified.
    fn disk(&self, cell: &Cell, radius: u32) -> Result<Vec<Cell>, GridError>;
}

impl<G: CellGrid + ?Sized> CellGrid for &G {
    fn centroid(&self, cell: &Cell) -> Result<Coord, GridError> {
        (**self).centroid(cell)
    }

    fn disk(&self, cell: &Cell, radius: u32) -> Result<Vec<Cell>, GridError> {
        (**self).disk(cell, radius)
    }
}

/// Number of cells in a full k-disk: `1 + 3k(k + 1)`.
///
/// Disks clipped by pentagons or the edge of a region hold fewer cells, so
/// callers use this only for estimates.
#[must_use]
pub const fn cells_in_disk(radius: u32) -> u64 {
    let k = radius as u64;
    3u64.saturating_mul(k).saturating_mul(k + 1).saturating_add(1)
}

/// Approximate number of pair evaluations for `cell_count` cells at `radius`.
///
/// Each unordered pair is evaluated once, hence the halving.
#[must_use]
#[expect(
    clippy::integer_division,
    reason = "the estimate is informational and rounds down"
)]
pub const fn estimated_evaluations(radius: u32, cell_count: usize) -> u64 {
    cells_in_disk(radius).saturating_mul(cell_count as u64) / 2
}
