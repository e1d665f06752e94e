//! [`CellGrid`] over the H3 hierarchical hexagonal grid.

use geo::Coord;
use h3o::{CellIndex, LatLng};
use hexroute_core::{Cell, CellGrid, GridError};

/// H3 cells addressed by their hexadecimal string form.
///
/// # Examples
///
/// ```
/// use h3o::{LatLng, Resolution};
/// use hexroute_core::{Cell, CellGrid};
/// use hexroute_data::H3Grid;
///
/// let index = LatLng::new(-34.93, 138.60)?.to_cell(Resolution::Seven);
/// let disk = H3Grid.disk(&Cell::new(index.to_string()), 1)?;
/// assert_eq!(disk.len(), 7);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct H3Grid;

fn parse(cell: &Cell) -> Result<CellIndex, GridError> {
    cell.as_str()
        .parse::<CellIndex>()
        .map_err(|err| GridError::InvalidCell {
            cell: cell.to_string(),
            message: err.to_string(),
        })
}

impl CellGrid for H3Grid {
    fn centroid(&self, cell: &Cell) -> Result<Coord, GridError> {
        let centre = LatLng::from(parse(cell)?);
        Ok(Coord {
            x: centre.lng(),
            y: centre.lat(),
        })
    }

    fn disk(&self, cell: &Cell, radius: u32) -> Result<Vec<Cell>, GridError> {
        let disk: Vec<CellIndex> = parse(cell)?.grid_disk(radius);
        Ok(disk
            .into_iter()
            .map(|index| Cell::new(index.to_string()))
            .collect())
    }
}
