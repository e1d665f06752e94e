//! Sources for the cell set of a run.
//!
//! A cell set comes either from a CSV list whose first column holds cell
//! identifiers, or from a region boundary tiled into H3 cells. Either can be
//! narrowed afterwards with a denylist.

use std::io::{self, Read};

use camino::{Utf8Path, Utf8PathBuf};
use geo::Polygon;
use geojson::GeoJson;
use h3o::Resolution;
use h3o::geom::{ContainmentMode, TilerBuilder};
use hexroute_core::{Cell, CellSet};
use log::info;
use thiserror::Error;

/// Errors raised while reading or generating cell sets.
#[derive(Debug, Error)]
pub enum CellSourceError {
    /// The source file could not be opened or read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A cell list row could not be decoded.
    #[error("invalid cell list {path}: {source}")]
    Csv {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
    /// A boundary file is not valid GeoJSON.
    #[error("invalid GeoJSON in {path}: {message}")]
    GeoJson {
        /// File that failed.
        path: Utf8PathBuf,
        /// Parser error description.
        message: String,
    },
    /// A boundary file holds something other than a single polygon.
    #[error("{path} does not contain a polygon: {message}")]
    NotAPolygon {
        /// File that failed.
        path: Utf8PathBuf,
        /// What was found instead.
        message: String,
    },
    /// The requested H3 resolution does not exist.
    #[error("invalid H3 resolution {resolution}: {message}")]
    Resolution {
        /// Requested resolution.
        resolution: u8,
        /// Library error description.
        message: String,
    },
    /// The polygon could not be tiled.
    #[error("failed to tile boundary: {message}")]
    Tiling {
        /// Library error description.
        message: String,
    },
}

/// Read a cell set from a CSV file with a header row.
///
/// The first column of every row is taken as a cell identifier; blank values
/// are ignored and duplicates collapse.
///
/// # Errors
///
/// Returns [`CellSourceError::Io`] when the file cannot be opened and
/// [`CellSourceError::Csv`] when a row cannot be decoded.
pub fn load_cell_list(path: &Utf8Path) -> Result<CellSet, CellSourceError> {
    let file = hexroute_fs::open_read(path).map_err(|source| CellSourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(file);

    let mut cells = CellSet::new();
    for result in reader.records() {
        let record = result.map_err(|source| CellSourceError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(id) = record.get(0).map(str::trim).filter(|id| !id.is_empty()) {
            cells.insert(Cell::from(id));
        }
    }
    info!("loaded {} cells from {path}", cells.len());
    Ok(cells)
}

/// Read a region boundary from a GeoJSON file.
///
/// Accepts a bare `Polygon` geometry, a `Feature` whose geometry is a
/// polygon, or a `FeatureCollection` whose first feature is.
///
/// # Errors
///
/// Returns [`CellSourceError::Io`], [`CellSourceError::GeoJson`] or
/// [`CellSourceError::NotAPolygon`].
pub fn read_geojson_polygon(path: &Utf8Path) -> Result<Polygon<f64>, CellSourceError> {
    let io_error = |source| CellSourceError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut text = String::new();
    hexroute_fs::open_read(path)
        .map_err(io_error)?
        .read_to_string(&mut text)
        .map_err(io_error)?;

    let geojson: GeoJson = text.parse().map_err(|err: geojson::Error| CellSourceError::GeoJson {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    let found = match geojson {
        GeoJson::Geometry(geometry) => Some(geometry),
        GeoJson::Feature(feature) => feature.geometry,
        GeoJson::FeatureCollection(collection) => collection
            .features
            .into_iter()
            .next()
            .and_then(|feature| feature.geometry),
    };
    let geometry = found.ok_or_else(|| CellSourceError::NotAPolygon {
        path: path.to_path_buf(),
        message: "no geometry".to_owned(),
    })?;

    Polygon::<f64>::try_from(geometry.value).map_err(|err| CellSourceError::NotAPolygon {
        path: path.to_path_buf(),
        message: err.to_string(),
    })
}

/// Tile `polygon` into H3 cells at `resolution`.
///
/// A cell belongs to the coverage when its centroid lies inside the polygon.
///
/// # Errors
///
/// Returns [`CellSourceError::Resolution`] for resolutions above 15 and
/// [`CellSourceError::Tiling`] for polygons H3 cannot tile.
pub fn cover_polygon(polygon: Polygon<f64>, resolution: u8) -> Result<CellSet, CellSourceError> {
    let level = Resolution::try_from(resolution).map_err(|err| CellSourceError::Resolution {
        resolution,
        message: err.to_string(),
    })?;
    let mut tiler = TilerBuilder::new(level)
        .containment_mode(ContainmentMode::ContainsCentroid)
        .build();
    tiler.add(polygon).map_err(|err| CellSourceError::Tiling {
        message: err.to_string(),
    })?;

    let cells: CellSet = tiler
        .into_coverage()
        .map(|index| Cell::new(index.to_string()))
        .collect();
    info!("boundary covers {} cells at resolution {resolution}", cells.len());
    Ok(cells)
}

/// Remove every denylisted cell from `cells`, returning how many were
/// removed.
pub fn apply_denylist(cells: &mut CellSet, denied: &CellSet) -> usize {
    let removed = cells.remove_all(denied);
    if removed > 0 {
        info!("removed {removed} denylisted cells");
    }
    removed
}
