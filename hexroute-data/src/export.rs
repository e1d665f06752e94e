//! Hand-off of a finished matrix to downstream consumers.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use hexroute_core::DurationMatrix;
use log::info;
use thiserror::Error;

/// Header row of exported matrices.
pub const MATRIX_HEADER: [&str; 3] = ["source", "destination", "duration_seconds"];

/// Errors raised while exporting a matrix.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The output file could not be created.
    #[error("failed to create {path}: {source}")]
    Create {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },
    /// A row could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// Output path.
        path: Utf8PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },
}

/// Write every ordered entry of `matrix` as `source,destination,seconds`,
/// replacing any existing file. Returns the number of rows written.
///
/// # Errors
///
/// Returns [`ExportError`] when the file cannot be created or written.
pub fn write_matrix_csv(path: &Utf8Path, matrix: &DurationMatrix) -> Result<usize, ExportError> {
    let file = hexroute_fs::create_truncate(path).map_err(|source| ExportError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let write_error = |source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut writer = csv::Writer::from_writer(file);
    writer.write_record(MATRIX_HEADER).map_err(write_error)?;
    let mut rows = 0_usize;
    for (source, destination, duration) in matrix.iter() {
        let seconds = duration.as_secs_f64().to_string();
        writer
            .write_record([source.as_str(), destination.as_str(), seconds.as_str()])
            .map_err(write_error)?;
        rows += 1;
    }
    writer
        .flush()
        .map_err(|err| write_error(csv::Error::from(err)))?;
    info!("wrote {rows} matrix entries to {path}");
    Ok(rows)
}
