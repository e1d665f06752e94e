//! Error types emitted by the hexroute CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use hexroute_core::{CacheStoreError, MatrixError};
use hexroute_data::{CellSourceError, ExportError, ProviderBuildError};
use thiserror::Error;

/// Errors emitted by the hexroute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        /// Flag name without the leading dashes.
        field: &'static str,
        /// Environment variable that can supply the value.
        env: &'static str,
    },
    /// Two mutually exclusive options were both supplied.
    #[error("--{first} and --{second} cannot be combined")]
    ConflictingArguments {
        /// First option.
        first: &'static str,
        /// Second option.
        second: &'static str,
    },
    /// A referenced input path does not exist on disk or is not a file.
    #[error("{field} path {path:?} does not exist or is not a file")]
    MissingSourceFile {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        /// Flag naming the input.
        field: &'static str,
        /// Path that was checked.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Reading or generating the cell set failed.
    #[error(transparent)]
    CellSource(#[from] CellSourceError),
    /// Nothing is left to route once the cell set has been resolved.
    #[error("the cell set is empty after applying the denylist")]
    EmptyCellSet,
    /// Opening or loading the duration cache failed.
    #[error("failed to open duration cache: {0}")]
    Cache(#[from] CacheStoreError),
    /// Constructing the duration provider failed.
    #[error("failed to build duration provider for {base_url:?}: {source}")]
    BuildDurationProvider {
        /// Routing service the provider would target.
        base_url: String,
        /// Underlying construction error.
        #[source]
        source: ProviderBuildError,
    },
    /// The matrix build aborted.
    #[error("matrix build failed: {0}")]
    Matrix(#[from] MatrixError),
    /// Writing the matrix export failed.
    #[error(transparent)]
    Export(#[from] ExportError),
    /// Serializing the build summary failed.
    #[error("failed to serialize build summary: {0}")]
    SerialiseSummary(#[source] serde_json::Error),
    /// Writing the build summary failed.
    #[error("failed to write build summary: {0}")]
    WriteSummary(#[source] std::io::Error),
}
