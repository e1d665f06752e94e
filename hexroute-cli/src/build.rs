//! Build command implementation for the hexroute CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use hexroute_core::{
    CellSet, DurationProvider, MatrixBuilder, MatrixReport, PersistentCache, TravelMode,
};
use hexroute_data::routing::DEFAULT_BASE_URL;
use hexroute_data::{
    CsvCacheStore, H3Grid, OsrmDurationProvider, apply_denylist, cover_polygon, load_cell_list,
    read_geojson_polygon, write_matrix_csv,
};
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_BOUNDARY, ARG_CACHE, ARG_CELLS, ARG_DENY, ARG_MODE, ARG_OSRM_BASE_URL, ARG_OUTPUT,
    ARG_RADIUS, ARG_RESOLUTION, CliError, ENV_CELLS,
};

pub(crate) const DEFAULT_RADIUS: u32 = 7;
pub(crate) const DEFAULT_RESOLUTION: u8 = 7;
pub(crate) const DEFAULT_CACHE: &str = "travel_durations_cache.csv";

/// CLI arguments for the `build` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    long_about = "Compute travel durations between every pair of H3 cells \
                 within the k-disk radius of each other. Cells come from a \
                 CSV list or a GeoJSON boundary; durations are fetched from \
                 an OSRM server and memoized in a CSV cache so interrupted \
                 runs resume without repeating requests.",
    about = "Build a travel-duration matrix"
)]
#[ortho_config(prefix = "HEXROUTE")]
pub(crate) struct BuildArgs {
    /// CSV file whose first column lists H3 cell identifiers.
    #[arg(long = ARG_CELLS, value_name = "path")]
    #[serde(default)]
    pub(crate) cells: Option<Utf8PathBuf>,
    /// GeoJSON polygon to tile into cells instead of a cell list.
    #[arg(long = ARG_BOUNDARY, value_name = "path")]
    #[serde(default)]
    pub(crate) boundary: Option<Utf8PathBuf>,
    /// H3 resolution used when tiling a boundary.
    #[arg(long = ARG_RESOLUTION, value_name = "res")]
    #[serde(default)]
    pub(crate) resolution: Option<u8>,
    /// CSV file listing cells to exclude.
    #[arg(long = ARG_DENY, value_name = "path")]
    #[serde(default)]
    pub(crate) deny: Option<Utf8PathBuf>,
    /// Routing profile, e.g. "driving".
    #[arg(long = ARG_MODE, value_name = "profile")]
    #[serde(default)]
    pub(crate) mode: Option<String>,
    /// k-disk radius bounding which pairs are routed.
    #[arg(long = ARG_RADIUS, value_name = "k")]
    #[serde(default)]
    pub(crate) radius: Option<u32>,
    /// Path to the duration cache file.
    #[arg(long = ARG_CACHE, value_name = "path")]
    #[serde(default)]
    pub(crate) cache: Option<Utf8PathBuf>,
    /// Base URL for the OSRM server (e.g. "http://localhost:5000").
    #[arg(long = ARG_OSRM_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) osrm_base_url: Option<String>,
    /// Write the finished matrix as CSV to this path.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
}

impl BuildArgs {
    pub(crate) fn into_config(self) -> Result<BuildConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        BuildConfig::try_from(merged)
    }
}

/// Where the cells of a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CellSource {
    /// A CSV list of cell identifiers.
    List(Utf8PathBuf),
    /// A GeoJSON polygon tiled at `resolution`.
    Boundary {
        path: Utf8PathBuf,
        resolution: u8,
    },
}

/// Resolved `build` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BuildConfig {
    pub(crate) cells: CellSource,
    pub(crate) deny: Option<Utf8PathBuf>,
    pub(crate) mode: TravelMode,
    pub(crate) radius: u32,
    pub(crate) cache: Utf8PathBuf,
    pub(crate) osrm_base_url: String,
    pub(crate) output: Option<Utf8PathBuf>,
}

impl BuildConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        match &self.cells {
            CellSource::List(path) => Self::require_existing(path, ARG_CELLS)?,
            CellSource::Boundary { path, .. } => Self::require_existing(path, ARG_BOUNDARY)?,
        }
        if let Some(deny) = &self.deny {
            Self::require_existing(deny, ARG_DENY)?;
        }
        Ok(())
    }

    fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
        match hexroute_fs::is_regular_file(path) {
            Ok(true) => Ok(()),
            Ok(false) => Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            }),
            Err(source) => Err(CliError::InspectSourcePath {
                field,
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

impl TryFrom<BuildArgs> for BuildConfig {
    type Error = CliError;

    fn try_from(args: BuildArgs) -> Result<Self, Self::Error> {
        let cells = match (args.cells, args.boundary) {
            (Some(_), Some(_)) => {
                return Err(CliError::ConflictingArguments {
                    first: ARG_CELLS,
                    second: ARG_BOUNDARY,
                });
            }
            (Some(path), None) => CellSource::List(path),
            (None, Some(path)) => CellSource::Boundary {
                path,
                resolution: args.resolution.unwrap_or(DEFAULT_RESOLUTION),
            },
            (None, None) => {
                return Err(CliError::MissingArgument {
                    field: ARG_CELLS,
                    env: ENV_CELLS,
                });
            }
        };

        let mode = args.mode.map_or_else(TravelMode::default, TravelMode::new);
        Ok(Self {
            cells,
            deny: args.deny,
            mode,
            radius: args.radius.unwrap_or(DEFAULT_RADIUS),
            cache: args.cache.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CACHE)),
            osrm_base_url: args
                .osrm_base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            output: args.output,
        })
    }
}

/// Counters printed once a build completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct BuildOutcome {
    pub(crate) cells: usize,
    pub(crate) denied: usize,
    pub(crate) entries: usize,
    pub(crate) evaluated: u64,
    pub(crate) routed: u64,
    pub(crate) cache_hits: u64,
    pub(crate) unavailable: u64,
    pub(crate) cache_write_failures: usize,
    pub(crate) cache: Utf8PathBuf,
    pub(crate) output: Option<Utf8PathBuf>,
}

/// Builds the duration provider for the current build invocation.
pub(super) trait DurationProviderBuilder {
    fn build(&self, config: &BuildConfig) -> Result<Box<dyn DurationProvider>, CliError>;
}

pub(super) struct OsrmProviderBuilder;

impl DurationProviderBuilder for OsrmProviderBuilder {
    fn build(&self, config: &BuildConfig) -> Result<Box<dyn DurationProvider>, CliError> {
        let provider =
            OsrmDurationProvider::new(config.osrm_base_url.clone(), H3Grid).map_err(|source| {
                CliError::BuildDurationProvider {
                    base_url: config.osrm_base_url.clone(),
                    source,
                }
            })?;
        Ok(Box::new(provider))
    }
}

pub(super) fn run_build(args: BuildArgs) -> Result<(), CliError> {
    let mut stdout = std::io::stdout().lock();
    run_build_with(args, &OsrmProviderBuilder, &mut stdout)
}

pub(super) fn run_build_with(
    args: BuildArgs,
    builder: &dyn DurationProviderBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = resolve_build_config(args)?;
    let outcome = execute_build(&config, builder)?;
    write_outcome(writer, &outcome)
}

fn resolve_build_config(args: BuildArgs) -> Result<BuildConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(super) fn execute_build(
    config: &BuildConfig,
    builder: &dyn DurationProviderBuilder,
) -> Result<BuildOutcome, CliError> {
    let (cells, denied) = resolve_cells(config)?;
    if cells.is_empty() {
        return Err(CliError::EmptyCellSet);
    }

    let store = CsvCacheStore::open(config.cache.clone())?;
    let mut cache = PersistentCache::initialize(store)?;
    let provider = builder.build(config)?;
    info!(
        "routing {} cells within radius {} using {} at {}",
        cells.len(),
        config.radius,
        config.mode,
        config.osrm_base_url
    );

    let MatrixReport { matrix, summary } =
        MatrixBuilder::new(&H3Grid, config.radius, config.mode.clone()).build(
            &cells,
            &*provider,
            &mut cache,
        )?;

    if let Some(output) = &config.output {
        write_matrix_csv(output, &matrix)?;
    }

    Ok(BuildOutcome {
        cells: cells.len(),
        denied,
        entries: matrix.len(),
        evaluated: summary.evaluated,
        routed: summary.routed,
        cache_hits: summary.cache_hits,
        unavailable: summary.unavailable,
        cache_write_failures: cache.stats().persist_failures,
        cache: config.cache.clone(),
        output: config.output.clone(),
    })
}

fn resolve_cells(config: &BuildConfig) -> Result<(CellSet, usize), CliError> {
    let mut cells = match &config.cells {
        CellSource::List(path) => load_cell_list(path)?,
        CellSource::Boundary { path, resolution } => {
            cover_polygon(read_geojson_polygon(path)?, *resolution)?
        }
    };
    let denied = match &config.deny {
        Some(path) => apply_denylist(&mut cells, &load_cell_list(path)?),
        None => 0,
    };
    Ok((cells, denied))
}

fn write_outcome(writer: &mut dyn Write, outcome: &BuildOutcome) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(outcome).map_err(CliError::SerialiseSummary)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteSummary)?;
    writer.write_all(b"\n").map_err(CliError::WriteSummary)?;
    Ok(())
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<BuildConfig, CliError> {
    let merged = BuildArgs::merge_from_layers(layers).map_err(CliError::from)?;
    BuildConfig::try_from(merged)
}
