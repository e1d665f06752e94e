//! Drives a grid and a memoized provider over a cell set.

use std::collections::HashSet;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::{
    CacheStore, Cell, CellGrid, CellSet, DurationError, DurationProvider, GridError,
    PersistentCache, RouteDuration, TravelMode, cached_duration, estimated_evaluations,
};

use super::DurationMatrix;

const PROGRESS_INTERVAL: u64 = 250;

/// Errors that abort a matrix build.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatrixError {
    /// A k-disk could not be enumerated.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// A duration query failed fatally.
    #[error(transparent)]
    Duration(#[from] DurationError),
}

/// Counters for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Undecided pairs that were evaluated, self-pairs excluded.
    pub evaluated: u64,
    /// Pairs resolved by querying the provider.
    pub routed: u64,
    /// Pairs served from the cache.
    pub cache_hits: u64,
    /// Pairs left out of the matrix because no route was available.
    pub unavailable: u64,
}

/// The finished matrix with its build counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatrixReport {
    /// Durations for every visited pair.
    pub matrix: DurationMatrix,
    /// Counters describing the build.
    pub summary: BuildSummary,
}

/// Builds a symmetric [`DurationMatrix`] over the k-disks of a cell set.
///
/// For each source the builder enumerates the k-disk, skips destinations
/// outside the set or whose unordered pair is already decided, resolves the
/// rest through [`cached_duration`], and stores each result under both
/// orderings. `(a, a)` is zero for every cell and never queried.
///
/// A pair whose route is unavailable is logged and left out of the matrix.
/// The cache remembers the outcome, so neither this build nor a later one
/// asks the provider again.
///
/// # Examples
///
/// ```
/// use hexroute_core::test_support::{CountingDurationProvider, GraphGrid, MemoryCacheStore};
/// use hexroute_core::{CellSet, MatrixBuilder, PersistentCache, TravelMode};
///
/// let grid = GraphGrid::from_edges(&[("x", "y"), ("y", "z")]);
/// let cells: CellSet = ["x", "y", "z"].into_iter().map(Into::into).collect();
/// let provider = CountingDurationProvider::uniform(60.0);
/// let mut cache = PersistentCache::initialize(MemoryCacheStore::default())?;
///
/// let report = MatrixBuilder::new(&grid, 2, TravelMode::driving())
///     .build(&cells, &provider, &mut cache)?;
/// assert_eq!(report.matrix.len(), 9);
/// assert_eq!(provider.calls(), 3);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct MatrixBuilder<'g, G: ?Sized> {
    grid: &'g G,
    radius: u32,
    mode: TravelMode,
}

impl<'g, G: CellGrid + ?Sized> MatrixBuilder<'g, G> {
    /// Create a builder over `grid` with k-disk radius `radius`.
    pub const fn new(grid: &'g G, radius: u32, mode: TravelMode) -> Self {
        Self { grid, radius, mode }
    }

    /// Build the matrix for `cells`.
    ///
    /// # Errors
    ///
    /// Returns [`MatrixError`] when a disk cannot be enumerated or a duration
    /// query fails fatally. Durations recorded before the failure stay in the
    /// cache.
    pub fn build<P, S>(
        &self,
        cells: &CellSet,
        provider: &P,
        cache: &mut PersistentCache<S>,
    ) -> Result<MatrixReport, MatrixError>
    where
        P: DurationProvider + ?Sized,
        S: CacheStore,
    {
        let estimate = estimated_evaluations(self.radius, cells.len());
        info!(
            "estimated {estimate} evaluations for {} cells at radius {} ({})",
            cells.len(),
            self.radius,
            self.mode
        );

        let mut matrix = DurationMatrix::new();
        let mut unresolved: HashSet<(Cell, Cell)> = HashSet::new();
        let mut summary = BuildSummary::default();

        for source in cells {
            matrix.insert_symmetric(source.clone(), source.clone(), Duration::ZERO);
            for destination in self.grid.disk(source, self.radius)? {
                if !cells.contains(&destination) || matrix.contains_pair(source, &destination) {
                    continue;
                }
                let pair = unordered(source, &destination);
                if unresolved.contains(&pair) {
                    continue;
                }

                let resolved =
                    cached_duration(cache, provider, source, &destination, &self.mode)?;
                summary.evaluated += 1;
                if resolved.from_cache {
                    summary.cache_hits += 1;
                } else {
                    summary.routed += 1;
                }

                match resolved.duration.as_duration() {
                    Some(duration) => matrix.insert_symmetric(source.clone(), destination, duration),
                    None => {
                        report_unavailable(source, &destination, &resolved.duration);
                        summary.unavailable += 1;
                        unresolved.insert(pair);
                    }
                }

                if summary.evaluated.is_multiple_of(PROGRESS_INTERVAL) {
                    info!("evaluated {} of ~{estimate} pairs", summary.evaluated);
                }
            }
        }

        info!(
            "matrix complete: {} entries, {} routed, {} cached, {} unavailable",
            matrix.len(),
            summary.routed,
            summary.cache_hits,
            summary.unavailable
        );
        Ok(MatrixReport { matrix, summary })
    }
}

fn unordered(lhs: &Cell, rhs: &Cell) -> (Cell, Cell) {
    if lhs <= rhs {
        (lhs.clone(), rhs.clone())
    } else {
        (rhs.clone(), lhs.clone())
    }
}

fn report_unavailable(source: &Cell, destination: &Cell, duration: &RouteDuration) {
    match duration {
        RouteDuration::Unavailable { code, message } => {
            warn!("no route from {source} to {destination}: {code} {message}");
        }
        RouteDuration::Seconds(seconds) => {
            warn!("discarding invalid duration {seconds} from {source} to {destination}");
        }
    }
    debug!("pair {source}/{destination} left out of the matrix");
}
