//! Pairwise duration matrix and the builder that fills it.

mod builder;

use std::collections::BTreeMap;
use std::time::Duration;

use crate::Cell;

pub use builder::{BuildSummary, MatrixBuilder, MatrixError, MatrixReport};

/// Durations between ordered cell pairs.
///
/// The matrix only holds pairs that were visited: a missing entry means "not
/// computed", never zero. [`MatrixBuilder`] inserts every pair through
/// [`DurationMatrix::insert_symmetric`], so `get(a, b) == get(b, a)` holds for
/// the matrices it produces.
///
/// Mirroring a single directional query into both orderings is an
/// approximation: real travel times are not symmetric.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use hexroute_core::{Cell, DurationMatrix};
///
/// let (a, b) = (Cell::from("a"), Cell::from("b"));
/// let mut matrix = DurationMatrix::new();
/// matrix.insert_symmetric(a.clone(), b.clone(), Duration::from_secs(90));
/// assert_eq!(matrix.get(&b, &a), Some(Duration::from_secs(90)));
/// assert_eq!(matrix.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DurationMatrix {
    rows: BTreeMap<Cell, BTreeMap<Cell, Duration>>,
    len: usize,
}

impl DurationMatrix {
    /// Create an empty matrix.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Duration from `source` to `destination`, if computed.
    #[must_use]
    pub fn get(&self, source: &Cell, destination: &Cell) -> Option<Duration> {
        self.rows.get(source)?.get(destination).copied()
    }

    /// Whether either ordering of the pair has an entry.
    #[must_use]
    pub fn contains_pair(&self, lhs: &Cell, rhs: &Cell) -> bool {
        self.get(lhs, rhs).is_some() || self.get(rhs, lhs).is_some()
    }

    /// Store `duration` under both orderings of the pair.
    ///
    /// A self-pair occupies a single entry.
    pub fn insert_symmetric(&mut self, lhs: Cell, rhs: Cell, duration: Duration) {
        if lhs != rhs {
            self.insert(rhs.clone(), lhs.clone(), duration);
        }
        self.insert(lhs, rhs, duration);
    }

    fn insert(&mut self, source: Cell, destination: Cell, duration: Duration) {
        if self
            .rows
            .entry(source)
            .or_default()
            .insert(destination, duration)
            .is_none()
        {
            self.len += 1;
        }
    }

    /// Number of ordered entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether no pair has been recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Iterate `(source, destination, duration)` in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = (&Cell, &Cell, Duration)> + '_ {
        self.rows.iter().flat_map(|(source, row)| {
            row.iter()
                .map(move |(destination, duration)| (source, destination, *duration))
        })
    }
}
