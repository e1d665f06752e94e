//! In-memory doubles for grids, providers and cache stores, used by unit and
//! behaviour tests.

use std::cell::Cell as CallCounter;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use geo::Coord;

use crate::{
    CacheRecord, CacheStore, CacheStoreError, Cell, CellGrid, DurationError, DurationProvider,
    GridError, RouteDuration, StoredRow, TravelMode,
};

/// `CacheStore` that keeps rows in a vector.
#[derive(Debug, Default, Clone)]
pub struct MemoryCacheStore {
    rows: Vec<StoredRow>,
    fail_appends: bool,
}

impl MemoryCacheStore {
    /// Create a store pre-populated with raw rows.
    #[must_use]
    pub const fn with_rows(rows: Vec<StoredRow>) -> Self {
        Self {
            rows,
            fail_appends: false,
        }
    }

    /// Create an empty store whose appends always fail.
    #[must_use]
    pub const fn failing_appends() -> Self {
        Self {
            rows: Vec::new(),
            fail_appends: true,
        }
    }

    /// Rows held by the store, in append order.
    #[must_use]
    pub fn rows(&self) -> &[StoredRow] {
        &self.rows
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&mut self) -> Result<Vec<StoredRow>, CacheStoreError> {
        Ok(self.rows.clone())
    }

    fn append(&mut self, record: &CacheRecord) -> Result<(), CacheStoreError> {
        if self.fail_appends {
            return Err(CacheStoreError::Append {
                location: self.location(),
                message: "store is read-only".to_owned(),
            });
        }
        self.rows
            .push(vec![record.key.to_string(), record.value.to_string()]);
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_owned()
    }
}

/// `CellGrid` over an explicit adjacency list.
///
/// Distances are hop counts. Every cell shares the origin as its centroid.
#[derive(Debug, Default, Clone)]
pub struct GraphGrid {
    adjacency: BTreeMap<Cell, BTreeSet<Cell>>,
    strict: bool,
}

impl GraphGrid {
    /// Build a grid from undirected edges. Unknown cells are isolated.
    #[must_use]
    pub fn from_edges(edges: &[(&str, &str)]) -> Self {
        let mut grid = Self::default();
        for (lhs, rhs) in edges {
            grid.connect(Cell::from(*lhs), Cell::from(*rhs));
        }
        grid
    }

    /// Like [`GraphGrid::from_edges`], but unknown cells are errors.
    #[must_use]
    pub fn strict(edges: &[(&str, &str)]) -> Self {
        Self {
            strict: true,
            ..Self::from_edges(edges)
        }
    }

    fn connect(&mut self, lhs: Cell, rhs: Cell) {
        self.adjacency
            .entry(lhs.clone())
            .or_default()
            .insert(rhs.clone());
        self.adjacency.entry(rhs).or_default().insert(lhs);
    }

    fn check(&self, cell: &Cell) -> Result<(), GridError> {
        if self.strict && !self.adjacency.contains_key(cell) {
            return Err(GridError::InvalidCell {
                cell: cell.to_string(),
                message: "not part of the test grid".to_owned(),
            });
        }
        Ok(())
    }
}

impl CellGrid for GraphGrid {
    fn centroid(&self, cell: &Cell) -> Result<Coord, GridError> {
        self.check(cell)?;
        Ok(Coord { x: 0.0, y: 0.0 })
    }

    fn disk(&self, cell: &Cell, radius: u32) -> Result<Vec<Cell>, GridError> {
        self.check(cell)?;
        let mut seen = BTreeSet::from([cell.clone()]);
        let mut frontier = vec![cell.clone()];
        for _ in 0..radius {
            let mut next = Vec::new();
            for current in &frontier {
                for neighbour in self.adjacency.get(current).into_iter().flatten() {
                    if seen.insert(neighbour.clone()) {
                        next.push(neighbour.clone());
                    }
                }
            }
            frontier = next;
        }
        Ok(seen.into_iter().collect())
    }
}

#[derive(Debug, Clone)]
enum Outcome {
    Seconds(f64),
    Unavailable,
    Failure,
}

/// `DurationProvider` returning scripted durations and counting queries.
///
/// Scripted pairs match in either direction. Self-pairs return zero and are
/// not counted.
#[derive(Debug)]
pub struct CountingDurationProvider {
    default: f64,
    scripted: HashMap<(Cell, Cell), Outcome>,
    calls: CallCounter<usize>,
}

impl CountingDurationProvider {
    /// Every distinct pair is `seconds` apart.
    #[must_use]
    pub fn uniform(seconds: f64) -> Self {
        Self {
            default: seconds,
            scripted: HashMap::new(),
            calls: CallCounter::new(0),
        }
    }

    /// Override the duration for one pair.
    #[must_use]
    pub fn with_duration(self, lhs: &Cell, rhs: &Cell, seconds: f64) -> Self {
        self.script(lhs, rhs, Outcome::Seconds(seconds))
    }

    /// Report no route for one pair.
    #[must_use]
    pub fn with_unavailable(self, lhs: &Cell, rhs: &Cell) -> Self {
        self.script(lhs, rhs, Outcome::Unavailable)
    }

    /// Fail with a network error for one pair.
    #[must_use]
    pub fn with_failure(self, lhs: &Cell, rhs: &Cell) -> Self {
        self.script(lhs, rhs, Outcome::Failure)
    }

    /// Number of queries for distinct cells answered so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.get()
    }

    fn script(mut self, lhs: &Cell, rhs: &Cell, outcome: Outcome) -> Self {
        self.scripted.insert(ordered(lhs, rhs), outcome);
        self
    }
}

fn ordered(lhs: &Cell, rhs: &Cell) -> (Cell, Cell) {
    if lhs <= rhs {
        (lhs.clone(), rhs.clone())
    } else {
        (rhs.clone(), lhs.clone())
    }
}

impl DurationProvider for CountingDurationProvider {
    fn duration(
        &self,
        source: &Cell,
        destination: &Cell,
        mode: &TravelMode,
    ) -> Result<RouteDuration, DurationError> {
        if source == destination {
            return Ok(RouteDuration::ZERO);
        }
        self.calls.set(self.calls.get() + 1);
        match self.scripted.get(&ordered(source, destination)) {
            None => Ok(RouteDuration::Seconds(self.default)),
            Some(Outcome::Seconds(seconds)) => Ok(RouteDuration::Seconds(*seconds)),
            Some(Outcome::Unavailable) => Ok(RouteDuration::Unavailable {
                code: "NoRoute".to_owned(),
                message: format!("no {mode} route between {source} and {destination}"),
            }),
            Some(Outcome::Failure) => Err(DurationError::Network {
                url: format!("test://{mode}/{source}/{destination}"),
                message: "connection refused".to_owned(),
            }),
        }
    }
}
