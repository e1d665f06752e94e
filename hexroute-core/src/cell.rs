//! Grid cell identifiers, the cell set of a run, and travel modes.

use std::collections::BTreeSet;
use std::fmt;

/// Opaque identifier for one hexagonal grid unit.
///
/// The core never inspects the identifier; grids resolve it to coordinates
/// and neighbours. Equality is exact string equality.
///
/// # Examples
///
/// ```
/// use hexroute_core::Cell;
///
/// let cell = Cell::new("87b91694effffff");
/// assert_eq!(cell.as_str(), "87b91694effffff");
/// assert_eq!(cell, Cell::from("87b91694effffff"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell(String);

impl Cell {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The fixed collection of cells of interest for one run.
///
/// Duplicates collapse on insertion and iteration follows identifier order,
/// so repeated runs visit pairs in the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellSet {
    cells: BTreeSet<Cell>,
}

impl CellSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cell, returning `false` when it was already present.
    pub fn insert(&mut self, cell: Cell) -> bool {
        self.cells.insert(cell)
    }

    /// Exact membership test.
    #[must_use]
    pub fn contains(&self, cell: &Cell) -> bool {
        self.cells.contains(cell)
    }

    /// Remove every cell that appears in `denied`.
    pub fn remove_all<'a, I>(&mut self, denied: I) -> usize
    where
        I: IntoIterator<Item = &'a Cell>,
    {
        denied
            .into_iter()
            .filter(|cell| self.cells.remove(*cell))
            .count()
    }

    /// Number of distinct cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the set holds no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate cells in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell> + '_ {
        self.cells.iter()
    }
}

impl FromIterator<Cell> for CellSet {
    fn from_iter<T: IntoIterator<Item = Cell>>(iter: T) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CellSet {
    type Item = &'a Cell;
    type IntoIter = std::collections::btree_set::Iter<'a, Cell>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}

/// Routing profile token passed to the routing service, e.g. `driving`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TravelMode(String);

impl TravelMode {
    /// Wrap an arbitrary profile token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The `driving` profile.
    #[must_use]
    pub fn driving() -> Self {
        Self::new("driving")
    }

    /// The `walking` profile.
    #[must_use]
    pub fn walking() -> Self {
        Self::new("walking")
    }

    /// The `cycling` profile.
    #[must_use]
    pub fn cycling() -> Self {
        Self::new("cycling")
    }

    /// Borrow the profile token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for TravelMode {
    fn default() -> Self {
        Self::driving()
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
