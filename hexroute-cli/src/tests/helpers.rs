//! Test helpers for seeding cell lists and sharing a scripted provider.

use std::rc::Rc;

use camino::{Utf8Path, Utf8PathBuf};
use h3o::{LatLng, Resolution};
use hexroute_core::test_support::CountingDurationProvider;
use hexroute_core::{
    Cell, CellGrid, DurationError, DurationProvider, RouteDuration, TravelMode,
};
use hexroute_data::H3Grid;
use tempfile::TempDir;

use super::*;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write test file");
}

pub(super) fn temp_root() -> (TempDir, Utf8PathBuf) {
    let tmp = TempDir::new().expect("tempdir");
    let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 workspace");
    (tmp, root)
}

/// A resolution 7 cell in central Adelaide, away from any pentagon.
pub(super) fn adelaide() -> Cell {
    let index = LatLng::new(-34.93, 138.60)
        .expect("valid coordinate")
        .to_cell(Resolution::Seven);
    Cell::new(index.to_string())
}

/// The centre cell and its six neighbours.
pub(super) fn adelaide_ring() -> Vec<Cell> {
    H3Grid.disk(&adelaide(), 1).expect("disk around Adelaide")
}

pub(super) fn write_cell_list(path: &Utf8Path, cells: &[Cell]) {
    let mut contents = String::from("h3_index\n");
    for cell in cells {
        contents.push_str(cell.as_str());
        contents.push('\n');
    }
    write_utf8(path, contents.as_bytes());
}

/// Delegates to a shared [`CountingDurationProvider`] so tests can read the
/// call count after the CLI has consumed the boxed provider.
pub(super) struct SharedProvider(pub(super) Rc<CountingDurationProvider>);

impl DurationProvider for SharedProvider {
    fn duration(
        &self,
        source: &Cell,
        destination: &Cell,
        mode: &TravelMode,
    ) -> Result<RouteDuration, DurationError> {
        self.0.duration(source, destination, mode)
    }
}

pub(super) struct StubProviderBuilder {
    pub(super) provider: Rc<CountingDurationProvider>,
}

impl StubProviderBuilder {
    pub(super) fn uniform(seconds: f64) -> Self {
        Self {
            provider: Rc::new(CountingDurationProvider::uniform(seconds)),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.provider.calls()
    }
}

impl DurationProviderBuilder for StubProviderBuilder {
    fn build(&self, _config: &BuildConfig) -> Result<Box<dyn DurationProvider>, CliError> {
        Ok(Box::new(SharedProvider(Rc::clone(&self.provider))))
    }
}
