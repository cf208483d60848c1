//! Common test utilities and fixture helpers.
//!
//! The fixtures under `docs/fixtures/` describe a handful of streets between
//! the Grand Place and Place Rogier in Brussels, plus a gazetteer naming the
//! endpoints.

use std::cell::Cell;
use std::path::PathBuf;

use streetroute_lib::{
    BoundingBox, FileNetworkProvider, Gazetteer, NetworkProvider, Result, StreetNetwork,
    TravelMode,
};

/// Path to fixtures directory used by tests.
#[allow(dead_code)]
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

#[allow(dead_code)]
pub fn network_fixture() -> PathBuf {
    fixtures_dir().join("brussels_center.osm.json")
}

#[allow(dead_code)]
pub fn gazetteer() -> Gazetteer {
    Gazetteer::from_path(&fixtures_dir().join("brussels_gazetteer.json"))
        .expect("fixture gazetteer loads")
}

#[allow(dead_code)]
pub fn provider() -> FileNetworkProvider {
    FileNetworkProvider::new(network_fixture())
}

/// Wraps a provider and counts how often it is asked for a network.
#[allow(dead_code)]
pub struct CountingProvider<P> {
    pub inner: P,
    pub calls: Cell<usize>,
}

#[allow(dead_code)]
impl<P> CountingProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: Cell::new(0),
        }
    }
}

impl<P: NetworkProvider> NetworkProvider for CountingProvider<P> {
    fn fetch(&self, bbox: &BoundingBox, mode: TravelMode) -> Result<StreetNetwork> {
        self.calls.set(self.calls.get() + 1);
        self.inner.fetch(bbox, mode)
    }
}
