//! Street-network acquisition.
//!
//! This module provides:
//! - [`NetworkProvider`] - source of a street network for a region and mode
//! - [`OverpassProvider`] - live Overpass API queries
//! - [`FileNetworkProvider`] - a local Overpass JSON export
//! - [`build_network`] - turns raw OSM elements into a [`StreetNetwork`]
//!
//! Both providers share one builder, so mode filtering, oneway handling,
//! bounding-box truncation and edge weights behave the same whichever source
//! is used.

pub mod filter;
pub mod overpass;

pub use overpass::{OverpassProvider, OverpassResponse, DEFAULT_OVERPASS_URL};

use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::coord::{BoundingBox, Coordinate};
use crate::error::{Error, Result};
use crate::graph::{Edge, NodeId, StreetGraph, StreetNetwork, TravelMode};

use filter::{direction, speed_kmh, way_allowed, Direction};
use overpass::Element;

/// Environment variable overriding the Overpass endpoint.
pub const OVERPASS_URL_ENV: &str = "STREETROUTE_OVERPASS_URL";
/// Environment variable pointing at a local Overpass JSON export.
pub const NETWORK_SOURCE_ENV: &str = "STREETROUTE_NETWORK_SOURCE";

/// Supplies the street network inside a bounding box for one travel mode.
pub trait NetworkProvider {
    /// Fetch the network. Fails with [`Error::NetworkFetch`] when the region
    /// has no usable streets for `mode`.
    fn fetch(&self, bbox: &BoundingBox, mode: TravelMode) -> Result<StreetNetwork>;
}

impl<P: NetworkProvider + ?Sized> NetworkProvider for Box<P> {
    fn fetch(&self, bbox: &BoundingBox, mode: TravelMode) -> Result<StreetNetwork> {
        (**self).fetch(bbox, mode)
    }
}

/// Street-network provider reading an Overpass JSON export from disk.
#[derive(Debug, Clone)]
pub struct FileNetworkProvider {
    path: PathBuf,
}

impl FileNetworkProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl NetworkProvider for FileNetworkProvider {
    fn fetch(&self, bbox: &BoundingBox, mode: TravelMode) -> Result<StreetNetwork> {
        if !self.path.exists() {
            return Err(Error::SourceNotFound {
                path: self.path.clone(),
            });
        }
        info!(path = %self.path.display(), "using local street network export");
        let reader = BufReader::new(File::open(&self.path)?);
        let response: OverpassResponse =
            serde_json::from_reader(reader).map_err(|err| Error::NetworkFetch {
                reason: format!(
                    "malformed network export {}: {err}",
                    self.path.display()
                ),
            })?;
        build_network(response, bbox, mode)
    }
}

/// Resolve the provider configured through the environment: a local export
/// when `STREETROUTE_NETWORK_SOURCE` is set, otherwise Overpass at
/// `STREETROUTE_OVERPASS_URL` (or the public endpoint).
pub fn network_provider_from_env() -> Result<Box<dyn NetworkProvider>> {
    if let Some(source) = env::var_os(NETWORK_SOURCE_ENV) {
        return Ok(Box::new(FileNetworkProvider::new(source)));
    }

    let endpoint = env::var(OVERPASS_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_OVERPASS_URL.to_string());
    Ok(Box::new(OverpassProvider::new(endpoint)?))
}

/// Build a [`StreetNetwork`] from raw Overpass elements.
///
/// Ways are filtered by `mode`, nodes outside `bbox` are dropped together with
/// every segment touching them, and each consecutive node pair becomes one
/// edge per permitted direction.
pub fn build_network(
    response: OverpassResponse,
    bbox: &BoundingBox,
    mode: TravelMode,
) -> Result<StreetNetwork> {
    let mut positions: HashMap<NodeId, Coordinate> = HashMap::new();
    let mut ways = Vec::new();
    let mut skipped_nodes = 0usize;

    for element in response.elements {
        match element {
            Element::Node { id, lat, lon } => {
                if !bbox.contains_point(lat, lon) {
                    continue;
                }
                match Coordinate::new(lat, lon) {
                    Ok(position) => {
                        positions.insert(id, position);
                    }
                    Err(_) => skipped_nodes += 1,
                }
            }
            Element::Way { id, nodes, tags } => {
                if way_allowed(mode, &tags) {
                    ways.push((id, nodes, tags));
                }
            }
            Element::Other => {}
        }
    }

    if skipped_nodes > 0 {
        warn!(skipped_nodes, "skipped nodes with invalid coordinates");
    }

    let mut network = StreetNetwork::new(mode);
    for (id, position) in &positions {
        network.add_node(*id, *position);
    }

    for (way_id, nodes, tags) in &ways {
        let highway = tags.get("highway").cloned().unwrap_or_default();
        let speed_ms = speed_kmh(mode, tags) / 3.6;
        let direction = direction(mode, tags);

        for pair in nodes.windows(2) {
            let (from, to) = (pair[0], pair[1]);
            if from == to {
                continue;
            }
            let (Some(a), Some(b)) = (positions.get(&from), positions.get(&to)) else {
                continue;
            };

            let length_m = a.distance_to(b);
            let segment = |target: NodeId| Edge {
                target,
                way: *way_id,
                highway: highway.clone(),
                length_m,
                travel_time_s: length_m / speed_ms,
            };

            if matches!(direction, Direction::Both | Direction::Forward) {
                network.add_edge(from, segment(to));
            }
            if matches!(direction, Direction::Both | Direction::Backward) {
                network.add_edge(to, segment(from));
            }
        }
    }

    network.prune_isolated();

    if network.edge_count() == 0 {
        let reason = match response.remark {
            Some(remark) => format!("no {mode} streets inside {bbox} ({remark})"),
            None => format!("no {mode} streets inside {bbox}"),
        };
        return Err(Error::NetworkFetch { reason });
    }

    info!(
        nodes = network.node_count(),
        ways = ways.len(),
        edges = network.edge_count(),
        %mode,
        "built street network"
    );

    Ok(network)
}
