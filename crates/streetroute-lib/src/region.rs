//! Region selection: which bounding box to fetch a street network for.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::coord::{BoundingBox, Coordinate};
use crate::error::{Error, Result};
use crate::geocode::Geocoder;
use crate::graph::{StreetNetwork, TravelMode};
use crate::network::NetworkProvider;

/// Padding, in degrees, added around the origin/destination envelope.
pub const DEFAULT_MARGIN: f64 = 0.1;

/// Distance, in metres, covered around the origin by
/// [`RegionStrategy::AroundOrigin`] when no distance is given.
pub const DEFAULT_AROUND_DISTANCE_M: f64 = 1000.0;

/// How the routing region is derived from a request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum RegionStrategy {
    /// Both endpoints, padded by `margin` degrees.
    Envelope { margin: f64 },
    /// A square of `distance_m` metres in every direction around the origin.
    AroundOrigin { distance_m: f64 },
    /// The extent the geocoder reports for a named place (e.g. a city).
    Place { name: String },
}

impl Default for RegionStrategy {
    fn default() -> Self {
        RegionStrategy::Envelope {
            margin: DEFAULT_MARGIN,
        }
    }
}

impl fmt::Display for RegionStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegionStrategy::Envelope { margin } => write!(f, "envelope +{margin} deg"),
            RegionStrategy::AroundOrigin { distance_m } => write!(f, "{distance_m} m around origin"),
            RegionStrategy::Place { name } => write!(f, "place '{name}'"),
        }
    }
}

impl RegionStrategy {
    /// Compute the bounding box for a request. Only [`RegionStrategy::Place`]
    /// consults the geocoder.
    pub fn bounding_box<G: Geocoder + ?Sized>(
        &self,
        origin: Coordinate,
        destination: Coordinate,
        geocoder: &G,
    ) -> Result<BoundingBox> {
        match self {
            RegionStrategy::Envelope { margin } => {
                BoundingBox::enclosing(origin, destination, *margin)
            }
            RegionStrategy::AroundOrigin { distance_m } => BoundingBox::around(origin, *distance_m),
            RegionStrategy::Place { name } => geocoder
                .lookup(name)?
                .bounds
                .ok_or_else(|| Error::Resolution {
                    address: name.clone(),
                })?
                .validated(),
        }
    }
}

/// Pad the two coordinates by `margin` degrees and fetch the `mode` network
/// inside the resulting box.
pub fn build_region<P: NetworkProvider + ?Sized>(
    origin: Coordinate,
    destination: Coordinate,
    margin: f64,
    mode: TravelMode,
    provider: &P,
) -> Result<(BoundingBox, StreetNetwork)> {
    let bbox = BoundingBox::enclosing(origin, destination, margin)?;
    let network = fetch_region(&bbox, mode, provider)?;
    Ok((bbox, network))
}

/// Fetch the `mode` network inside `bbox`, rejecting empty results.
pub fn fetch_region<P: NetworkProvider + ?Sized>(
    bbox: &BoundingBox,
    mode: TravelMode,
    provider: &P,
) -> Result<StreetNetwork> {
    info!(%bbox, %mode, "fetching street network");
    let network = provider.fetch(bbox, mode)?;
    if network.is_empty() || network.edge_count() == 0 {
        return Err(Error::NetworkFetch {
            reason: format!("no {mode} streets inside {bbox}"),
        });
    }
    Ok(network)
}
