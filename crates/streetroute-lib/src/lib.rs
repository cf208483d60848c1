//! Streetroute library entry points.
//!
//! This crate resolves addresses to coordinates, fetches the street network
//! around them from OpenStreetMap, and computes shortest routes over it.
//! Higher-level consumers (the CLI) should only depend on the functions
//! exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod coord;
pub mod error;
pub mod form;
pub mod geocode;
pub mod graph;
pub mod network;
pub mod output;
pub mod path;
pub mod pipeline;
pub mod region;
pub mod router;
pub mod spatial;

pub use coord::{BoundingBox, Coordinate};
pub use error::{Error, Result};
pub use form::RouteForm;
pub use geocode::{
    geocoder_from_env, Gazetteer, Geocoder, NominatimGeocoder, Place, DEFAULT_ADDRESS,
};
pub use graph::{Edge, NodeId, StreetGraph, StreetNetwork, TravelMode, WeightKind};
pub use network::{
    build_network, network_provider_from_env, FileNetworkProvider, NetworkProvider,
    OverpassProvider,
};
pub use output::{RouteRenderMode, RouteSummary};
pub use path::find_route_dijkstra;
pub use pipeline::{plan_route, RoutePlan, RouteRequest};
pub use region::{build_region, RegionStrategy, DEFAULT_AROUND_DISTANCE_M, DEFAULT_MARGIN};
pub use router::{shortest_path, Route, Router};
pub use spatial::{NearestNode, NodeLocator};

/// User-agent sent with every HTTP request. Nominatim's usage policy requires
/// an identifying agent.
pub(crate) fn user_agent() -> String {
    format!(
        "streetroute-lib/{version} ({repo})",
        version = env!("CARGO_PKG_VERSION"),
        repo = "https://github.com/streetroute/streetroute"
    )
}
