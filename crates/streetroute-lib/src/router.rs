//! Shortest routes between arbitrary coordinates on a street network.
//!
//! [`Router`] pairs a network with its [`NodeLocator`] so that several
//! queries (different weight kinds, different endpoints) share one KD-tree.
//! [`shortest_path`] is the one-shot form.

use serde::Serialize;
use tracing::info;

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::graph::{NodeId, StreetGraph, WeightKind};
use crate::path::{cheapest_edge, find_route_dijkstra};
use crate::spatial::{NearestNode, NodeLocator};

/// A computed route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    /// Node ids from the node nearest the origin to the node nearest the
    /// destination.
    pub nodes: Vec<NodeId>,
    pub weight: WeightKind,
    pub total_length_m: f64,
    pub total_time_s: f64,
    /// Distance from the origin coordinate to the first node.
    pub origin_snap_m: f64,
    /// Distance from the destination coordinate to the last node.
    pub destination_snap_m: f64,
}

impl Route {
    /// Number of street segments traversed.
    pub fn segment_count(&self) -> usize {
        self.nodes.len().saturating_sub(1)
    }

    pub fn origin_node(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination_node(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// Positions of the route nodes, in order. Nodes missing from `graph` are
    /// skipped.
    pub fn coordinates<G: StreetGraph + ?Sized>(&self, graph: &G) -> Vec<Coordinate> {
        self.nodes
            .iter()
            .filter_map(|node| graph.position(*node))
            .collect()
    }
}

/// Routes over one network.
pub struct Router<'a, G: StreetGraph + ?Sized> {
    graph: &'a G,
    locator: NodeLocator,
}

impl<'a, G: StreetGraph + ?Sized> Router<'a, G> {
    /// Index `graph` for nearest-node queries.
    pub fn new(graph: &'a G) -> Self {
        Self {
            graph,
            locator: NodeLocator::build(graph),
        }
    }

    /// Node nearest to `coordinate`.
    pub fn nearest(&self, coordinate: &Coordinate) -> Result<NearestNode> {
        self.locator.nearest(coordinate)
    }

    /// Shortest route from `origin` to `destination` minimising `weight`.
    pub fn route(
        &self,
        origin: &Coordinate,
        destination: &Coordinate,
        weight: WeightKind,
    ) -> Result<Route> {
        let start = self.locator.nearest(origin)?;
        let goal = self.locator.nearest(destination)?;

        let nodes = find_route_dijkstra(self.graph, start.id, goal.id, weight).ok_or(
            Error::NoPath {
                origin: start.id,
                destination: goal.id,
            },
        )?;

        let (total_length_m, total_time_s) = self.totals(&nodes, weight)?;
        info!(
            origin = start.id,
            destination = goal.id,
            %weight,
            segments = nodes.len().saturating_sub(1),
            length_m = total_length_m,
            "computed route"
        );

        Ok(Route {
            nodes,
            weight,
            total_length_m,
            total_time_s,
            origin_snap_m: start.distance_m,
            destination_snap_m: goal.distance_m,
        })
    }

    /// Sum length and time over the edges the search used: the cheapest under
    /// `weight` between each consecutive pair.
    fn totals(&self, nodes: &[NodeId], weight: WeightKind) -> Result<(f64, f64)> {
        if nodes.is_empty() {
            return Err(Error::EmptyRoute);
        }
        let mut length = 0.0;
        let mut time = 0.0;
        for pair in nodes.windows(2) {
            let edge = cheapest_edge(self.graph, pair[0], pair[1], weight).ok_or(
                Error::NoPath {
                    origin: pair[0],
                    destination: pair[1],
                },
            )?;
            length += edge.length_m;
            time += edge.travel_time_s;
        }
        Ok((length, time))
    }
}

/// Shortest route between two coordinates on `graph`.
///
/// Builds a fresh [`NodeLocator`]; use [`Router`] to run several queries on
/// the same network.
pub fn shortest_path<G: StreetGraph + ?Sized>(
    graph: &G,
    origin: &Coordinate,
    destination: &Coordinate,
    weight: WeightKind,
) -> Result<Route> {
    Router::new(graph).route(origin, destination, weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, StreetNetwork, TravelMode};

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn link(network: &mut StreetNetwork, from: NodeId, to: NodeId, length_m: f64, time_s: f64) {
        let edge = Edge {
            target: to,
            way: from * 100 + to,
            highway: "residential".to_string(),
            length_m,
            travel_time_s: time_s,
        };
        assert!(network.add_edge(from, edge));
    }

    #[test]
    fn single_edge_route() {
        let mut network = StreetNetwork::new(TravelMode::Drive);
        network.add_node(1, coord(0.0, 0.0));
        network.add_node(2, coord(0.0, 0.01));
        link(&mut network, 1, 2, 1112.0, 80.0);

        let route =
            shortest_path(&network, &coord(0.0, 0.0), &coord(0.0, 0.01), WeightKind::Length)
                .unwrap();
        assert_eq!(route.nodes, vec![1, 2]);
        assert_eq!(route.total_length_m, 1112.0);
        assert_eq!(route.total_time_s, 80.0);
        assert_eq!(route.segment_count(), 1);
        assert!(route.origin_snap_m < 1e-6);
    }

    #[test]
    fn unreachable_destination_is_no_path() {
        let mut network = StreetNetwork::new(TravelMode::Drive);
        network.add_node(1, coord(0.0, 0.0));
        network.add_node(2, coord(0.0, 0.01));
        network.add_node(3, coord(1.0, 1.0));
        network.add_node(4, coord(1.0, 1.01));
        link(&mut network, 1, 2, 10.0, 1.0);
        link(&mut network, 3, 4, 10.0, 1.0);

        let err = shortest_path(&network, &coord(0.0, 0.0), &coord(1.0, 1.01), WeightKind::Length)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::NoPath {
                origin: 1,
                destination: 4
            }
        ));
    }

    #[test]
    fn coincident_endpoints_yield_single_node_route() {
        let mut network = StreetNetwork::new(TravelMode::Walk);
        network.add_node(1, coord(0.0, 0.0));
        network.add_node(2, coord(0.0, 0.01));
        link(&mut network, 1, 2, 10.0, 1.0);

        let route = shortest_path(
            &network,
            &coord(0.0, 0.0001),
            &coord(0.0, -0.0001),
            WeightKind::Time,
        )
        .unwrap();
        assert_eq!(route.nodes, vec![1]);
        assert_eq!(route.total_length_m, 0.0);
        assert_eq!(route.segment_count(), 0);
    }

    #[test]
    fn weight_kind_changes_the_route() {
        // 1 -> 2 -> 4 is short but slow; 1 -> 3 -> 4 is long but fast.
        let mut network = StreetNetwork::new(TravelMode::Drive);
        network.add_node(1, coord(0.0, 0.0));
        network.add_node(2, coord(0.001, 0.005));
        network.add_node(3, coord(-0.003, 0.005));
        network.add_node(4, coord(0.0, 0.01));
        link(&mut network, 1, 2, 560.0, 67.0);
        link(&mut network, 2, 4, 560.0, 67.0);
        link(&mut network, 1, 3, 640.0, 32.0);
        link(&mut network, 3, 4, 640.0, 32.0);

        let router = Router::new(&network);
        let (origin, destination) = (coord(0.0, 0.0), coord(0.0, 0.01));
        let by_length = router
            .route(&origin, &destination, WeightKind::Length)
            .unwrap();
        let by_time = router.route(&origin, &destination, WeightKind::Time).unwrap();

        assert_eq!(by_length.nodes, vec![1, 2, 4]);
        assert_eq!(by_time.nodes, vec![1, 3, 4]);
        assert!(by_length.total_length_m < by_time.total_length_m);
        assert!(by_time.total_time_s < by_length.total_time_s);
    }

    #[test]
    fn totals_use_cheapest_parallel_edge() {
        let mut network = StreetNetwork::new(TravelMode::Drive);
        network.add_node(1, coord(0.0, 0.0));
        network.add_node(2, coord(0.0, 0.01));
        link(&mut network, 1, 2, 1500.0, 60.0);
        link(&mut network, 1, 2, 1200.0, 90.0);

        let (origin, destination) = (coord(0.0, 0.0), coord(0.0, 0.01));
        let by_length = shortest_path(&network, &origin, &destination, WeightKind::Length).unwrap();
        assert_eq!(by_length.total_length_m, 1200.0);
        assert_eq!(by_length.total_time_s, 90.0);

        let by_time = shortest_path(&network, &origin, &destination, WeightKind::Time).unwrap();
        assert_eq!(by_time.total_length_m, 1500.0);
        assert_eq!(by_time.total_time_s, 60.0);
    }

    #[test]
    fn route_coordinates_follow_nodes() {
        let mut network = StreetNetwork::new(TravelMode::Walk);
        network.add_node(1, coord(0.0, 0.0));
        network.add_node(2, coord(0.0, 0.01));
        link(&mut network, 1, 2, 10.0, 1.0);
        let route = shortest_path(&network, &coord(0.0, 0.0), &coord(0.0, 0.01), WeightKind::Length)
            .unwrap();
        assert_eq!(
            route.coordinates(&network),
            vec![coord(0.0, 0.0), coord(0.0, 0.01)]
        );
    }
}
