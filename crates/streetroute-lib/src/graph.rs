use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::coord::Coordinate;
use crate::error::{Error, Result};

/// OpenStreetMap node identifier.
pub type NodeId = i64;

/// Travel mode used to filter the street network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    Walk,
    #[default]
    Drive,
    Bike,
}

impl TravelMode {
    /// Whether every street is traversable in both directions.
    pub fn ignores_oneway(self) -> bool {
        matches!(self, TravelMode::Walk)
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            TravelMode::Walk => "walk",
            TravelMode::Drive => "drive",
            TravelMode::Bike => "bike",
        };
        f.write_str(value)
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "walk" => Ok(TravelMode::Walk),
            "drive" => Ok(TravelMode::Drive),
            "bike" => Ok(TravelMode::Bike),
            _ => Err(Error::UnknownTravelMode {
                value: value.to_string(),
            }),
        }
    }
}

/// Edge attribute minimised by the shortest-path search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WeightKind {
    /// Physical length in metres.
    #[default]
    Length,
    /// Estimated traversal time in seconds.
    Time,
}

impl fmt::Display for WeightKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = match self {
            WeightKind::Length => "length",
            WeightKind::Time => "time",
        };
        f.write_str(value)
    }
}

impl FromStr for WeightKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "length" | "distance" => Ok(WeightKind::Length),
            "time" | "travel_time" => Ok(WeightKind::Time),
            _ => Err(Error::UnknownWeightKind {
                value: value.to_string(),
            }),
        }
    }
}

/// Directed street segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub target: NodeId,
    /// OSM way the segment belongs to.
    pub way: i64,
    /// `highway=*` class of the way.
    pub highway: String,
    pub length_m: f64,
    pub travel_time_s: f64,
}

impl Edge {
    /// Cost of traversing this edge under `weight`.
    pub fn cost(&self, weight: WeightKind) -> f64 {
        match weight {
            WeightKind::Length => self.length_m,
            WeightKind::Time => self.travel_time_s,
        }
    }
}

/// Read-only view of a street network used by the router.
pub trait StreetGraph {
    /// Number of nodes in the graph.
    fn node_count(&self) -> usize;

    /// All nodes with their positions, in ascending id order.
    fn nodes(&self) -> Box<dyn Iterator<Item = (NodeId, Coordinate)> + '_>;

    /// Position of a node, if present.
    fn position(&self, node: NodeId) -> Option<Coordinate>;

    /// Outgoing edges of a node. Parallel edges to the same target are allowed.
    fn out_edges(&self, node: NodeId) -> &[Edge];
}

/// Directed street multigraph for one region and travel mode.
#[derive(Debug, Clone, Default)]
pub struct StreetNetwork {
    mode: TravelMode,
    positions: BTreeMap<NodeId, Coordinate>,
    adjacency: BTreeMap<NodeId, Vec<Edge>>,
    edge_count: usize,
}

impl StreetNetwork {
    /// Create an empty network for `mode`.
    pub fn new(mode: TravelMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> TravelMode {
        self.mode
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Insert or move a node.
    pub fn add_node(&mut self, id: NodeId, position: Coordinate) {
        self.positions.insert(id, position);
        self.adjacency.entry(id).or_default();
    }

    /// Add a directed edge. Both endpoints must already be present.
    pub fn add_edge(&mut self, source: NodeId, edge: Edge) -> bool {
        if !self.positions.contains_key(&source) || !self.positions.contains_key(&edge.target) {
            return false;
        }
        self.adjacency.entry(source).or_default().push(edge);
        self.edge_count += 1;
        true
    }

    /// Drop nodes that no edge touches.
    pub fn prune_isolated(&mut self) {
        let mut touched: BTreeSet<NodeId> = BTreeSet::new();
        for (source, edges) in &self.adjacency {
            if !edges.is_empty() {
                touched.insert(*source);
            }
            touched.extend(edges.iter().map(|edge| edge.target));
        }
        self.positions.retain(|id, _| touched.contains(id));
        self.adjacency.retain(|id, _| touched.contains(id));
    }
}

impl StreetGraph for StreetNetwork {
    fn node_count(&self) -> usize {
        self.positions.len()
    }

    fn nodes(&self) -> Box<dyn Iterator<Item = (NodeId, Coordinate)> + '_> {
        Box::new(self.positions.iter().map(|(id, position)| (*id, *position)))
    }

    fn position(&self, node: NodeId) -> Option<Coordinate> {
        self.positions.get(&node).copied()
    }

    fn out_edges(&self, node: NodeId) -> &[Edge] {
        self.adjacency
            .get(&node)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(target: NodeId, length_m: f64) -> Edge {
        Edge {
            target,
            way: 1,
            highway: "residential".to_string(),
            length_m,
            travel_time_s: length_m,
        }
    }

    #[test]
    fn parses_travel_modes_case_insensitively() {
        assert_eq!("Walk".parse::<TravelMode>().unwrap(), TravelMode::Walk);
        assert_eq!(" DRIVE ".parse::<TravelMode>().unwrap(), TravelMode::Drive);
        assert!("boat".parse::<TravelMode>().is_err());
    }

    #[test]
    fn edge_cost_follows_weight_kind() {
        let mut segment = edge(2, 120.0);
        segment.travel_time_s = 9.5;
        assert_eq!(segment.cost(WeightKind::Length), 120.0);
        assert_eq!(segment.cost(WeightKind::Time), 9.5);
        assert_eq!("Time".parse::<WeightKind>().unwrap(), WeightKind::Time);
        assert!("speed".parse::<WeightKind>().is_err());
    }

    #[test]
    fn edges_require_known_endpoints() {
        let mut network = StreetNetwork::new(TravelMode::Drive);
        network.add_node(1, Coordinate::new(0.0, 0.0).unwrap());
        assert!(!network.add_edge(1, edge(2, 10.0)));
        network.add_node(2, Coordinate::new(0.0, 0.001).unwrap());
        assert!(network.add_edge(1, edge(2, 10.0)));
        assert!(network.add_edge(1, edge(2, 12.0)), "parallel edge allowed");
        assert_eq!(network.out_edges(1).len(), 2);
        assert_eq!(network.edge_count(), 2);
        assert!(network.out_edges(2).is_empty());
    }

    #[test]
    fn prune_drops_isolated_nodes() {
        let mut network = StreetNetwork::new(TravelMode::Walk);
        network.add_node(1, Coordinate::new(0.0, 0.0).unwrap());
        network.add_node(2, Coordinate::new(0.0, 0.001).unwrap());
        network.add_node(3, Coordinate::new(0.0, 0.002).unwrap());
        network.add_edge(1, edge(2, 10.0));
        network.prune_isolated();

        let ids: Vec<_> = network.nodes().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![1, 2]);
    }
}
