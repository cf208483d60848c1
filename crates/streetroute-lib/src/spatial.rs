//! KD-tree index over street-network nodes for nearest-node lookups.
//!
//! Node positions are projected onto the unit sphere so that squared
//! Euclidean distance in the tree orders candidates the same way as
//! great-circle distance on the ground. The reported snap distance is the
//! haversine distance in metres.
//!
//! Ties (two nodes equally close to the query) resolve to the lower node id.
//! Nodes sharing an exact position are indexed once, under the lowest id.

use std::collections::BTreeMap;

use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;
use tracing::debug;

use crate::coord::Coordinate;
use crate::error::{Error, Result};
use crate::graph::{NodeId, StreetGraph};

/// KD-tree bucket size (kiddo default).
const BUCKET_SIZE: usize = 32;

/// Candidates fetched per query before applying the id tie-break.
const NEAREST_CANDIDATES: usize = 8;

/// A node matched to a query coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestNode {
    pub id: NodeId,
    pub position: Coordinate,
    /// Great-circle distance from the query coordinate in metres.
    pub distance_m: f64,
}

/// Nearest-node index built once per network.
pub struct NodeLocator {
    tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32>,
    nodes: Vec<(NodeId, Coordinate)>,
}

impl NodeLocator {
    /// Index every node of `graph`.
    pub fn build<G: StreetGraph + ?Sized>(graph: &G) -> Self {
        // Keyed by exact position bits so duplicates collapse onto the lowest id.
        let mut unique: BTreeMap<(u64, u64), (NodeId, Coordinate)> = BTreeMap::new();
        for (id, position) in graph.nodes() {
            let key = (position.lat().to_bits(), position.lon().to_bits());
            unique
                .entry(key)
                .and_modify(|existing| {
                    if id < existing.0 {
                        *existing = (id, position);
                    }
                })
                .or_insert((id, position));
        }

        let mut nodes: Vec<(NodeId, Coordinate)> = unique.into_values().collect();
        nodes.sort_by_key(|(id, _)| *id);

        let mut tree: KdTree<f64, usize, 3, BUCKET_SIZE, u32> = KdTree::new();
        for (index, (_, position)) in nodes.iter().enumerate() {
            tree.add(&position.to_unit_vector(), index);
        }

        debug!(node_count = nodes.len(), "built node locator");

        Self { tree, nodes }
    }

    /// Number of indexed positions.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Find the node nearest to `query`.
    pub fn nearest(&self, query: &Coordinate) -> Result<NearestNode> {
        if self.nodes.is_empty() {
            return Err(Error::NetworkFetch {
                reason: "street network has no nodes".to_string(),
            });
        }

        let candidates = self
            .tree
            .nearest_n::<SquaredEuclidean>(&query.to_unit_vector(), NEAREST_CANDIDATES);

        let best = candidates
            .iter()
            .filter_map(|neighbour| {
                self.nodes
                    .get(neighbour.item)
                    .map(|(id, position)| (neighbour.distance, *id, *position))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0).then_with(|| a.1.cmp(&b.1)))
            .ok_or_else(|| Error::NetworkFetch {
                reason: "street network has no nodes".to_string(),
            })?;

        let (_, id, position) = best;
        Ok(NearestNode {
            id,
            position,
            distance_m: query.distance_to(&position),
        })
    }
}
