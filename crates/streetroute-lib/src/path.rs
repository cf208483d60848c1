use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::graph::{Edge, NodeId, StreetGraph, WeightKind};

/// Run Dijkstra's algorithm from `start` to `goal`, minimising `weight`.
///
/// Frontier ties pop the lower node id first and a node's parent only changes
/// on a strictly cheaper cost, so the result is deterministic for a fixed
/// graph. Edges with a negative or non-finite cost are ignored.
pub fn find_route_dijkstra<G: StreetGraph + ?Sized>(
    graph: &G,
    start: NodeId,
    goal: NodeId,
    weight: WeightKind,
) -> Option<Vec<NodeId>> {
    if graph.position(start).is_none() || graph.position(goal).is_none() {
        return None;
    }
    if start == goal {
        return Some(vec![start]);
    }

    let mut distances: HashMap<NodeId, f64> = HashMap::new();
    let mut parents: HashMap<NodeId, Option<NodeId>> = HashMap::new();
    let mut queue = BinaryHeap::new();

    distances.insert(start, 0.0);
    parents.insert(start, None);
    queue.push(QueueEntry::new(start, 0.0));

    while let Some(entry) = queue.pop() {
        let current_distance = match distances.get(&entry.node) {
            Some(distance) if *distance < entry.cost.0 => continue,
            Some(distance) => *distance,
            None => continue,
        };

        if entry.node == goal {
            return Some(reconstruct_path(&parents, start, goal));
        }

        for edge in graph.out_edges(entry.node) {
            let Some(cost) = usable_cost(edge, weight) else {
                continue;
            };

            let next = edge.target;
            let next_cost = current_distance + cost;
            if next_cost < *distances.get(&next).unwrap_or(&f64::INFINITY) {
                distances.insert(next, next_cost);
                parents.insert(next, Some(entry.node));
                queue.push(QueueEntry::new(next, next_cost));
            }
        }
    }

    None
}

/// Cheapest edge from `source` to `target` under `weight`, if any.
pub fn cheapest_edge<'a, G: StreetGraph + ?Sized>(
    graph: &'a G,
    source: NodeId,
    target: NodeId,
    weight: WeightKind,
) -> Option<&'a Edge> {
    graph
        .out_edges(source)
        .iter()
        .filter(|edge| edge.target == target && usable_cost(edge, weight).is_some())
        .min_by(|a, b| a.cost(weight).total_cmp(&b.cost(weight)))
}

fn usable_cost(edge: &Edge, weight: WeightKind) -> Option<f64> {
    let cost = edge.cost(weight);
    (cost.is_finite() && cost >= 0.0).then_some(cost)
}

fn reconstruct_path(
    parents: &HashMap<NodeId, Option<NodeId>>,
    start: NodeId,
    goal: NodeId,
) -> Vec<NodeId> {
    let mut path = Vec::new();
    let mut current = Some(goal);
    while let Some(node) = current {
        path.push(node);
        if node == start {
            break;
        }
        current = parents.get(&node).copied().flatten();
    }
    path.reverse();
    path
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: NodeId,
    cost: FloatOrd,
}

impl QueueEntry {
    fn new(node: NodeId, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
