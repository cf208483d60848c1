// Test utilities used across `streetroute-cli` tests.
// Kept under `#[cfg(test)]` so it is not part of the public crate API.
use streetroute_lib::output::{RouteEndpoint, RouteStep};
use streetroute_lib::{BoundingBox, Coordinate, NodeId, RouteSummary, TravelMode, WeightKind};

/// Builder for tests that constructs a `RouteSummary` with sensible defaults.
/// Nodes are laid out eastwards along the equator, 0.001 degrees apart.
pub struct RouteSummaryBuilder {
    nodes: Vec<NodeId>,
    destination_snap_m: f64,
}

impl RouteSummaryBuilder {
    pub fn new() -> Self {
        Self {
            nodes: vec![1, 2],
            destination_snap_m: 5.0,
        }
    }

    pub fn nodes(mut self, nodes: &[NodeId]) -> Self {
        self.nodes = nodes.to_vec();
        self
    }

    pub fn destination_snap(mut self, metres: f64) -> Self {
        self.destination_snap_m = metres;
        self
    }

    pub fn build(self) -> RouteSummary {
        let position =
            |index: usize| Coordinate::new(0.0, index as f64 * 0.001).expect("valid coordinate");
        let steps: Vec<RouteStep> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(index, node)| RouteStep {
                index,
                node: *node,
                coordinate: position(index),
            })
            .collect();
        let last = steps.len().saturating_sub(1);

        RouteSummary {
            mode: TravelMode::Drive,
            weight: WeightKind::Length,
            segments: last,
            total_length_m: last as f64 * 111.0,
            total_time_s: last as f64 * 13.0,
            bbox: BoundingBox::enclosing(position(0), position(last), 0.1)
                .expect("valid bounding box"),
            origin: RouteEndpoint {
                address: "Start".to_string(),
                display_name: None,
                coordinate: position(0),
                node: self.nodes.first().copied().unwrap_or_default(),
                snap_distance_m: 2.0,
            },
            destination: RouteEndpoint {
                address: "End".to_string(),
                display_name: None,
                coordinate: position(last),
                node: self.nodes.last().copied().unwrap_or_default(),
                snap_distance_m: self.destination_snap_m,
            },
            steps,
        }
    }
}

impl Default for RouteSummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
