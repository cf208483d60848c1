use std::fmt::Write;

use serde::Serialize;
use serde_json::{json, Value};

use crate::coord::{BoundingBox, Coordinate};
use crate::error::{Error, Result};
use crate::geocode::Place;
use crate::graph::{NodeId, StreetGraph, TravelMode, WeightKind};
use crate::pipeline::RoutePlan;

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    /// Markdown, for pasting into notes or issues.
    RichText,
}

/// Endpoint within a planned route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteEndpoint {
    /// Address as typed by the user.
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Geocoded position of the address.
    pub coordinate: Coordinate,
    /// Street node the address snapped to.
    pub node: NodeId,
    pub snap_distance_m: f64,
}

impl RouteEndpoint {
    fn from_place(place: &Place, node: NodeId, snap_distance_m: f64) -> Self {
        Self {
            address: place.query.clone(),
            display_name: place.display_name.clone(),
            coordinate: place.coordinate,
            node,
            snap_distance_m,
        }
    }

    fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.address)
    }
}

/// Node visited along a route.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteStep {
    pub index: usize,
    pub node: NodeId,
    pub coordinate: Coordinate,
}

/// Structured representation of a planned route that higher-level consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub mode: TravelMode,
    pub weight: WeightKind,
    pub segments: usize,
    pub total_length_m: f64,
    pub total_time_s: f64,
    pub bbox: BoundingBox,
    pub origin: RouteEndpoint,
    pub destination: RouteEndpoint,
    pub steps: Vec<RouteStep>,
}

impl RouteSummary {
    /// Convert a [`RoutePlan`] into a summary with node positions resolved.
    pub fn from_plan(plan: &RoutePlan) -> Result<Self> {
        let route = &plan.route;
        let (Some(first), Some(last)) = (route.origin_node(), route.destination_node()) else {
            return Err(Error::EmptyRoute);
        };

        let steps = route
            .nodes
            .iter()
            .enumerate()
            .filter_map(|(index, node)| {
                plan.network.position(*node).map(|coordinate| RouteStep {
                    index,
                    node: *node,
                    coordinate,
                })
            })
            .collect::<Vec<_>>();

        Ok(Self {
            mode: plan.mode,
            weight: route.weight,
            segments: route.segment_count(),
            total_length_m: route.total_length_m,
            total_time_s: route.total_time_s,
            bbox: plan.bbox,
            origin: RouteEndpoint::from_place(&plan.origin, first, route.origin_snap_m),
            destination: RouteEndpoint::from_place(
                &plan.destination,
                last,
                route.destination_snap_m,
            ),
            steps,
        })
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({}, shortest by {})",
            self.origin.label(),
            self.destination.label(),
            self.mode,
            self.weight
        );
        let _ = writeln!(
            buffer,
            "{} segments, {}, {}",
            self.segments,
            format_distance(self.total_length_m),
            format_duration(self.total_time_s)
        );
        for step in &self.steps {
            let _ = writeln!(
                buffer,
                "{:>3}: node {} ({})",
                step.index, step.node, step.coordinate
            );
        }
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        let _ = writeln!(
            buffer,
            "**Route** _{} to {}_ ({}, `{}`)",
            self.origin.label(),
            self.destination.label(),
            self.mode,
            self.weight
        );
        let _ = writeln!(
            buffer,
            "* distance: **{}**",
            format_distance(self.total_length_m)
        );
        let _ = writeln!(buffer, "* time: **{}**", format_duration(self.total_time_s));
        let _ = writeln!(buffer, "* segments: {}", self.segments);
        buffer
    }

    /// GeoJSON `FeatureCollection` with the route as a `LineString` and the
    /// two geocoded endpoints as `Point`s. Positions are `[lon, lat]`.
    pub fn to_geojson(&self) -> Value {
        let line: Vec<[f64; 2]> = self
            .steps
            .iter()
            .map(|step| position(&step.coordinate))
            .collect();

        json!({
            "type": "FeatureCollection",
            "bbox": [self.bbox.west, self.bbox.south, self.bbox.east, self.bbox.north],
            "features": [
                {
                    "type": "Feature",
                    "geometry": { "type": "LineString", "coordinates": line },
                    "properties": {
                        "role": "route",
                        "mode": self.mode,
                        "weight": self.weight,
                        "segments": self.segments,
                        "length_m": self.total_length_m,
                        "travel_time_s": self.total_time_s,
                        "nodes": self.steps.iter().map(|step| step.node).collect::<Vec<_>>(),
                    }
                },
                endpoint_feature("origin", &self.origin),
                endpoint_feature("destination", &self.destination),
            ]
        })
    }
}

fn endpoint_feature(role: &str, endpoint: &RouteEndpoint) -> Value {
    json!({
        "type": "Feature",
        "geometry": { "type": "Point", "coordinates": position(&endpoint.coordinate) },
        "properties": {
            "role": role,
            "address": endpoint.address,
            "display_name": endpoint.display_name,
            "node": endpoint.node,
            "snap_distance_m": endpoint.snap_distance_m,
        }
    })
}

fn position(coordinate: &Coordinate) -> [f64; 2] {
    [coordinate.lon(), coordinate.lat()]
}

/// `850 m` below a kilometre, `1.25 km` above.
pub fn format_distance(metres: f64) -> String {
    if metres < 1000.0 {
        format!("{metres:.0} m")
    } else {
        format!("{:.2} km", metres / 1000.0)
    }
}

/// `45 s`, `3 min 20 s` or `1 h 05 min`.
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.0).round() as u64;
    match total {
        0..=59 => format!("{total} s"),
        60..=3599 => format!("{} min {:02} s", total / 60, total % 60),
        _ => format!("{} h {:02} min", total / 3600, (total % 3600) / 60),
    }
}
