//! Per-mode way filters, direction rules and speed assumptions.
//!
//! The same exclusion lists drive both the Overpass query and the client-side
//! filter applied to every way, so a local export and a live query yield the
//! same network.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::graph::TravelMode;

/// `highway=*` values never routable by car.
const DRIVE_EXCLUDED: &[&str] = &[
    "abandoned",
    "bridleway",
    "bus_guideway",
    "construction",
    "corridor",
    "cycleway",
    "elevator",
    "escalator",
    "footway",
    "no",
    "path",
    "pedestrian",
    "planned",
    "platform",
    "proposed",
    "raceway",
    "razed",
    "service",
    "steps",
    "track",
];

/// `highway=*` values never routable on foot.
const WALK_EXCLUDED: &[&str] = &[
    "abandoned",
    "bus_guideway",
    "construction",
    "cycleway",
    "motorway",
    "motorway_link",
    "no",
    "planned",
    "platform",
    "proposed",
    "raceway",
    "razed",
];

/// `highway=*` values never routable by bicycle.
const BIKE_EXCLUDED: &[&str] = &[
    "abandoned",
    "bus_guideway",
    "construction",
    "corridor",
    "elevator",
    "escalator",
    "footway",
    "motorway",
    "motorway_link",
    "no",
    "planned",
    "platform",
    "proposed",
    "raceway",
    "razed",
    "steps",
];

const WALK_SPEED_KMH: f64 = 5.0;
const BIKE_SPEED_KMH: f64 = 15.0;
const FALLBACK_DRIVE_SPEED_KMH: f64 = 30.0;
const KMH_PER_MPH: f64 = 1.609_344;

/// Typical urban speeds by road class, used when `maxspeed` is absent.
static DRIVE_SPEEDS_KMH: Lazy<HashMap<&'static str, f64>> = Lazy::new(|| {
    HashMap::from([
        ("motorway", 110.0),
        ("motorway_link", 60.0),
        ("trunk", 90.0),
        ("trunk_link", 50.0),
        ("primary", 60.0),
        ("primary_link", 40.0),
        ("secondary", 50.0),
        ("secondary_link", 40.0),
        ("tertiary", 40.0),
        ("tertiary_link", 30.0),
        ("unclassified", 40.0),
        ("road", 40.0),
        ("residential", 30.0),
        ("living_street", 10.0),
    ])
});

/// Direction(s) in which a way may be traversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Both,
    Forward,
    Backward,
}

/// Excluded `highway` classes for `mode`.
pub fn excluded_highways(mode: TravelMode) -> &'static [&'static str] {
    match mode {
        TravelMode::Drive => DRIVE_EXCLUDED,
        TravelMode::Walk => WALK_EXCLUDED,
        TravelMode::Bike => BIKE_EXCLUDED,
    }
}

/// Overpass QL tag filters for `mode`, appended to `way["highway"]`.
pub fn overpass_filter(mode: TravelMode) -> String {
    let mut filter = format!(
        "[\"area\"!~\"yes\"][\"highway\"!~\"^({})$\"][\"access\"!~\"private\"]",
        excluded_highways(mode).join("|")
    );
    match mode {
        TravelMode::Drive => {
            filter.push_str("[\"motor_vehicle\"!~\"no\"][\"motorcar\"!~\"no\"]");
        }
        TravelMode::Walk => filter.push_str("[\"foot\"!~\"no\"]"),
        TravelMode::Bike => filter.push_str("[\"bicycle\"!~\"no\"]"),
    }
    filter
}

/// Whether a way with `tags` belongs to the `mode` network.
pub fn way_allowed(mode: TravelMode, tags: &HashMap<String, String>) -> bool {
    let Some(highway) = tags.get("highway") else {
        return false;
    };
    if excluded_highways(mode).contains(&highway.as_str()) {
        return false;
    }
    if tag_is(tags, "area", "yes") || tag_is(tags, "access", "private") {
        return false;
    }
    match mode {
        TravelMode::Drive => !tag_is(tags, "motor_vehicle", "no") && !tag_is(tags, "motorcar", "no"),
        TravelMode::Walk => !tag_is(tags, "foot", "no"),
        TravelMode::Bike => !tag_is(tags, "bicycle", "no"),
    }
}

/// Traversal direction of a way for `mode`.
pub fn direction(mode: TravelMode, tags: &HashMap<String, String>) -> Direction {
    if mode.ignores_oneway() {
        return Direction::Both;
    }
    if mode == TravelMode::Bike && tag_is(tags, "oneway:bicycle", "no") {
        return Direction::Both;
    }

    match tags.get("oneway").map(|value| value.trim().to_ascii_lowercase()) {
        Some(value) if matches!(value.as_str(), "yes" | "true" | "1") => Direction::Forward,
        Some(value) if matches!(value.as_str(), "-1" | "reverse") => Direction::Backward,
        Some(_) => Direction::Both,
        None if tag_is(tags, "junction", "roundabout") => Direction::Forward,
        None => Direction::Both,
    }
}

/// Assumed travel speed in km/h on a way with `tags`.
pub fn speed_kmh(mode: TravelMode, tags: &HashMap<String, String>) -> f64 {
    match mode {
        TravelMode::Walk => WALK_SPEED_KMH,
        TravelMode::Bike => BIKE_SPEED_KMH,
        TravelMode::Drive => tags
            .get("maxspeed")
            .and_then(|raw| parse_maxspeed(raw))
            .or_else(|| {
                tags.get("highway")
                    .and_then(|highway| DRIVE_SPEEDS_KMH.get(highway.as_str()).copied())
            })
            .unwrap_or(FALLBACK_DRIVE_SPEED_KMH),
    }
}

/// Parse an OSM `maxspeed` value into km/h. Multiple values separated by `;`
/// or `|` are averaged; symbolic values (`none`, `signals`, `RU:urban`) yield
/// `None`.
pub fn parse_maxspeed(raw: &str) -> Option<f64> {
    let speeds: Vec<f64> = raw
        .split([';', '|'])
        .filter_map(parse_single_speed)
        .collect();
    if speeds.is_empty() {
        return None;
    }
    Some(speeds.iter().sum::<f64>() / speeds.len() as f64)
}

fn parse_single_speed(value: &str) -> Option<f64> {
    let value = value.trim().to_ascii_lowercase();
    let (number, factor) = match value.strip_suffix("mph") {
        Some(number) => (number.trim(), KMH_PER_MPH),
        None => (value.trim_end_matches("km/h").trim(), 1.0),
    };
    number
        .parse::<f64>()
        .ok()
        .filter(|speed| speed.is_finite() && *speed > 0.0)
        .map(|speed| speed * factor)
}

fn tag_is(tags: &HashMap<String, String>, key: &str, expected: &str) -> bool {
    tags.get(key)
        .map(|value| value.trim().eq_ignore_ascii_case(expected))
        .unwrap_or(false)
}
