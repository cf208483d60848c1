//! Address resolution.
//!
//! [`Geocoder`] maps free-text addresses to coordinates. Two backends are
//! provided: [`NominatimGeocoder`], which queries a Nominatim search endpoint
//! once per call, and [`Gazetteer`], an offline lookup table loaded from a
//! JSON file. Neither retries, rate-limits or caches.

use std::collections::BTreeMap;
use std::env;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use tracing::{debug, info};

use crate::coord::{BoundingBox, Coordinate};
use crate::error::{Error, Result};

/// Public Nominatim endpoint.
pub const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org";
/// Environment variable overriding the Nominatim base URL.
pub const GEOCODER_URL_ENV: &str = "STREETROUTE_GEOCODER_URL";
/// Environment variable pointing at an offline gazetteer file.
pub const GAZETTEER_ENV: &str = "STREETROUTE_GAZETTEER";
/// Address used when none is supplied.
pub const DEFAULT_ADDRESS: &str = "Grand Place";

/// Minimum Jaro-Winkler similarity for a gazetteer name to be suggested.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// A resolved address.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Place {
    /// The address as supplied by the caller.
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub coordinate: Coordinate,
    /// Extent of the matched feature, when the backend reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<BoundingBox>,
}

/// Resolves free-text addresses.
pub trait Geocoder {
    /// Look up `address`. Fails with [`Error::Resolution`] when nothing
    /// matches.
    fn lookup(&self, address: &str) -> Result<Place>;

    /// Coordinate of `address`.
    fn resolve(&self, address: &str) -> Result<Coordinate> {
        Ok(self.lookup(address)?.coordinate)
    }
}

impl<G: Geocoder + ?Sized> Geocoder for Box<G> {
    fn lookup(&self, address: &str) -> Result<Place> {
        (**self).lookup(address)
    }
}

/// Resolve the geocoder configured through the environment: a gazetteer when
/// `STREETROUTE_GAZETTEER` is set, otherwise Nominatim at
/// `STREETROUTE_GEOCODER_URL` (or the public endpoint).
pub fn geocoder_from_env() -> Result<Box<dyn Geocoder>> {
    if let Some(path) = env::var_os(GAZETTEER_ENV) {
        return Ok(Box::new(Gazetteer::from_path(Path::new(&path))?));
    }

    let base_url = env::var(GEOCODER_URL_ENV)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GEOCODER_URL.to_string());
    Ok(Box::new(NominatimGeocoder::new(base_url)?))
}

/// Geocoder backed by a Nominatim search endpoint.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    client: Client,
    base_url: String,
}

impl NominatimGeocoder {
    /// Create a geocoder for the Nominatim instance at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(crate::user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

impl Geocoder for NominatimGeocoder {
    fn lookup(&self, address: &str) -> Result<Place> {
        let url = format!("{}/search", self.base_url);
        debug!(%url, address, "geocoding address");

        let results: Vec<NominatimResult> = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .query(&[("q", address), ("format", "jsonv2"), ("limit", "1")])
            .send()?
            .error_for_status()?
            .json()?;

        let place = place_from_results(address, results)?;
        info!(address, coordinate = %place.coordinate, "resolved address");
        Ok(place)
    }
}

/// One Nominatim search hit. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
pub struct NominatimResult {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
    /// `[south, north, west, east]`.
    #[serde(default)]
    pub boundingbox: Option<Vec<String>>,
}

/// Convert a Nominatim result list into a [`Place`] for `address`.
pub fn place_from_results(address: &str, results: Vec<NominatimResult>) -> Result<Place> {
    let Some(hit) = results.into_iter().next() else {
        return Err(Error::Resolution {
            address: address.to_string(),
        });
    };

    let lat = parse_degrees(&hit.lat)?;
    let lon = parse_degrees(&hit.lon)?;
    let coordinate = Coordinate::new(lat, lon)?;
    let bounds = match hit.boundingbox.as_deref() {
        Some([south, north, west, east]) => Some(BoundingBox::new(
            parse_degrees(north)?,
            parse_degrees(south)?,
            parse_degrees(east)?,
            parse_degrees(west)?,
        )?),
        _ => None,
    };

    Ok(Place {
        query: address.to_string(),
        display_name: hit.display_name,
        coordinate,
        bounds,
    })
}

fn parse_degrees(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|err| Error::MalformedResponse {
            source_name: "nominatim",
            message: format!("invalid coordinate '{raw}': {err}"),
        })
}

/// Gazetteer entry as stored on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerEntry {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bounds: Option<BoundingBox>,
}

/// Offline geocoder: a JSON object mapping names to entries, e.g.
///
/// ```json
/// { "Grand Place": { "lat": 50.8467, "lon": 4.3525 } }
/// ```
///
/// Names match case-insensitively with surrounding and repeated whitespace
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct Gazetteer {
    /// Normalised name -> (name as written, entry).
    entries: BTreeMap<String, (String, GazetteerEntry)>,
}

impl Gazetteer {
    /// Load a gazetteer from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SourceNotFound {
                path: path.to_path_buf(),
            });
        }
        let reader = BufReader::new(File::open(path)?);
        let raw: BTreeMap<String, GazetteerEntry> = serde_json::from_reader(reader)?;
        let gazetteer = Self::from_entries(raw);
        info!(path = %path.display(), entries = gazetteer.len(), "loaded gazetteer");
        Ok(gazetteer)
    }

    /// Build a gazetteer from in-memory entries.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, GazetteerEntry)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(name, entry)| (normalize_name(&name), (name, entry)))
                .collect(),
        }
    }

    /// Add or replace one entry.
    pub fn insert(&mut self, name: &str, lat: f64, lon: f64) {
        self.entries.insert(
            normalize_name(name),
            (
                name.to_string(),
                GazetteerEntry {
                    lat,
                    lon,
                    display_name: None,
                    bounds: None,
                },
            ),
        );
    }

    /// Up to `limit` known names resembling `address`, best match first.
    pub fn suggestions(&self, address: &str, limit: usize) -> Vec<String> {
        let query = normalize_name(address);
        let mut scored: Vec<(f64, &str)> = self
            .entries
            .iter()
            .map(|(key, (name, _))| (jaro_winkler(&query, key), name.as_str()))
            .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, name)| name.to_string())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Geocoder for Gazetteer {
    fn lookup(&self, address: &str) -> Result<Place> {
        let (_, entry) = self
            .entries
            .get(&normalize_name(address))
            .ok_or_else(|| Error::Resolution {
                address: address.to_string(),
            })?;

        Ok(Place {
            query: address.to_string(),
            display_name: entry.display_name.clone(),
            coordinate: Coordinate::new(entry.lat, entry.lon)?,
            bounds: entry.bounds.map(BoundingBox::validated).transpose()?,
        })
    }
}

fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nominatim_results_parse_string_coordinates() {
        let json = r#"[{
            "lat": "50.8467",
            "lon": "4.3525",
            "display_name": "Grand-Place, Brussels",
            "boundingbox": ["50.8462", "50.8471", "4.3517", "4.3533"]
        }]"#;
        let results: Vec<NominatimResult> = serde_json::from_str(json).unwrap();
        let place = place_from_results("Grand Place", results).unwrap();

        assert_eq!(place.coordinate.lat(), 50.8467);
        assert_eq!(place.coordinate.lon(), 4.3525);
        assert_eq!(place.display_name.as_deref(), Some("Grand-Place, Brussels"));
        let bounds = place.bounds.unwrap();
        assert_eq!(bounds.south, 50.8462);
        assert_eq!(bounds.north, 50.8471);
        assert_eq!(bounds.west, 4.3517);
        assert_eq!(bounds.east, 4.3533);
    }

    #[test]
    fn inverted_nominatim_bounds_are_rejected() {
        let results = vec![NominatimResult {
            lat: "50.85".to_string(),
            lon: "4.35".to_string(),
            display_name: None,
            boundingbox: Some(
                ["50.87", "50.84", "4.33", "4.37"]
                    .iter()
                    .map(|v| v.to_string())
                    .collect(),
            ),
        }];
        let err = place_from_results("Brussels", results).unwrap_err();
        assert!(matches!(err, Error::InvalidBoundingBox { .. }));
    }

    #[test]
    fn empty_nominatim_result_is_resolution_error() {
        let err = place_from_results("Atlantis", Vec::new()).unwrap_err();
        assert!(matches!(err, Error::Resolution { address } if address == "Atlantis"));
    }

    #[test]
    fn garbage_nominatim_coordinates_are_malformed() {
        let results = vec![NominatimResult {
            lat: "north-ish".to_string(),
            lon: "4.35".to_string(),
            display_name: None,
            boundingbox: None,
        }];
        let err = place_from_results("x", results).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn gazetteer_lookup_ignores_case_and_spacing() {
        let mut gazetteer = Gazetteer::default();
        gazetteer.insert("Grand Place, Brussels", 50.8467, 4.3525);

        let first = gazetteer.resolve("  grand   place, BRUSSELS ").unwrap();
        let second = gazetteer.resolve("Grand Place, Brussels").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.lat(), 50.8467);
    }

    #[test]
    fn gazetteer_suggests_close_names() {
        let mut gazetteer = Gazetteer::default();
        gazetteer.insert("Grand Place", 50.8467, 4.3525);
        gazetteer.insert("Place Rogier", 50.855, 4.3617);
        gazetteer.insert("Atomium", 50.8949, 4.3415);

        let suggestions = gazetteer.suggestions("grand plce", 3);
        assert_eq!(suggestions.first().map(String::as_str), Some("Grand Place"));
        assert!(gazetteer.suggestions("zzzz", 3).is_empty());
    }

    #[test]
    fn gazetteer_miss_is_resolution_error() {
        let gazetteer = Gazetteer::default();
        assert!(matches!(
            gazetteer.resolve("Nowhere"),
            Err(Error::Resolution { .. })
        ));
    }

    #[test]
    fn gazetteer_rejects_inverted_bounds() {
        let gazetteer = Gazetteer::from_entries([(
            "City".to_string(),
            GazetteerEntry {
                lat: 50.85,
                lon: 4.35,
                display_name: None,
                bounds: Some(BoundingBox {
                    north: 50.84,
                    south: 50.87,
                    east: 4.33,
                    west: 4.37,
                }),
            },
        )]);
        assert!(matches!(
            gazetteer.lookup("City"),
            Err(Error::InvalidBoundingBox { .. })
        ));
    }

    #[test]
    fn gazetteer_file_with_inverted_bounds_fails_to_parse() {
        let json = r#"{"City": {"lat": 50.85, "lon": 4.35,
            "bounds": {"north": 50.84, "south": 50.87, "east": 4.33, "west": 4.37}}}"#;
        assert!(serde_json::from_str::<BTreeMap<String, GazetteerEntry>>(json).is_err());
    }

    #[test]
    fn gazetteer_rejects_invalid_entries_at_lookup() {
        let mut gazetteer = Gazetteer::default();
        gazetteer.insert("Broken", 123.0, 0.0);
        assert!(matches!(
            gazetteer.resolve("Broken"),
            Err(Error::InvalidCoordinate { .. })
        ));
    }
}
