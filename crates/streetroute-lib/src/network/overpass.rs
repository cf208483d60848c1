//! Overpass API client and response types.
//!
//! See: <https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL>

use std::collections::HashMap;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use tracing::{debug, info};

use crate::coord::BoundingBox;
use crate::error::{Error, Result};
use crate::graph::{StreetNetwork, TravelMode};

use super::filter::overpass_filter;
use super::{build_network, NetworkProvider};

/// Public Overpass interpreter endpoint.
pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";

/// Server-side query timeout in seconds, also used for the HTTP client.
const QUERY_TIMEOUT_SECS: u64 = 180;

/// Overpass JSON response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<Element>,
    /// Set by the server when a query failed at runtime (e.g. timeout).
    #[serde(default)]
    pub remark: Option<String>,
}

/// A single OSM element. Relations and other element kinds are ignored.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    #[serde(other)]
    Other,
}

/// Build the Overpass QL query for all `mode` streets inside `bbox`.
pub fn build_query(bbox: &BoundingBox, mode: TravelMode) -> String {
    format!(
        "[out:json][timeout:{timeout}];(way[\"highway\"]{filter}{bbox};>;);out body qt;",
        timeout = QUERY_TIMEOUT_SECS,
        filter = overpass_filter(mode),
        bbox = bbox.to_overpass(),
    )
}

/// Street-network provider backed by an Overpass API endpoint.
#[derive(Debug, Clone)]
pub struct OverpassProvider {
    client: Client,
    endpoint: String,
}

impl OverpassProvider {
    /// Create a provider for `endpoint` (an `/api/interpreter` URL).
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(QUERY_TIMEOUT_SECS + 10))
            .user_agent(crate::user_agent())
            .build()
            .map_err(Error::Http)?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    fn query(&self, query: &str) -> Result<OverpassResponse> {
        debug!(endpoint = %self.endpoint, query, "querying overpass");
        let response = self
            .client
            .post(&self.endpoint)
            .header(ACCEPT, "application/json")
            .form(&[("data", query)])
            .send()?
            .error_for_status()?;

        let body = response.text()?;
        serde_json::from_str(&body).map_err(|err| Error::NetworkFetch {
            reason: format!("malformed overpass response: {err}"),
        })
    }
}

impl NetworkProvider for OverpassProvider {
    fn fetch(&self, bbox: &BoundingBox, mode: TravelMode) -> Result<StreetNetwork> {
        let response = self.query(&build_query(bbox, mode))?;
        info!(
            elements = response.elements.len(),
            %bbox,
            %mode,
            "received overpass response"
        );
        build_network(response, bbox, mode)
    }
}
