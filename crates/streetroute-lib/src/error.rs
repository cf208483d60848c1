use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the streetroute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    /// The geocoding backend returned no match for an address.
    #[error("could not resolve address '{address}'")]
    Resolution { address: String },

    /// The street-network provider returned no usable data for a region.
    #[error("failed to fetch street network: {reason}")]
    NetworkFetch { reason: String },

    /// Origin and destination lie in disconnected parts of the network.
    #[error("no route found between node {origin} and node {destination}")]
    NoPath { origin: i64, destination: i64 },

    /// A request was submitted before both addresses were filled in.
    #[error("{field} address is empty")]
    MissingAddress { field: &'static str },

    /// Latitude or longitude out of range or not finite.
    #[error("invalid coordinate ({lat}, {lon})")]
    InvalidCoordinate { lat: f64, lon: f64 },

    /// Extents that are not finite, out of range, or inverted.
    #[error("invalid bounding box (N {north}, S {south}, E {east}, W {west}): {reason}")]
    InvalidBoundingBox {
        north: f64,
        south: f64,
        east: f64,
        west: f64,
        reason: &'static str,
    },

    /// Region padding that cannot produce a valid bounding box.
    #[error("invalid region padding {value}: {reason}")]
    InvalidMargin { value: f64, reason: &'static str },

    /// A response parsed as JSON but did not contain the expected fields.
    #[error("malformed response from {source_name}: {message}")]
    MalformedResponse {
        source_name: &'static str,
        message: String,
    },

    /// Raised when a travel mode string is not recognised.
    #[error("unknown travel mode '{value}'; expected walk, drive or bike")]
    UnknownTravelMode { value: String },

    /// Raised when a weight kind string is not recognised.
    #[error("unknown weight kind '{value}'; expected length or time")]
    UnknownWeightKind { value: String },

    /// Raised when a computed route lacks any nodes.
    #[error("route was empty")]
    EmptyRoute,

    /// Raised when a local gazetteer or network file is missing.
    #[error("file not found at {path}")]
    SourceNotFound { path: PathBuf },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for HTTP client errors.
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Wrapper for JSON decoding errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
