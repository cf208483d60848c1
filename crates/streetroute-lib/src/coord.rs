//! WGS84 coordinates and bounding boxes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Metres per degree of latitude on the mean sphere.
pub const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// A latitude/longitude pair in degrees. Deserialised values go through
/// [`Coordinate::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting values outside the WGS84 ranges.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        let valid = lat.is_finite()
            && lon.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lon);
        if !valid {
            return Err(Error::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Great-circle distance to `other` in metres (haversine).
    pub fn distance_to(&self, other: &Self) -> f64 {
        let phi1 = self.lat.to_radians();
        let phi2 = other.lat.to_radians();
        let d_phi = (other.lat - self.lat).to_radians();
        let d_lambda = (other.lon - self.lon).to_radians();

        let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }

    /// Position on the unit sphere. Euclidean distance between these points
    /// orders the same way as great-circle distance.
    pub fn to_unit_vector(&self) -> [f64; 3] {
        let phi = self.lat.to_radians();
        let lambda = self.lon.to_radians();
        [
            phi.cos() * lambda.cos(),
            phi.cos() * lambda.sin(),
            phi.sin(),
        ]
    }
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = Error;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.lat, raw.lon)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.lat, self.lon)
    }
}

/// Rectangular region in degrees. `west` is the minimum longitude and `east`
/// the maximum. Deserialised values go through [`BoundingBox::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundingBox")]
pub struct BoundingBox {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

#[derive(Deserialize)]
struct RawBoundingBox {
    north: f64,
    south: f64,
    east: f64,
    west: f64,
}

impl TryFrom<RawBoundingBox> for BoundingBox {
    type Error = Error;

    fn try_from(raw: RawBoundingBox) -> Result<Self> {
        Self::new(raw.north, raw.south, raw.east, raw.west)
    }
}

impl BoundingBox {
    /// Box from explicit extents. Rejects non-finite or out-of-range values
    /// and boxes with `north < south` or `east < west`.
    pub fn new(north: f64, south: f64, east: f64, west: f64) -> Result<Self> {
        let invalid = |reason| Error::InvalidBoundingBox {
            north,
            south,
            east,
            west,
            reason,
        };
        if ![north, south, east, west].iter().all(|v| v.is_finite()) {
            return Err(invalid("extents must be finite"));
        }
        if !(-90.0..=90.0).contains(&north) || !(-90.0..=90.0).contains(&south) {
            return Err(invalid("latitudes must lie within -90..=90"));
        }
        if !(-180.0..=180.0).contains(&east) || !(-180.0..=180.0).contains(&west) {
            return Err(invalid("longitudes must lie within -180..=180"));
        }
        if north < south {
            return Err(invalid("north is less than south"));
        }
        if east < west {
            return Err(invalid("east is less than west"));
        }
        Ok(Self {
            north,
            south,
            east,
            west,
        })
    }

    /// Re-check a box whose fields were set directly.
    pub fn validated(self) -> Result<Self> {
        Self::new(self.north, self.south, self.east, self.west)
    }

    /// Smallest box containing both coordinates, padded by `margin` degrees on
    /// every side and clamped to the valid coordinate range.
    pub fn enclosing(a: Coordinate, b: Coordinate, margin: f64) -> Result<Self> {
        if !margin.is_finite() || margin < 0.0 {
            return Err(Error::InvalidMargin {
                value: margin,
                reason: "margin must be a finite, non-negative number of degrees",
            });
        }

        Ok(Self {
            north: (a.lat.max(b.lat) + margin).min(90.0),
            south: (a.lat.min(b.lat) - margin).max(-90.0),
            east: (a.lon.max(b.lon) + margin).min(180.0),
            west: (a.lon.min(b.lon) - margin).max(-180.0),
        })
    }

    /// Box extending `distance_m` metres north, south, east and west of
    /// `center`.
    pub fn around(center: Coordinate, distance_m: f64) -> Result<Self> {
        if !distance_m.is_finite() || distance_m <= 0.0 {
            return Err(Error::InvalidMargin {
                value: distance_m,
                reason: "distance must be a finite, positive number of metres",
            });
        }

        let d_lat = distance_m / METRES_PER_DEGREE;
        // Longitude degrees shrink with latitude; keep a floor near the poles.
        let cos_lat = center.lat.to_radians().cos().max(1e-6);
        let d_lon = (d_lat / cos_lat).min(180.0);

        Ok(Self {
            north: (center.lat + d_lat).min(90.0),
            south: (center.lat - d_lat).max(-90.0),
            east: (center.lon + d_lon).min(180.0),
            west: (center.lon - d_lon).max(-180.0),
        })
    }

    /// Whether `coordinate` lies inside the box (edges included).
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.south..=self.north).contains(&coordinate.lat)
            && (self.west..=self.east).contains(&coordinate.lon)
    }

    /// Same as [`contains`](Self::contains) for raw degrees.
    pub fn contains_point(&self, lat: f64, lon: f64) -> bool {
        (self.south..=self.north).contains(&lat) && (self.west..=self.east).contains(&lon)
    }

    pub fn center(&self) -> Coordinate {
        Coordinate {
            lat: (self.north + self.south) / 2.0,
            lon: (self.east + self.west) / 2.0,
        }
    }

    /// Overpass QL bounding-box filter: `(south,west,north,east)`.
    pub fn to_overpass(&self) -> String {
        format!(
            "({:.7},{:.7},{:.7},{:.7})",
            self.south, self.west, self.north, self.east
        )
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N {:.6}, S {:.6}, E {:.6}, W {:.6}",
            self.north, self.south, self.east, self.west
        )
    }
}
