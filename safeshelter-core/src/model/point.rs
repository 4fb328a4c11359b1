use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

use crate::Error;

/// WGS84 coordinate in degrees.
///
/// Always within `-90..=90` latitude and `-180..=180` longitude when built
/// through [`GeoPoint::new`]. Note the field order: `lat` first, while
/// `geo` and GeoJSON use `(x = lng, y = lat)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// Unchecked wire form, validated through [`GeoPoint::new`]
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = Error;

    fn try_from(raw: RawGeoPoint) -> Result<Self, Self::Error> {
        GeoPoint::new(raw.lat, raw.lng)
    }
}

impl GeoPoint {
    /// Creates a validated point
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCoordinate`] for non-finite or out of range values
    pub fn new(lat: f64, lng: f64) -> Result<Self, Error> {
        if lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng)
        {
            Ok(Self { lat, lng })
        } else {
            Err(Error::InvalidCoordinate { lat, lng })
        }
    }

    /// Builds a point from a GeoJSON `[lng, lat]` position
    pub fn from_lng_lat(position: [f64; 2]) -> Result<Self, Error> {
        Self::new(position[1], position[0])
    }

    /// GeoJSON ordered position
    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lng, self.lat]
    }
}

impl From<GeoPoint> for Point<f64> {
    fn from(p: GeoPoint) -> Self {
        Point::new(p.lng, p.lat)
    }
}

impl From<GeoPoint> for Coord<f64> {
    fn from(p: GeoPoint) -> Self {
        Coord { x: p.lng, y: p.lat }
    }
}

impl TryFrom<Point<f64>> for GeoPoint {
    type Error = Error;

    fn try_from(p: Point<f64>) -> Result<Self, Self::Error> {
        GeoPoint::new(p.y(), p.x())
    }
}
