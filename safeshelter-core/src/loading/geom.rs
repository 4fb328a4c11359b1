//! Coordinate extraction from the `geom` column of marker records

use serde::Deserialize;
use serde_json::Value;

use crate::geometry::utm32n_to_wgs84;
use crate::{Error, GeoPoint};

/// Coordinate reference system of a record's point geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceCrs {
    /// `[lon, lat]` unless the values are too large to be degrees, then UTM 32N
    Detect,
    /// Always EPSG:25832
    Utm32N,
}

#[derive(Deserialize)]
struct RawPoint {
    #[serde(rename = "type")]
    kind: String,
    coordinates: Vec<f64>,
}

/// Extracts a WGS84 point from a record geometry.
///
/// Accepts a GeoJSON `Point` object or the same object serialized as a string.
///
/// # Errors
///
/// Returns [`Error::MalformedGeometry`] when the geometry is missing, is not
/// a point, or cannot be reprojected to a valid WGS84 coordinate.
pub fn extract_point(geom: &Value, crs: SourceCrs) -> Result<GeoPoint, Error> {
    match geom {
        Value::Null => Err(Error::MalformedGeometry("missing geometry".to_string())),
        Value::String(text) => {
            let parsed: Value = serde_json::from_str(text).map_err(|e| {
                Error::MalformedGeometry(format!("unparseable geometry string: {e}"))
            })?;
            if parsed.is_object() {
                extract_point(&parsed, crs)
            } else {
                Err(Error::MalformedGeometry(format!(
                    "geometry string does not hold an object: {text}"
                )))
            }
        }
        Value::Object(_) => {
            let point = RawPoint::deserialize(geom)
                .map_err(|e| Error::MalformedGeometry(format!("invalid geometry object: {e}")))?;
            point_to_wgs84(&point, crs)
        }
        other => Err(Error::MalformedGeometry(format!(
            "unsupported geometry value: {other}"
        ))),
    }
}

fn point_to_wgs84(point: &RawPoint, crs: SourceCrs) -> Result<GeoPoint, Error> {
    if point.kind != "Point" {
        return Err(Error::MalformedGeometry(format!(
            "unsupported geometry type '{}'",
            point.kind
        )));
    }
    let [x, y] = match point.coordinates.as_slice() {
        [x, y, ..] => [*x, *y],
        _ => {
            return Err(Error::MalformedGeometry(
                "point has fewer than two coordinates".to_string(),
            ));
        }
    };

    let projected = match crs {
        SourceCrs::Utm32N => true,
        SourceCrs::Detect => x.abs() > 180.0 || y.abs() > 90.0,
    };

    let result = if projected {
        utm32n_to_wgs84(x, y)
    } else {
        GeoPoint::new(y, x)
    };

    result.map_err(|e| match e {
        Error::MalformedGeometry(_) => e,
        other => Error::MalformedGeometry(other.to_string()),
    })
}
