//! Inverse transverse Mercator for EPSG:25832 (ETRS89 / UTM zone 32N).
//!
//! Fire station and some shelter records are stored projected. ETRS89 and
//! WGS84 coincide at map precision, so no datum shift is applied.

use crate::{Error, GeoPoint};

/// GRS80 semi-major axis, metres
const SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// GRS80 flattening
const FLATTENING: f64 = 1.0 / 298.257_222_101;
const SCALE_FACTOR: f64 = 0.9996;
const FALSE_EASTING: f64 = 500_000.0;

/// Central meridian of zone 32, degrees
pub const UTM32N_CENTRAL_MERIDIAN: f64 = 9.0;

/// Converts a UTM zone 32N easting/northing pair (metres) to WGS84.
///
/// # Errors
///
/// Returns [`Error::MalformedGeometry`] for non-finite input and
/// [`Error::InvalidCoordinate`] when the result falls outside WGS84 bounds.
pub fn utm32n_to_wgs84(easting: f64, northing: f64) -> Result<GeoPoint, Error> {
    if !easting.is_finite() || !northing.is_finite() {
        return Err(Error::MalformedGeometry(format!(
            "non-finite UTM coordinate ({easting}, {northing})"
        )));
    }

    let e2 = FLATTENING * (2.0 - FLATTENING);
    let ep2 = e2 / (1.0 - e2);
    let e4 = e2 * e2;
    let e6 = e4 * e2;

    // Footpoint latitude from the meridional arc
    let arc = northing / SCALE_FACTOR;
    let mu = arc / (SEMI_MAJOR_AXIS * (1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0));
    let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());
    let phi1 = mu
        + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
        + (21.0 * e1.powi(2) / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
        + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
        + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

    let (sin_phi, cos_phi) = phi1.sin_cos();
    let tan_phi = phi1.tan();
    let c1 = ep2 * cos_phi * cos_phi;
    let t1 = tan_phi * tan_phi;
    let w = 1.0 - e2 * sin_phi * sin_phi;
    let n1 = SEMI_MAJOR_AXIS / w.sqrt();
    let r1 = SEMI_MAJOR_AXIS * (1.0 - e2) / w.powf(1.5);
    let d = (easting - FALSE_EASTING) / (n1 * SCALE_FACTOR);

    let lat = phi1
        - (n1 * tan_phi / r1)
            * (d.powi(2) / 2.0
                - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * ep2) * d.powi(4) / 24.0
                + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1 - 252.0 * ep2 - 3.0 * c1 * c1)
                    * d.powi(6)
                    / 720.0);
    let lng = UTM32N_CENTRAL_MERIDIAN.to_radians()
        + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
            + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * ep2 + 24.0 * t1 * t1)
                * d.powi(5)
                / 120.0)
            / cos_phi;

    GeoPoint::new(lat.to_degrees(), lng.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(p: GeoPoint, lat: f64, lng: f64) {
        assert!((p.lat - lat).abs() < 1e-6, "lat {} != {lat}", p.lat);
        assert!((p.lng - lng).abs() < 1e-6, "lng {} != {lng}", p.lng);
    }

    #[test]
    fn kristiansand_centre() {
        let p = utm32n_to_wgs84(442_226.758, 6_446_933.069).unwrap();
        assert_close(p, 58.1599, 8.0182);
    }

    #[test]
    fn oslo_east_of_central_meridian() {
        let p = utm32n_to_wgs84(597_979.903, 6_643_118.991).unwrap();
        assert_close(p, 59.9139, 10.7522);
    }

    #[test]
    fn false_easting_lies_on_central_meridian() {
        let p = utm32n_to_wgs84(500_000.0, 6_428_710.159).unwrap();
        assert_close(p, 58.0, 9.0);
    }

    #[test]
    fn rejects_non_finite_input() {
        assert!(matches!(
            utm32n_to_wgs84(f64::NAN, 6_446_933.0),
            Err(Error::MalformedGeometry(_))
        ));
    }
}
