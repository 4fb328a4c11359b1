//! Great-circle distance and reprojection of source coordinates

mod utm;

pub use utm::{UTM32N_CENTRAL_MERIDIAN, utm32n_to_wgs84};

use crate::{EARTH_RADIUS_KM, GeoPoint};

/// Haversine distance in kilometres on a sphere of radius [`EARTH_RADIUS_KM`]
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push h a hair past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);

    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

pub fn haversine_m(a: GeoPoint, b: GeoPoint) -> f64 {
    haversine_km(a, b) * 1000.0
}
