use crate::geometry::haversine_km;
use crate::{FALLBACK_MINUTES_PER_KM, GeoPoint, RouteResult, TravelMode};

/// Estimated duration for a straight-line distance, seconds
pub fn fallback_duration_seconds(distance_km: f64) -> f64 {
    distance_km * FALLBACK_MINUTES_PER_KM * 60.0
}

/// Straight-line estimate used when the routing service gives no route.
///
/// The same minutes-per-kilometre rule applies to every mode.
pub fn straight_line_route(start: GeoPoint, end: GeoPoint, mode: TravelMode) -> RouteResult {
    let distance_km = haversine_km(start, end);
    RouteResult {
        distance_meters: distance_km * 1000.0,
        duration_seconds: fallback_duration_seconds(distance_km),
        geometry: None,
        mode,
        fallback: true,
    }
}
