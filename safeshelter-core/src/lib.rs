//! Core of the SafeShelter emergency map.
//!
//! Holds everything behind the map that is not rendering: the facility data
//! model, reprojection of the raw marker records, nearest-facility lookup,
//! routing with a straight-line fallback, incident reports and the
//! geocoding / geolocation collaborators used by the "find nearest" flow.

pub mod directions;
pub mod error;
pub mod geocoding;
pub mod geolocation;
pub mod geometry;
pub mod loading;
pub mod model;
pub mod prelude;
pub mod proximity;
pub mod reports;
pub mod routing;
pub mod to_geojson;

pub use error::Error;
pub use model::{Facility, FacilityKind, GeoPoint, RouteResult, RouteSummary, TravelMode};

/// Mean Earth radius in kilometres used for every great-circle distance
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Assumed walking speed, km/h. Walking durations are always derived from it.
pub const WALKING_SPEED_KMH: f64 = 5.0;

/// Minutes per kilometre for the straight-line estimate used when no route is available
pub const FALLBACK_MINUTES_PER_KM: f64 = 3.0;
