//! Data model for the emergency map
//!
//! Points, facilities and route results. Everything here is immutable once
//! built and is handed by value (or shared reference) to the presentation layer.

pub mod facility;
pub mod point;
pub mod route;

pub use facility::{Facility, FacilityKind};
pub use point::GeoPoint;
pub use route::{RouteResult, RouteSummary, TravelMode};
