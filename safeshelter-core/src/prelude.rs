pub use crate::{EARTH_RADIUS_KM, FALLBACK_MINUTES_PER_KM, WALKING_SPEED_KMH};

// Re-export key components
pub use crate::directions::{Directions, DirectionsPlanner, Notice, NoticeLevel, RouteView};
pub use crate::geocoding::{NominatimClient, NominatimConfig, Place};
pub use crate::geolocation::{DEFAULT_GEOLOCATION_TIMEOUT, PositionProvider, locate};
pub use crate::geometry::{haversine_km, haversine_m, utm32n_to_wgs84};
pub use crate::loading::{
    FacilitySource, LoadSummary, MarkerStore, ParseReport, SupabaseConfig, SupabaseSource,
    parse_facilities,
};
pub use crate::proximity::{Nearest, find_nearest};
pub use crate::reports::{
    NEARBY_REPORTS_KM, NearbyReport, NewReport, Report, ReportBoard, ReportFilter, ReportStatus,
    ReportType, Severity, nearby_reports,
};
pub use crate::routing::{
    OsrmClient, OsrmConfig, RouteProvider, RouteSession, RoutingClient, ServiceRoute,
    straight_line_route,
};
pub use crate::to_geojson::facilities_to_geojson;

// Core data model
pub use crate::Error;
pub use crate::model::{Facility, FacilityKind, GeoPoint, RouteResult, RouteSummary, TravelMode};
