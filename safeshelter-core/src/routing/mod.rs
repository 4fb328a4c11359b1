//! Routing between the user and a facility.
//!
//! [`RoutingClient`] never fails: when the routing service cannot answer, the
//! result is a straight-line estimate. [`RouteSession`] adds the ordering
//! guarantee that only the most recently requested route is delivered.

mod client;
mod fallback;
mod osrm;
mod session;

pub use client::{RouteProvider, RoutingClient, ServiceRoute, walking_duration_seconds};
pub use fallback::{fallback_duration_seconds, straight_line_route};
pub(crate) use osrm::DEFAULT_USER_AGENT;
pub use osrm::{OsrmClient, OsrmConfig};
pub use session::RouteSession;
