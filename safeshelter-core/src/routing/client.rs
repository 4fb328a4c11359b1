use std::future::Future;

use log::warn;

use super::fallback::straight_line_route;
use crate::{Error, GeoPoint, RouteResult, TravelMode, WALKING_SPEED_KMH};

/// Route as reported by a routing service, before mode rules are applied
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRoute {
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry: Option<Vec<GeoPoint>>,
}

/// External routing service
pub trait RouteProvider: Send + Sync {
    fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        mode: TravelMode,
    ) -> impl Future<Output = Result<ServiceRoute, Error>> + Send;
}

/// Walking time for `distance_m` at [`WALKING_SPEED_KMH`]
pub fn walking_duration_seconds(distance_m: f64) -> f64 {
    distance_m / 1000.0 / WALKING_SPEED_KMH * 3600.0
}

/// Single-attempt routing with a straight-line fallback
#[derive(Debug, Clone)]
pub struct RoutingClient<P> {
    provider: P,
}

impl<P: RouteProvider> RoutingClient<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Route from `start` to `end`.
    ///
    /// Driving keeps the service's duration; walking duration is always
    /// derived from the distance. Any provider error is logged and replaced by
    /// [`straight_line_route`], so the caller always gets a usable result.
    pub async fn route(&self, start: GeoPoint, end: GeoPoint, mode: TravelMode) -> RouteResult {
        match self.provider.fetch_route(start, end, mode).await {
            Ok(route) => {
                let duration_seconds = match mode {
                    TravelMode::Driving => route.duration_s,
                    TravelMode::Walking => walking_duration_seconds(route.distance_m),
                };
                RouteResult {
                    distance_meters: route.distance_m,
                    duration_seconds,
                    geometry: route.geometry,
                    mode,
                    fallback: false,
                }
            }
            Err(e) => {
                warn!("Routing ({mode}) failed, using straight-line estimate: {e}");
                straight_line_route(start, end, mode)
            }
        }
    }
}
