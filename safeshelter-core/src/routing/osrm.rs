//! OSRM-style HTTP routing service

use std::time::Duration;

use log::{debug, trace};
use serde::Deserialize;
use serde_json::Value;

use super::client::{RouteProvider, ServiceRoute};
use crate::{Error, GeoPoint, TravelMode};

pub(crate) const DEFAULT_USER_AGENT: &str = concat!("safeshelter/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OsrmConfig {
    pub base_url: String,
    /// Per-request bound; the public demo server has none of its own
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "https://router.project-osrm.org".to_string(),
            timeout_secs: 15,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OsrmResponse {
    code: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    distance: f64,
    duration: f64,
    #[serde(default)]
    geometry: Value,
}

#[derive(Debug, Deserialize)]
struct LineGeometry {
    coordinates: Vec<[f64; 2]>,
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    client: reqwest::Client,
    config: OsrmConfig,
}

impl OsrmClient {
    /// # Errors
    ///
    /// Returns [`Error::InvalidData`] if the HTTP client cannot be built
    pub fn new(config: OsrmConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::InvalidData(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client, config })
    }

    pub fn route_url(&self, start: GeoPoint, end: GeoPoint, mode: TravelMode) -> String {
        format!(
            "{}/route/v1/{}/{},{};{},{}?overview=full&geometries=geojson",
            self.config.base_url.trim_end_matches('/'),
            mode.profile(),
            start.lng,
            start.lat,
            end.lng,
            end.lat
        )
    }
}

impl RouteProvider for OsrmClient {
    async fn fetch_route(
        &self,
        start: GeoPoint,
        end: GeoPoint,
        mode: TravelMode,
    ) -> Result<ServiceRoute, Error> {
        let url = self.route_url(start, end, mode);
        trace!("GET {url}");

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let body: OsrmResponse = response.json().await?;
        parse_response(body)
    }
}

fn parse_response(body: OsrmResponse) -> Result<ServiceRoute, Error> {
    if body.code != "Ok" {
        return Err(Error::NoRoute(
            body.message.unwrap_or_else(|| body.code.clone()),
        ));
    }
    let route = body
        .routes
        .into_iter()
        .next()
        .ok_or_else(|| Error::NoRoute("empty route list".to_string()))?;

    if !route.distance.is_finite() || route.distance < 0.0 || !route.duration.is_finite() {
        return Err(Error::InvalidData(format!(
            "route with distance {} and duration {}",
            route.distance, route.duration
        )));
    }

    Ok(ServiceRoute {
        distance_m: route.distance,
        duration_s: route.duration,
        geometry: parse_geometry(route.geometry),
    })
}

/// Route line as points. An unusable geometry drops the line, not the route.
fn parse_geometry(geometry: Value) -> Option<Vec<GeoPoint>> {
    if geometry.is_null() {
        return None;
    }
    let line = match LineGeometry::deserialize(&geometry) {
        Ok(line) => line,
        Err(e) => {
            debug!("Ignoring route geometry: {e}");
            return None;
        }
    };
    line.coordinates
        .into_iter()
        .map(GeoPoint::from_lng_lat)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|e| debug!("Ignoring route geometry: {e}"))
        .ok()
}
