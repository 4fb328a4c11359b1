use axum::Json;
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use safeshelter_core::prelude::*;
use serde::{Deserialize, Serialize};

use super::{parse_kind, parse_mode};
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    from_lat: f64,
    from_lng: f64,
    to_lat: f64,
    to_lng: f64,
    mode: Option<String>,
    /// `geojson` returns the route as a `Feature`
    format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RouteResponse {
    #[serde(flatten)]
    route: RouteResult,
    summary: RouteSummary,
}

#[derive(Debug, Deserialize)]
pub struct DirectionsQuery {
    kind: String,
    lat: f64,
    lng: f64,
    mode: Option<String>,
}

/// Route between two points. Routing failures still answer 200 with a
/// straight-line estimate flagged as `fallback`.
pub async fn route(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Response, ApiError> {
    let start = GeoPoint::new(query.from_lat, query.from_lng)?;
    let end = GeoPoint::new(query.to_lat, query.to_lng)?;
    let mode = parse_mode(query.mode.as_deref())?;

    let route = state.routing.route(start, end, mode).await;
    match query.format.as_deref() {
        Some("geojson") => Ok(Json(route.to_geojson(start, end)?).into_response()),
        None | Some("json") => {
            let summary = route.summary();
            Ok(Json(RouteResponse { route, summary }).into_response())
        }
        Some(other) => Err(ApiError::BadRequest(format!("unknown format '{other}'"))),
    }
}

/// Nearest facility of a kind plus the route to it
pub async fn directions(
    State(state): State<AppState>,
    Query(query): Query<DirectionsQuery>,
) -> Result<Json<Directions>, ApiError> {
    let kind = parse_kind(&query.kind)?;
    let user = GeoPoint::new(query.lat, query.lng)?;
    let mode = parse_mode(query.mode.as_deref())?;

    // Release the store before the routing request
    let facility = {
        let store = state.store.read().await;
        store.nearest(kind, user)?.facility.clone()
    };

    let planner = DirectionsPlanner::new(state.routing.clone());
    planner
        .directions_to(user, facility, mode)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::Internal("route request was superseded".to_string()))
}
