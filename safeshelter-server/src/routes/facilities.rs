use axum::Json;
use axum::extract::{Path, Query, State};
use geojson::FeatureCollection;
use safeshelter_core::prelude::*;
use serde::{Deserialize, Serialize};

use super::parse_kind;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NearestQuery {
    kind: String,
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
pub struct NearestResponse {
    facility: Facility,
    distance_km: f64,
}

/// Loaded facilities of one kind as a `GeoJSON` layer
pub async fn facilities(
    State(state): State<AppState>,
    Path(kind): Path<String>,
) -> Result<Json<FeatureCollection>, ApiError> {
    let kind = parse_kind(&kind)?;
    let store = state.store.read().await;
    Ok(Json(facilities_to_geojson(store.get_facilities(kind))?))
}

pub async fn nearest(
    State(state): State<AppState>,
    Query(query): Query<NearestQuery>,
) -> Result<Json<NearestResponse>, ApiError> {
    let kind = parse_kind(&query.kind)?;
    let user = GeoPoint::new(query.lat, query.lng)?;

    let store = state.store.read().await;
    let nearest = store.nearest(kind, user)?;
    Ok(Json(NearestResponse {
        facility: nearest.facility.clone(),
        distance_km: nearest.distance_km,
    }))
}

pub async fn reload(State(state): State<AppState>) -> Result<Json<LoadSummary>, ApiError> {
    let summary = state.reload().await?;
    tracing::info!(?summary, "Marker data reloaded");
    Ok(Json(summary))
}
