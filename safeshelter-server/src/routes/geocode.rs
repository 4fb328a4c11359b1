use axum::Json;
use axum::extract::{Query, State};
use safeshelter_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    q: String,
    limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Serialize)]
pub struct ReverseResponse {
    display_name: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Place>>, ApiError> {
    if query.q.trim().is_empty() {
        return Err(ApiError::BadRequest("empty search query".to_string()));
    }
    let limit = query
        .limit
        .unwrap_or(state.geocoder.config().suggestion_limit)
        .clamp(1, 50);
    Ok(Json(state.geocoder.search(&query.q, limit).await?))
}

pub async fn reverse(
    State(state): State<AppState>,
    Query(query): Query<ReverseQuery>,
) -> Result<Json<ReverseResponse>, ApiError> {
    let point = GeoPoint::new(query.lat, query.lng)?;
    let display_name = state.geocoder.reverse(point).await?;
    Ok(Json(ReverseResponse { display_name }))
}
