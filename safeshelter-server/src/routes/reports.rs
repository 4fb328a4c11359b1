//! In-memory incident reports

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use safeshelter_core::prelude::*;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    #[serde(rename = "type")]
    report_type: Option<String>,
    severity: Option<String>,
    lat: Option<f64>,
    lng: Option<f64>,
    max_km: Option<f64>,
}

impl ReportsQuery {
    fn filter(&self) -> Result<ReportFilter, ApiError> {
        Ok(ReportFilter {
            report_type: parse_choice(self.report_type.as_deref())?,
            severity: parse_choice(self.severity.as_deref())?,
        })
    }

    /// The user position and radius when the nearby view is requested
    fn proximity(&self) -> Result<Option<(GeoPoint, f64)>, ApiError> {
        let user = match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => GeoPoint::new(lat, lng)?,
            (None, None) => return Ok(None),
            _ => return Err(ApiError::BadRequest("lat and lng go together".to_string())),
        };
        let max_km = self.max_km.unwrap_or(NEARBY_REPORTS_KM);
        if !max_km.is_finite() || max_km <= 0.0 {
            return Err(ApiError::BadRequest(format!("invalid radius {max_km} km")));
        }
        Ok(Some((user, max_km)))
    }
}

/// `all` and a missing value both mean no filter
fn parse_choice<T>(value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T: std::str::FromStr<Err = safeshelter_core::Error>,
{
    match value {
        None | Some("all") => Ok(None),
        Some(v) => Ok(Some(v.parse::<T>()?)),
    }
}

/// Active reports, newest first, or closest first when `lat`/`lng` are given
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<Value>, ApiError> {
    let filter = query.filter()?;
    let board = state.reports.read().await;

    let value = match query.proximity()? {
        Some((user, max_km)) => serde_json::to_value(board.nearby(user, max_km, &filter)),
        None => serde_json::to_value(board.active(&filter)),
    }
    .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(Json(value))
}

pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<NewReport>, JsonRejection>,
) -> Result<(StatusCode, Json<Report>), ApiError> {
    let Json(new) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let mut board = state.reports.write().await;
    let report = board.submit(new)?.clone();
    Ok((StatusCode::CREATED, Json(report)))
}

pub async fn resolve(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Report>, ApiError> {
    let mut board = state.reports.write().await;
    board
        .resolve(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("unknown report '{id}'")))
}

pub async fn clear(State(state): State<AppState>) -> Json<Value> {
    let removed = state.reports.write().await.clear();
    Json(json!({ "removed": removed }))
}
