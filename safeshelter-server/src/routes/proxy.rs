//! Pass-through routes: raw database tables and the chat API

use axum::Json;
use axum::extract::State;
use safeshelter_core::prelude::*;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    message: String,
}

async fn table(state: &AppState, kind: FacilityKind) -> Result<Json<Value>, ApiError> {
    Ok(Json(state.source()?.fetch(kind).await?))
}

pub async fn shelters(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    table(&state, FacilityKind::Shelter).await
}

pub async fn fire_stations(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    table(&state, FacilityKind::FireStation).await
}

pub async fn hospitals(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    table(&state, FacilityKind::Hospital).await
}

pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<Value>, ApiError> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("empty chat message".to_string()));
    }
    Ok(Json(state.chat.complete(&request.message).await?))
}
