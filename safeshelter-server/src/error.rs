use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use safeshelter_core::Error as CoreError;
use serde_json::json;

/// Failure of an API request, rendered as `{ "error": { "message": ... } }`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Upstream(String),
    #[error("{0} is not configured")]
    NotConfigured(&'static str),
    #[error("Request timed out")]
    Timeout,
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream(_) => StatusCode::BAD_GATEWAY,
            ApiError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(e: CoreError) -> Self {
        match e {
            CoreError::EmptyCollection => ApiError::NotFound(e.user_message().to_string()),
            CoreError::InvalidCoordinate { .. }
            | CoreError::InvalidData(_)
            | CoreError::GeolocationDenied
            | CoreError::GeolocationUnavailable
            | CoreError::GeolocationTimeout(_) => ApiError::BadRequest(e.to_string()),
            CoreError::NetworkError(_)
            | CoreError::HttpStatus(_)
            | CoreError::NoRoute(_)
            | CoreError::MalformedGeometry(_) => ApiError::Upstream(e.to_string()),
            CoreError::GeoJsonError(_) => ApiError::Internal(e.to_string()),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        ApiError::Upstream(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(%status, "{self}");
        }
        let body = json!({ "error": { "message": self.to_string() } });
        (status, Json(body)).into_response()
    }
}
