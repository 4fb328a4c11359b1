mod directions;
mod facilities;
mod geocode;
mod proxy;
mod reports;

use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{BoxError, Json, Router};
use safeshelter_core::prelude::*;
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower::timeout::TimeoutLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::error::ApiError;
use crate::state::AppState;

pub fn router(state: AppState, config: &ServerConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/tilfluktsrom", get(proxy::shelters))
        .route("/api/brannstasjoner_agder", get(proxy::fire_stations))
        .route("/api/sykehus", get(proxy::hospitals))
        .route("/api/chat", post(proxy::chat))
        .route("/api/facilities/{kind}", get(facilities::facilities))
        .route("/api/nearest", get(facilities::nearest))
        .route("/api/reload", post(facilities::reload))
        .route("/api/route", get(directions::route))
        .route("/api/directions", get(directions::directions))
        .route("/api/geocode/search", get(geocode::search))
        .route("/api/geocode/reverse", get(geocode::reverse))
        .route(
            "/api/reports",
            get(reports::list).post(reports::submit).delete(reports::clear),
        )
        .route("/api/reports/{id}/resolve", post(reports::resolve))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.request_timeout_secs,
                )))
                .layer(GlobalConcurrencyLimitLayer::new(config.concurrency_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn handle_middleware_error(err: BoxError) -> ApiError {
    if err.is::<tower::timeout::error::Elapsed>() {
        ApiError::Timeout
    } else {
        ApiError::Internal(format!("unhandled internal error: {err}"))
    }
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let loaded = state.store.read().await.is_loaded();
    Json(json!({ "status": "ok", "markers_loaded": loaded }))
}

pub(crate) fn parse_kind(kind: &str) -> Result<FacilityKind, ApiError> {
    kind.parse::<FacilityKind>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Driving unless the request says otherwise
pub(crate) fn parse_mode(mode: Option<&str>) -> Result<TravelMode, ApiError> {
    mode.map_or(Ok(TravelMode::default()), |m| {
        m.parse::<TravelMode>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode, header};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::ChatClient;
    use crate::config::ChatConfig;

    /// Routing and geocoding point at a port nothing listens on
    async fn test_app(store: MarkerStore) -> Router {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let dead = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let routing = OsrmClient::new(OsrmConfig {
            base_url: dead.clone(),
            timeout_secs: 2,
            ..OsrmConfig::default()
        })
        .unwrap();
        let geocoder = NominatimClient::new(NominatimConfig {
            base_url: dead,
            timeout_secs: 2,
            ..NominatimConfig::default()
        })
        .unwrap();

        let state = AppState::new(
            store,
            RoutingClient::new(routing),
            geocoder,
            None,
            ChatClient::new(ChatConfig::default()).unwrap(),
        );
        router(state, &ServerConfig::default())
    }

    fn store() -> MarkerStore {
        MarkerStore::from_facilities([
            Facility::new("far", FacilityKind::Shelter, GeoPoint::new(58.10, 7.90).unwrap()),
            Facility::new("near", FacilityKind::Shelter, GeoPoint::new(58.17, 8.02).unwrap())
                .with_attribute("capacity", "120"),
        ])
    }

    async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
        send(app, Method::GET, uri).await
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        respond(app, request).await
    }

    async fn post_json(app: Router, uri: &str, body: &Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        respond(app, request).await
    }

    async fn respond(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn health_reports_loaded_markers() {
        let (status, body) = get_json(test_app(store()).await, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["markers_loaded"], true);
    }

    #[tokio::test]
    async fn nearest_shelter() {
        let (status, body) = get_json(
            test_app(store()).await,
            "/api/nearest?kind=shelter&lat=58.1599&lng=8.0182",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["facility"]["id"], "near");
        assert!((body["distance_km"].as_f64().unwrap() - 1.12802).abs() < 1e-4);
    }

    #[tokio::test]
    async fn nearest_in_empty_layer_is_not_found() {
        let (status, body) = get_json(
            test_app(store()).await,
            "/api/nearest?kind=sykehus&lat=58.1599&lng=8.0182",
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Ingen data tilgjengelig");
    }

    #[tokio::test]
    async fn bad_input_is_rejected() {
        let (status, body) = get_json(
            test_app(store()).await,
            "/api/nearest?kind=school&lat=58.1599&lng=8.0182",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].as_str().unwrap().contains("school"));

        let (status, _) = get_json(
            test_app(store()).await,
            "/api/nearest?kind=shelter&lat=95&lng=8.0182",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn facilities_as_feature_collection() {
        let (status, body) =
            get_json(test_app(store()).await, "/api/facilities/tilfluktsrom").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "FeatureCollection");
        assert_eq!(body["features"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn route_falls_back_when_service_is_down() {
        let (status, body) = get_json(
            test_app(store()).await,
            "/api/route?from_lat=58.1599&from_lng=8.0182&to_lat=58.17&to_lng=8.02&mode=walking",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["fallback"], true);
        assert_eq!(body["mode"], "walking");
        assert!(body["geometry"].is_null());
        assert!((body["distanceMeters"].as_f64().unwrap() - 1128.02).abs() < 0.1);
        assert_eq!(body["summary"]["distance_text"], "1.13 km");
    }

    #[tokio::test]
    async fn route_as_geojson() {
        let (status, body) = get_json(
            test_app(store()).await,
            "/api/route?from_lat=58.1599&from_lng=8.0182&to_lat=58.17&to_lng=8.02&format=geojson",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["type"], "Feature");
        assert_eq!(body["geometry"]["type"], "LineString");
        assert_eq!(body["properties"]["mode"], "driving");
    }

    #[tokio::test]
    async fn directions_to_nearest_shelter() {
        let (status, body) = get_json(
            test_app(store()).await,
            "/api/directions?kind=shelter&lat=58.1599&lng=8.0182&mode=foot",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["facility"]["id"], "near");
        assert_eq!(body["route"]["mode"], "walking");
        assert_eq!(body["route"]["fallback"], true);
    }

    #[tokio::test]
    async fn table_proxy_without_database_is_unavailable() {
        let (status, body) = get_json(test_app(store()).await, "/api/tilfluktsrom").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["message"], "Database is not configured");

        let (status, _) = send(test_app(store()).await, Method::POST, "/api/reload").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn geocoding_failure_is_bad_gateway() {
        let (status, body) = get_json(
            test_app(store()).await,
            "/api/geocode/search?q=Kristiansand",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body["error"]["message"].is_string());
    }

    fn flooding_at(lat: f64, lng: f64) -> Value {
        json!({
            "type": "flooding",
            "severity": "high",
            "description": "Elven har gått over sine bredder.",
            "location": { "lat": lat, "lng": lng }
        })
    }

    #[tokio::test]
    async fn submitted_reports_are_listed() {
        let app = test_app(store()).await;

        let report = flooding_at(58.17, 8.02);
        let (status, body) = post_json(app.clone(), "/api/reports", &report).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], "SR-1");
        assert_eq!(body["status"], "active");
        assert_eq!(body["type"], "flooding");

        let mut outage = flooding_at(58.40, 8.50);
        outage["type"] = json!("power-outage");
        let (status, _) = post_json(app.clone(), "/api/reports", &outage).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = get_json(app.clone(), "/api/reports").await;
        assert_eq!(status, StatusCode::OK);
        let ids: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|r| r["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, ["SR-2", "SR-1"]);

        let (_, body) = get_json(app.clone(), "/api/reports?type=power-outage&severity=all").await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["id"], "SR-2");
    }

    #[tokio::test]
    async fn nearby_reports_within_ten_km() {
        let app = test_app(store()).await;
        for (lat, lng) in [(58.40, 8.50), (58.17, 8.02), (58.16, 8.0182)] {
            let (status, _) = post_json(app.clone(), "/api/reports", &flooding_at(lat, lng)).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = get_json(app.clone(), "/api/reports?lat=58.1599&lng=8.0182").await;
        assert_eq!(status, StatusCode::OK);
        let nearby = body.as_array().unwrap();
        assert_eq!(nearby.len(), 2);
        assert_eq!(nearby[0]["id"], "SR-3");
        assert_eq!(nearby[1]["id"], "SR-2");
        assert!((nearby[1]["distance_km"].as_f64().unwrap() - 1.12802).abs() < 1e-4);

        let (_, body) = get_json(app, "/api/reports?lat=58.1599&lng=8.0182&max_km=50").await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn invalid_reports_are_rejected() {
        let app = test_app(store()).await;

        let (status, body) = post_json(app.clone(), "/api/reports", &flooding_at(95.0, 8.0)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]["message"].is_string());

        let mut blank = flooding_at(58.17, 8.02);
        blank["description"] = json!("  ");
        let (status, _) = post_json(app.clone(), "/api/reports", &blank).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app.clone(), "/api/reports?type=earthquake").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = get_json(app.clone(), "/api/reports?lat=58.1599").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (_, body) = get_json(app, "/api/reports").await;
        assert!(body.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn resolved_and_cleared_reports_disappear() {
        let app = test_app(store()).await;
        post_json(app.clone(), "/api/reports", &flooding_at(58.17, 8.02)).await;
        post_json(app.clone(), "/api/reports", &flooding_at(58.16, 8.01)).await;

        let (status, body) = send(app.clone(), Method::POST, "/api/reports/SR-1/resolve").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "resolved");

        let (status, _) = send(app.clone(), Method::POST, "/api/reports/SR-9/resolve").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = get_json(app.clone(), "/api/reports").await;
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, body) = send(app.clone(), Method::DELETE, "/api/reports").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["removed"], 2);
        let (_, body) = get_json(app, "/api/reports").await;
        assert!(body.as_array().unwrap().is_empty());
    }
}
