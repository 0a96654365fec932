#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use sparkle_api::config::ServerConfig;
use sparkle_api::router::build_app_router;
use sparkle_api::state::AppState;
use sparkle_events::EventBus;

pub const TEST_OPERATOR_TOKEN: &str = "test-operator-token";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        operator_token: Some(TEST_OPERATOR_TOKEN.to_string()),
        ..ServerConfig::default()
    }
}

pub fn test_state() -> AppState {
    AppState::new(test_config(), Arc::new(EventBus::default())).unwrap()
}

/// Full router with the production middleware stack over `state`.
pub fn build_test_app(state: AppState) -> Router {
    build_app_router(state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

/// GET with `Authorization: Bearer <token>`.
pub async fn get_with_token(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: &Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A quote that passes validation and every spam heuristic.
pub fn valid_quote() -> Value {
    json!({
        "name": "Jane Doe",
        "mobile": "(865) 555-0123",
        "email": "jane@example.com",
        "address": "12 Oak St, Knoxville",
        "serviceType": "home",
        "rooms": "3 bed / 2 bath",
        "addOns": "inside oven",
        "preferredDays": "Tuesdays",
        "parkingNotes": "",
        "textOk": true,
        "completionTime": 95,
        "timestamp": "2026-10-18T14:00:00.000Z",
        "userAgent": "Mozilla/5.0"
    })
}
