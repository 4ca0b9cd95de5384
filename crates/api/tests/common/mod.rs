//! Shared harness for API integration tests.
//!
//! Builds the real application router over a test database, with the
//! payment gateway swapped for [`MockGateway`] so tests can sign their
//! own payment proofs and force session failures.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use agrirent_api::config::ServerConfig;
use agrirent_api::router::build_app_router;
use agrirent_api::state::AppState;
use agrirent_gateway::mock::MockGateway;

/// Server configuration for tests. Host/port are unused because requests
/// go through `tower::ServiceExt::oneshot` rather than a socket.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 5,
        shutdown_timeout_secs: 1,
    }
}

/// Build the application router plus a handle to the mock gateway so
/// tests can steer session behaviour.
pub fn build_test_app(pool: PgPool) -> (Router, Arc<MockGateway>) {
    let gateway = Arc::new(MockGateway::new());
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        gateway: gateway.clone(),
    };
    (build_app_router(state, &config), gateway)
}

/// Issue a request and return the status plus the parsed JSON body
/// (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

/// POST a raw byte body with extra headers (webhook tests need to sign
/// the exact bytes that go over the wire).
pub async fn post_raw(
    app: &Router,
    uri: &str,
    headers: &[(&str, &str)],
    body: Vec<u8>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body)).unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

// ---------------------------------------------------------------------------
// Seeding through the API
// ---------------------------------------------------------------------------

pub async fn seed_user(app: &Router, email: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/users",
        Some(json!({ "name": "Test Farmer", "email": email })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed_user failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

pub async fn seed_equipment(app: &Router, owner_id: i64, daily_rate_paise: i64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/v1/equipment",
        Some(json!({
            "owner_id": owner_id,
            "name": "Mahindra 575 Tractor",
            "category": "tractor",
            "daily_rate_paise": daily_rate_paise,
            "location": "Nashik"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "seed_equipment failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}

/// A date `days` days from today, formatted as the API expects.
/// Booking creation rejects past start dates, so tests book ahead.
pub fn future_date(days: u64) -> String {
    (chrono::Utc::now().date_naive() + chrono::Days::new(days))
        .format("%Y-%m-%d")
        .to_string()
}
