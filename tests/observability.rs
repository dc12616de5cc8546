//! Health, metrics, OpenAPI and process lifecycle.

mod common;

use axum::http::StatusCode;
use serde_json::json;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use user_service::config::AppConfig;
use user_service::interfaces::http::modules::metrics::install_recorder;
use user_service::server::{build_router, ServerHandle, ServerOptions};

use common::*;

#[tokio::test]
async fn health_reports_database_ok() {
    let (app, _db) = test_app().await;
    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"]["status"], "ok");
}

#[tokio::test]
async fn health_is_degraded_when_database_is_closed() {
    let (app, db) = test_app().await;
    db.close().await.unwrap();

    let (status, body) = send(&app, empty_request("GET", "/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn openapi_document_lists_user_routes() {
    let (app, _db) = test_app().await;
    let (status, body) = send(&app, empty_request("GET", "/api-doc/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"].get("/users").is_some());
    assert!(body["paths"].get("/users/{login}").is_some());
    assert!(body["components"]["schemas"].get("CreateUserRequest").is_some());
}

#[tokio::test]
async fn metrics_count_requests_by_route_template() {
    let handle = install_recorder().unwrap();
    let db = test_db().await;
    let app = build_router(db, TEST_HASH_COST, handle);

    send(&app, empty_request("GET", "/users/somebody")).await;

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/metrics"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .unwrap()
        .to_bytes();
    let text = String::from_utf8(bytes.to_vec()).unwrap();

    assert!(text.contains("http_requests_total"));
    assert!(text.contains("http_request_duration_seconds"));
    assert!(text.contains("path=\"/users/{login}\""));
    assert!(!text.contains("/users/somebody"));
}

#[tokio::test]
async fn server_starts_serves_and_shuts_down() {
    let mut config = AppConfig::default();
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 0;
    config.server.shutdown_timeout = 5;
    config.database.url = "sqlite::memory:".to_string();
    config.database.max_connections = 1;
    config.security.bcrypt_cost = TEST_HASH_COST;

    let handle = ServerHandle::start(ServerOptions {
        config,
        auto_migrate: true,
    })
    .await
    .unwrap();
    assert!(handle.is_running());

    let mut stream = tokio::net::TcpStream::connect(handle.local_addr)
        .await
        .unwrap();
    stream
        .write_all(b"GET /users HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await
        .unwrap();
    let mut raw = Vec::new();
    stream.read_to_end(&mut raw).await.unwrap();
    let raw = String::from_utf8_lossy(&raw);

    assert!(raw.starts_with("HTTP/1.1 200"));
    let body_start = raw.find("\r\n\r\n").unwrap() + 4;
    let body: serde_json::Value = serde_json::from_str(&raw[body_start..]).unwrap();
    assert_eq!(body, json!({"success": true, "users": []}));

    handle.shutdown().await;
}
