//! Shared helpers for integration tests

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use metrics_exporter_prometheus::PrometheusBuilder;
use sea_orm::{DatabaseConnection, EntityTrait, PaginatorTrait};
use sea_orm_migration::MigratorTrait;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use user_service::infrastructure::database::entities::{Role, UserRole};
use user_service::infrastructure::database::migrator::Migrator;
use user_service::server::build_router;
use user_service::{init_database, DatabaseConfig};

/// Lowest cost bcrypt accepts; keeps tests fast.
pub const TEST_HASH_COST: u32 = 4;

/// Fresh in-memory SQLite database with the schema applied.
pub async fn test_db() -> DatabaseConnection {
    let db = init_database(&DatabaseConfig::in_memory()).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

/// Fresh SQLite file with the schema applied, behind a multi-connection
/// pool. Keep the `TempDir` alive for as long as the connection is used.
pub async fn file_db() -> (TempDir, DatabaseConnection) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("users.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}?mode=rwc", path.display()),
        ..DatabaseConfig::default()
    };
    let db = init_database(&config).await.unwrap();
    Migrator::up(&db, None).await.unwrap();
    (dir, db)
}

/// Router over a fresh database. Metrics go to a local recorder that is
/// never installed globally.
pub async fn test_app() -> (Router, DatabaseConnection) {
    let db = test_db().await;
    let handle = PrometheusBuilder::new().build_recorder().handle();
    (build_router(db.clone(), TEST_HASH_COST, handle), db)
}

pub fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Send one request and decode the JSON response body.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub async fn role_count(db: &DatabaseConnection) -> u64 {
    Role::find().count(db).await.unwrap()
}

pub async fn link_count(db: &DatabaseConnection) -> u64 {
    UserRole::find().count(db).await.unwrap()
}

/// Role names of a `user` JSON object, sorted.
pub fn role_names(user: &Value) -> Vec<String> {
    let mut names: Vec<String> = user["roles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap().to_string())
        .collect();
    names.sort();
    names
}

/// Id of the named role inside a `user` JSON object.
pub fn role_id(user: &Value, name: &str) -> i64 {
    user["roles"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == name)
        .unwrap()["id"]
        .as_i64()
        .unwrap()
}
