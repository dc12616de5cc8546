//! API router with OpenAPI documentation

use std::sync::Arc;

use axum::{
    http::StatusCode,
    middleware,
    routing::get,
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

use crate::application::UserService;
use crate::infrastructure::SeaOrmUserRepository;
use crate::interfaces::http::common::ErrorResponse;
use crate::interfaces::http::modules::{health, metrics, request_id, users};

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Monitoring
        metrics::prometheus_metrics,
        // Users
        users::create_user,
        users::list_users,
        users::get_user,
        users::update_user,
        users::delete_user,
    ),
    components(
        schemas(
            ErrorResponse,
            health::HealthStatus,
            health::HealthResponse,
            health::ComponentHealth,
            users::CreateUserRequest,
            users::UpdateUserRequest,
            users::RoleDto,
            users::UserDto,
            users::UserSummaryDto,
            users::UserResponse,
            users::UserListResponse,
            users::DeletedUserDto,
            users::DeleteUserResponse,
        )
    ),
    tags(
        (name = "Health", description = "Service and database liveness"),
        (name = "Monitoring", description = "Prometheus metrics"),
        (name = "Users", description = "User accounts and their roles"),
    ),
    info(
        title = "User Service API",
        version = "1.0.0",
        description = "REST API for managing users and role assignments",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

async fn route_not_found() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new("Route not found")),
    )
}

/// Create the API router with all routes
pub fn create_api_router(
    user_service: Arc<UserService<SeaOrmUserRepository>>,
    db: DatabaseConnection,
    prometheus_handle: PrometheusHandle,
) -> Router {
    let user_routes = Router::new()
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{login}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .with_state(users::UserHandlerState { user_service });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState::new(db));

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: prometheus_handle,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api-doc/openapi.json", get(openapi_json))
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(user_routes)
        .fallback(route_not_found)
        // Middleware
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(middleware::from_fn(request_id::request_id_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
