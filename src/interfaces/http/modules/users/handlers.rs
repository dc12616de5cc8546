//! User management API handlers
//!
//! CRUD endpoints keyed by login.
//! Delegates to `UserService` from the application/identity layer.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    CreateUserRequest, DeleteUserResponse, UpdateUserRequest, UserDto, UserListResponse,
    UserResponse,
};
use crate::application::identity::UserService;
use crate::infrastructure::database::repositories::SeaOrmUserRepository;
use crate::interfaces::http::common::{api_error, ApiError, ErrorResponse, ValidatedJson};

/// User handler state: concrete over `SeaOrmUserRepository` for Axum compatibility.
#[derive(Clone)]
pub struct UserHandlerState {
    pub user_service: Arc<UserService<SeaOrmUserRepository>>,
}

#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Validation error or login taken", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn create_user(
    State(state): State<UserHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = state
        .user_service
        .create_user(request.into())
        .await
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(UserResponse::new(user))))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users, login and name only", body = UserListResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    )
)]
pub async fn list_users(
    State(state): State<UserHandlerState>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state.user_service.list_users().await.map_err(api_error)?;
    Ok(Json(UserListResponse::new(users)))
}

#[utoipa::path(
    get,
    path = "/users/{login}",
    tag = "Users",
    params(("login" = String, Path, description = "User login")),
    responses(
        (status = 200, description = "User with roles", body = UserResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    State(state): State<UserHandlerState>,
    Path(login): Path<String>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .user_service
        .get_user(&login)
        .await
        .map_err(api_error)?;
    Ok(Json(UserResponse::new(user)))
}

#[utoipa::path(
    put,
    path = "/users/{login}",
    tag = "Users",
    params(("login" = String, Path, description = "User login")),
    request_body = UpdateUserRequest,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    State(state): State<UserHandlerState>,
    Path(login): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserDto>, ApiError> {
    let user = state
        .user_service
        .update_user(&login, request.into())
        .await
        .map_err(api_error)?;
    Ok(Json(UserDto::from(user)))
}

#[utoipa::path(
    delete,
    path = "/users/{login}",
    tag = "Users",
    params(("login" = String, Path, description = "User login")),
    responses(
        (status = 200, description = "User deleted", body = DeleteUserResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    State(state): State<UserHandlerState>,
    Path(login): Path<String>,
) -> Result<Json<DeleteUserResponse>, ApiError> {
    state
        .user_service
        .delete_user(&login)
        .await
        .map_err(api_error)?;
    Ok(Json(DeleteUserResponse::deleted()))
}
