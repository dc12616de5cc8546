//! User DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::domain::{CreateUserDto, Role, UpdateUserDto, User, UserSummary};

pub const PASSWORD_STRENGTH_MESSAGE: &str =
    "Password must contain at least one uppercase letter and one digit";

pub const USER_DELETED_MESSAGE: &str = "User deleted successfully";

// ── Requests ────────────────────────────────────────────────────

/// Create user request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, message = "login must not be empty"))]
    #[schema(example = "newuser")]
    pub login: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    #[schema(example = "New User")]
    pub name: String,
    #[validate(
        length(min = 1, message = "password must not be empty"),
        custom(function = "validate_password_strength")
    )]
    #[schema(example = "Password123")]
    pub password: String,
    #[validate(
        length(min = 1, message = "roles must not be empty"),
        custom(function = "validate_role_names")
    )]
    #[schema(example = json!(["admin", "user"]))]
    pub roles: Vec<String>,
}

impl From<CreateUserRequest> for CreateUserDto {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            login: r.login,
            name: r.name,
            password: r.password,
            roles: r.roles,
        }
    }
}

/// Update user request. Omitted fields stay unchanged; a role list
/// replaces the current roles.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    #[validate(custom(function = "validate_role_names"))]
    pub roles: Option<Vec<String>>,
}

impl From<UpdateUserRequest> for UpdateUserDto {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            name: r.name,
            roles: r.roles,
        }
    }
}

/// Passwords need at least one ASCII uppercase letter and one ASCII digit.
pub fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());
    if has_upper && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password_strength")
            .with_message(PASSWORD_STRENGTH_MESSAGE.into()))
    }
}

pub fn validate_role_names(roles: &[String]) -> Result<(), ValidationError> {
    if roles.iter().any(|r| r.trim().is_empty()) {
        return Err(ValidationError::new("blank_role")
            .with_message("role names must not be blank".into()));
    }
    Ok(())
}

// ── Responses ───────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: i32,
    pub name: String,
}

impl From<Role> for RoleDto {
    fn from(r: Role) -> Self {
        Self {
            id: r.id,
            name: r.name,
        }
    }
}

/// User API representation. The password hash never leaves the service.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub login: String,
    pub name: String,
    pub roles: Vec<RoleDto>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            login: u.login,
            name: u.name,
            roles: u.roles.into_iter().map(RoleDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummaryDto {
    pub login: String,
    pub name: String,
}

impl From<UserSummary> for UserSummaryDto {
    fn from(u: UserSummary) -> Self {
        Self {
            login: u.login,
            name: u.name,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub user: UserDto,
}

impl UserResponse {
    pub fn new(user: User) -> Self {
        Self {
            success: true,
            user: user.into(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserListResponse {
    pub success: bool,
    pub users: Vec<UserSummaryDto>,
}

impl UserListResponse {
    pub fn new(users: Vec<UserSummary>) -> Self {
        Self {
            success: true,
            users: users.into_iter().map(UserSummaryDto::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DeletedUserDto {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteUserResponse {
    pub success: bool,
    pub deleted_user: DeletedUserDto,
}

impl DeleteUserResponse {
    pub fn deleted() -> Self {
        Self {
            success: true,
            deleted_user: DeletedUserDto {
                success: true,
                message: USER_DELETED_MESSAGE.to_string(),
            },
        }
    }
}
