//! User management service: application-layer orchestration
//!
//! All user-related business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;

use crate::domain::{
    distinct_role_names, CreateUserDto, DomainError, DomainResult, NewUser, UpdateUserDto,
    User, UserChanges, UserRepositoryInterface, UserSummary,
};
use crate::infrastructure::crypto::password::hash_password;

/// User service: orchestrates all user-management use-cases.
///
/// Generic over `R: UserRepositoryInterface` so it stays decoupled from
/// the concrete persistence layer.
pub struct UserService<R: UserRepositoryInterface> {
    repo: Arc<R>,
    hash_cost: u32,
}

impl<R: UserRepositoryInterface> UserService<R> {
    pub fn new(repo: Arc<R>, hash_cost: u32) -> Self {
        Self { repo, hash_cost }
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Register a user and attach the requested roles, creating missing ones.
    pub async fn create_user(&self, dto: CreateUserDto) -> DomainResult<User> {
        if self.repo.find_by_login(&dto.login).await?.is_some() {
            return Err(DomainError::Conflict(
                "User with this login already exists".into(),
            ));
        }

        let password_hash = self.hash(dto.password).await?;

        let user = self
            .repo
            .create_user(NewUser {
                login: dto.login,
                name: dto.name,
                password_hash,
                roles: distinct_role_names(dto.roles),
            })
            .await?;

        info!(login = %user.login, roles = ?user.role_names(), "User created");
        Ok(user)
    }

    /// Apply a partial update. A supplied role list replaces the whole role
    /// set; an empty name counts as not supplied.
    pub async fn update_user(&self, login: &str, dto: UpdateUserDto) -> DomainResult<User> {
        let changes = UserChanges {
            name: dto.name.filter(|n| !n.is_empty()),
            roles: dto.roles.map(distinct_role_names),
        };

        let user = self
            .repo
            .update_user(login, changes)
            .await?
            .ok_or_else(|| DomainError::user_not_found(login))?;

        info!(login = %user.login, roles = ?user.role_names(), "User updated");
        Ok(user)
    }

    /// Delete a user by login.
    pub async fn delete_user(&self, login: &str) -> DomainResult<()> {
        self.repo.delete_user(login).await?;
        info!(login = %login, "User deleted");
        Ok(())
    }

    // ── Queries ─────────────────────────────────────────────────

    /// Get a single user with roles.
    pub async fn get_user(&self, login: &str) -> DomainResult<User> {
        self.repo
            .find_by_login(login)
            .await?
            .ok_or_else(|| DomainError::user_not_found(login))
    }

    /// List all users (login and name only).
    pub async fn list_users(&self) -> DomainResult<Vec<UserSummary>> {
        self.repo.list_users().await
    }

    // ── Helpers ─────────────────────────────────────────────────

    async fn hash(&self, password: String) -> DomainResult<String> {
        let cost = self.hash_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| DomainError::Internal(format!("Password hashing task failed: {}", e)))?
            .map_err(|e| DomainError::Internal(format!("Failed to hash password: {}", e)))
    }
}
