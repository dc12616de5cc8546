//! In-memory user repository

use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::domain::{
    DomainError, DomainResult, NewUser, Role, User, UserChanges, UserRepositoryInterface,
    UserSummary,
};

struct StoredUser {
    name: String,
    password_hash: String,
    roles: Vec<Role>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl StoredUser {
    fn to_domain(&self, login: &str) -> User {
        User {
            login: login.to_string(),
            name: self.name.clone(),
            roles: self.roles.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// In-memory storage for development and testing
pub struct InMemoryUserRepository {
    users: DashMap<String, StoredUser>,
    /// role name -> role id
    roles: DashMap<String, i32>,
    role_counter: AtomicI32,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: DashMap::new(),
            roles: DashMap::new(),
            role_counter: AtomicI32::new(1),
        }
    }

    /// Number of distinct roles ever created.
    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// Stored credential hash for a login, if the user exists.
    pub fn password_hash(&self, login: &str) -> Option<String> {
        self.users.get(login).map(|u| u.password_hash.clone())
    }

    fn resolve_roles(&self, names: &[String]) -> Vec<Role> {
        let mut resolved: Vec<Role> = Vec::with_capacity(names.len());
        for name in names {
            let id = *self
                .roles
                .entry(name.clone())
                .or_insert_with(|| self.role_counter.fetch_add(1, Ordering::SeqCst));
            if !resolved.iter().any(|r| r.id == id) {
                resolved.push(Role {
                    id,
                    name: name.clone(),
                });
            }
        }
        resolved.sort_by_key(|r| r.id);
        resolved
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepositoryInterface for InMemoryUserRepository {
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>> {
        Ok(self.users.get(login).map(|u| u.to_domain(login)))
    }

    async fn list_users(&self) -> DomainResult<Vec<UserSummary>> {
        let mut users: Vec<UserSummary> = self
            .users
            .iter()
            .map(|entry| UserSummary {
                login: entry.key().clone(),
                name: entry.value().name.clone(),
            })
            .collect();
        users.sort_by(|a, b| a.login.cmp(&b.login));
        Ok(users)
    }

    async fn create_user(&self, new_user: NewUser) -> DomainResult<User> {
        match self.users.entry(new_user.login.clone()) {
            Entry::Occupied(_) => Err(DomainError::Conflict(format!(
                "User with login '{}' already exists",
                new_user.login
            ))),
            Entry::Vacant(slot) => {
                let now = Utc::now();
                let stored = StoredUser {
                    name: new_user.name,
                    password_hash: new_user.password_hash,
                    roles: self.resolve_roles(&new_user.roles),
                    created_at: now,
                    updated_at: now,
                };
                let user = stored.to_domain(&new_user.login);
                slot.insert(stored);
                Ok(user)
            }
        }
    }

    async fn update_user(&self, login: &str, changes: UserChanges) -> DomainResult<Option<User>> {
        let Some(mut stored) = self.users.get_mut(login) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            stored.name = name;
        }
        if let Some(names) = changes.roles {
            stored.roles = self.resolve_roles(&names);
        }
        stored.updated_at = Utc::now();

        Ok(Some(stored.to_domain(login)))
    }

    async fn delete_user(&self, login: &str) -> DomainResult<()> {
        self.users
            .remove(login)
            .map(|_| ())
            .ok_or_else(|| DomainError::user_not_found(login))
    }
}
