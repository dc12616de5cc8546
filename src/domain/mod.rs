//! Domain layer - core entities, DTOs and repository traits

pub mod user;

pub use user::{
    distinct_role_names, CreateUserDto, NewUser, Role, UpdateUserDto, User, UserChanges,
    UserRepositoryInterface, UserSummary,
};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
