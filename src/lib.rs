//! # User Service
//!
//! HTTP service for managing user accounts and their role assignments,
//! backed by a relational store.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: User and Role entities, DTOs and the repository trait
//! - **application**: `UserService` use cases
//! - **infrastructure**: SeaORM persistence, in-memory store, password hashing
//! - **interfaces**: REST API with OpenAPI documentation
//! - **support**: errors and shutdown coordination
//! - **server**: process lifecycle shared by binaries and tests

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository, SeaOrmUserRepository};

// Re-export API router
pub use interfaces::create_api_router;
