//! Identity module: user management
//!
//! Contains the `UserService` which orchestrates all user-related
//! use-cases: registration, lookup, profile and role updates, removal.

pub mod service;

pub use service::UserService;
