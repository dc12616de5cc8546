//! HTTP REST API interfaces
//!
//! - `common`: error envelope and the validating JSON extractor
//! - `modules`: handlers and DTOs per resource, plus middleware
//! - `router`: API router with OpenAPI documentation

pub mod common;
pub mod modules;
pub mod router;

pub use router::{create_api_router, ApiDoc};
