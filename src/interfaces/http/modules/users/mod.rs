//! Users module: user CRUD keyed by login

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
