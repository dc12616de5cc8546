//! Service and database liveness

pub mod handlers;

pub use handlers::*;
