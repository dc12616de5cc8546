//! HTTP feature modules: one directory per resource, plus shared middleware

pub mod health;
pub mod metrics;
pub mod request_id;
pub mod users;
