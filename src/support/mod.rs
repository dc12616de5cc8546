pub mod errors;
pub mod shutdown;

pub use errors::{ConfigError, DomainError, DomainResult};
