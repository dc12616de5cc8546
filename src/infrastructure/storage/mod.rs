//! Non-relational repository implementations

mod memory;

pub use memory::InMemoryUserRepository;
