//! Password hashing utilities

use bcrypt::{hash, DEFAULT_COST};

/// Default bcrypt work factor
pub const DEFAULT_HASH_COST: u32 = DEFAULT_COST;

/// Hash a password using bcrypt with the given cost (4..=31)
pub fn hash_password(password: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(password, cost)
}
