use bcrypt::{hash, verify, BcryptError};
use tracing::warn;

pub const HASH_COST: u32 = 12;

pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, HASH_COST)
}

/// A malformed stored hash counts as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    match verify(password, password_hash) {
        Ok(matches) => matches,
        Err(e) => {
            warn!("Failed to verify password hash: {}", e);
            false
        }
    }
}
