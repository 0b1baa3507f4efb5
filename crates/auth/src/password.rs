//! Credential hashing and verification.
//!
//! bcrypt with a per-hash random salt: hashing the same plaintext twice
//! yields different stored values, and each verifies against the original.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to hash credential")]
    Hash(#[source] bcrypt::BcryptError),
}

/// Hash a plaintext credential with a fresh random salt.
pub fn hash(plain: &str) -> Result<String, CredentialError> {
    bcrypt::hash(plain, bcrypt::DEFAULT_COST).map_err(CredentialError::Hash)
}

/// Verify a plaintext credential against a stored hash.
///
/// The comparison runs in constant time. Mismatch and malformed hash both
/// come back as `false`; callers decide the user-facing error, and nothing
/// about the plaintext or the hash is logged or returned.
pub fn verify(plain: &str, hashed: &str) -> bool {
    bcrypt::verify(plain, hashed).unwrap_or(false)
}
