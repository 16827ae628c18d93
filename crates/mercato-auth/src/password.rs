//! One-way credential hashing and verification (Argon2id).
//!
//! The identity service stores only the PHC-format hash string; the raw
//! password exists in memory for the duration of one request. Verification
//! failure and unknown-user lookups both surface as the same
//! `AuthenticationFailed` upstream, so a caller cannot probe which one
//! happened.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::{AuthError, AuthResult};

/// Hashes a raw password into a PHC-format string (salt included).
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Internal(format!("Failed to hash password: {}", e)))
}

/// Verifies a raw password against a stored PHC-format hash.
///
/// Returns `AuthenticationFailed` on mismatch. An unparseable stored hash is
/// an internal error - it means the accounts table is corrupt, not that the
/// caller got the password wrong.
pub fn verify_password(password: &str, stored_hash: &str) -> AuthResult<()> {
    let parsed = PasswordHash::new(stored_hash)
        .map_err(|e| AuthError::Internal(format!("Stored password hash is invalid: {}", e)))?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AuthError::AuthenticationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("correct horse battery staple").unwrap();

        assert!(verify_password("correct horse battery staple", &hash).is_ok());
    }

    #[test]
    fn test_wrong_password_fails() {
        let hash = hash_password("correct horse battery staple").unwrap();

        let err = verify_password("Tr0ub4dor&3", &hash).unwrap_err();
        assert!(matches!(err, AuthError::AuthenticationFailed));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();

        // Fresh salt per hash; equal inputs must not produce equal hashes
        assert_ne!(a, b);
    }

    #[test]
    fn test_corrupt_stored_hash_is_internal_error() {
        let err = verify_password("anything", "not-a-phc-string").unwrap_err();
        assert!(matches!(err, AuthError::Internal(_)));
    }
}
