//! Authentication error types.
//!
//! ## Boundary Behavior
//! `Malformed`, `SignatureInvalid`, and `Expired` are distinguishable here so
//! the services can log the real cause, but the HTTP layer collapses all
//! three into one 401 outcome. Clients never learn WHY a token was rejected.
//! `AuthenticationFailed` likewise never reveals which of username/password
//! was wrong.

use thiserror::Error;

/// Authentication and credential errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Token structure cannot be parsed (not three parts, bad base64,
    /// payload is not valid claims JSON).
    #[error("Malformed token")]
    Malformed,

    /// Token parsed but the signature does not match the payload. Happens
    /// on tampering and whenever the two services disagree on the secret.
    #[error("Invalid token signature")]
    SignatureInvalid,

    /// Token is authentic but past its expiry instant.
    #[error("Token expired")]
    Expired,

    /// Credentials did not match. Deliberately carries no detail about
    /// which part failed.
    #[error("Invalid username or password")]
    AuthenticationFailed,

    /// Unexpected internal failure (hashing backend, claim serialization).
    #[error("Internal auth error: {0}")]
    Internal(String),
}

/// Result type for authentication operations.
pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authentication_failed_leaks_nothing() {
        // One message for both "no such user" and "wrong password"
        assert_eq!(
            AuthError::AuthenticationFailed.to_string(),
            "Invalid username or password"
        );
    }
}
