//! JWT claims, codec, issuer, and validator.
//!
//! ## Separation of Concerns
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  ClaimsCodec        signature authenticity only (NEVER expiry)          │
//! │       ▲  ▲                                                              │
//! │       │  │                                                              │
//! │  TokenIssuer        stamps exp = now + TTL, encodes                     │
//! │       │                                                                 │
//! │  TokenValidator     decodes, then applies the expiry POLICY             │
//! │                                                                         │
//! │  Keeping expiry out of the codec keeps "is this token authentic"        │
//! │  separate from "is this token still acceptable".                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operational Invariant
//! Both services MUST be configured with the identical `JWT_SECRET`. There
//! is no handshake that detects a mismatch: the only symptom is that every
//! token the other service minted is rejected as `SignatureInvalid`.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, AuthResult};

// =============================================================================
// Claims
// =============================================================================

/// The fixed claim set carried inside a token.
///
/// Deliberately a closed struct, not an open claim map: these three fields
/// are the only claims either service ever consumes. Immutable once minted;
/// deserialized and discarded per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the login username.
    pub sub: String,

    /// Stable public customer identifier - the cart partition key.
    #[serde(rename = "customerId")]
    pub customer_id: String,

    /// Expiry (Unix timestamp, seconds). Always issue-time + fixed TTL.
    pub exp: i64,
}

// =============================================================================
// Claims Codec
// =============================================================================

/// Encodes and decodes signed tokens (HS256).
///
/// Built once at startup from process-wide configuration; immutable
/// afterwards. Signature comparison is constant-time (delegated to the
/// jsonwebtoken backend).
#[derive(Clone)]
pub struct ClaimsCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl ClaimsCodec {
    /// Creates a codec from the shared signing secret.
    pub fn new(secret: &str) -> Self {
        ClaimsCodec {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Serializes and signs a claim set.
    ///
    /// Deterministic given identical claims and secret.
    pub fn encode(&self, claims: &Claims) -> AuthResult<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AuthError::Internal(format!("Failed to encode token: {}", e)))
    }

    /// Verifies the signature and deserializes the claims.
    ///
    /// Never checks expiry: that is the validator's policy decision, not a
    /// property of token authenticity.
    pub fn decode(&self, token: &str) -> AuthResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => {
                    AuthError::SignatureInvalid
                }
                _ => AuthError::Malformed,
            })
    }
}

impl std::fmt::Debug for ClaimsCodec {
    // Keys stay out of debug output
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClaimsCodec").finish_non_exhaustive()
    }
}

// =============================================================================
// Token Issuer
// =============================================================================

/// Mints tokens for verified customers.
///
/// Called only after the credential check has passed; performs no credential
/// verification itself.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: ClaimsCodec,
    ttl_secs: i64,
}

impl TokenIssuer {
    /// Creates an issuer with a fixed token lifetime.
    pub fn new(codec: ClaimsCodec, ttl_secs: i64) -> Self {
        TokenIssuer { codec, ttl_secs }
    }

    /// Mints a token with `exp = now + TTL`.
    pub fn issue(&self, username: &str, customer_id: &str) -> AuthResult<String> {
        let exp = Utc::now() + Duration::seconds(self.ttl_secs);

        let claims = Claims {
            sub: username.to_string(),
            customer_id: customer_id.to_string(),
            exp: exp.timestamp(),
        };

        self.codec.encode(&claims)
    }
}

// =============================================================================
// Token Validator
// =============================================================================

/// The authenticated caller extracted from a valid token.
///
/// This value is threaded explicitly through the request path as an ordinary
/// argument - there is no ambient security context to consult.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCustomer {
    /// Stable public customer identifier from the token's claims.
    pub customer_id: String,
}

/// Validates bearer tokens and extracts the caller's customer identifier.
///
/// No network or storage call: validation is recomputing the signature and
/// checking the expiry instant locally. The flip side is that there is no
/// revocation - an issued token is accepted for its full TTL.
#[derive(Debug, Clone)]
pub struct TokenValidator {
    codec: ClaimsCodec,
}

impl TokenValidator {
    /// Creates a validator over the shared codec.
    pub fn new(codec: ClaimsCodec) -> Self {
        TokenValidator { codec }
    }

    /// Validates signature and expiry, returning the authenticated customer.
    ///
    /// The error distinguishes `Malformed` / `SignatureInvalid` / `Expired`
    /// for logging; the HTTP boundary collapses all of them into one 401.
    pub fn validate(&self, token: &str) -> AuthResult<AuthenticatedCustomer> {
        let claims = self.codec.decode(token)?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(AuthenticatedCustomer {
            customer_id: claims.customer_id,
        })
    }
}

// =============================================================================
// Bearer Header Parsing
// =============================================================================

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header.strip_prefix("Bearer ")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret";

    fn codec() -> ClaimsCodec {
        ClaimsCodec::new(SECRET)
    }

    #[test]
    fn test_token_roundtrip() {
        let issuer = TokenIssuer::new(codec(), 3600);

        let token = issuer.issue("alice", "cust-0001").unwrap();
        let claims = codec().decode(&token).unwrap();

        assert_eq!(claims.sub, "alice");
        assert_eq!(claims.customer_id, "cust-0001");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_encode_is_deterministic() {
        let claims = Claims {
            sub: "alice".to_string(),
            customer_id: "cust-0001".to_string(),
            exp: 4_102_444_800, // fixed instant
        };

        let a = codec().encode(&claims).unwrap();
        let b = codec().encode(&claims).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_validator_accepts_fresh_token() {
        let issuer = TokenIssuer::new(codec(), 3600);
        let validator = TokenValidator::new(codec());

        let token = issuer.issue("alice", "cust-0001").unwrap();
        let customer = validator.validate(&token).unwrap();

        assert_eq!(customer.customer_id, "cust-0001");
    }

    #[test]
    fn test_validator_rejects_expired_token() {
        // TTL of -1s puts exp in the past at mint time
        let issuer = TokenIssuer::new(codec(), -1);
        let validator = TokenValidator::new(codec());

        let token = issuer.issue("alice", "cust-0001").unwrap();
        let err = validator.validate(&token).unwrap_err();

        assert!(matches!(err, AuthError::Expired));
    }

    #[test]
    fn test_decode_ignores_expiry() {
        // The codec answers "authentic?", not "still acceptable?"
        let issuer = TokenIssuer::new(codec(), -1);

        let token = issuer.issue("alice", "cust-0001").unwrap();
        let claims = codec().decode(&token).unwrap();

        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_decode_rejects_wrong_secret() {
        let issuer = TokenIssuer::new(codec(), 3600);
        let other = ClaimsCodec::new("a-different-secret");

        let token = issuer.issue("alice", "cust-0001").unwrap();
        let err = other.decode(&token).unwrap_err();

        assert!(matches!(err, AuthError::SignatureInvalid));
    }

    #[test]
    fn test_decode_rejects_tampered_payload() {
        let issuer = TokenIssuer::new(codec(), 3600);
        let token = issuer.issue("alice", "cust-0001").unwrap();

        // Flip one character inside the payload segment
        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        assert_eq!(parts.len(), 3);
        let payload = &parts[1];
        let flipped = if payload.starts_with('A') { "B" } else { "A" };
        parts[1] = format!("{}{}", flipped, &payload[1..]);
        let tampered = parts.join(".");

        let err = codec().decode(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::SignatureInvalid));
    }

    #[test]
    fn test_decode_rejects_tampered_signature() {
        let issuer = TokenIssuer::new(codec(), 3600);
        let token = issuer.issue("alice", "cust-0001").unwrap();

        let mut parts: Vec<String> = token.split('.').map(String::from).collect();
        let sig = &parts[2];
        let flipped = if sig.starts_with('A') { "B" } else { "A" };
        parts[2] = format!("{}{}", flipped, &sig[1..]);
        let tampered = parts.join(".");

        let err = codec().decode(&tampered).unwrap_err();
        assert!(matches!(err, AuthError::SignatureInvalid));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let err = codec().decode("not-a-token").unwrap_err();
        assert!(matches!(err, AuthError::Malformed));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token(""), None);
    }
}
