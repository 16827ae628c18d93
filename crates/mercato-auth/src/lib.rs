//! # mercato-auth: Stateless Authentication Contract
//!
//! Token minting, token validation, and credential hashing for Mercato.
//!
//! ## The Inter-Service Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stateless Token Flow                                 │
//! │                                                                         │
//! │   identity-api process              cart-api process                    │
//! │  ┌──────────────────┐             ┌────────────────────┐               │
//! │  │  verify password │             │  TokenValidator    │               │
//! │  │        │         │             │  ├── decode        │               │
//! │  │        ▼         │   Bearer    │  ├── check expiry  │               │
//! │  │  TokenIssuer     │── token ───►│  └── customer id   │               │
//! │  │  └── encode      │  (client    │                    │               │
//! │  └──────────────────┘   carries   └────────────────────┘               │
//! │                         it)                                             │
//! │                                                                         │
//! │  No round trip between the services: validation is recomputing the      │
//! │  signature locally. Works only because both processes are configured    │
//! │  with the IDENTICAL secret — an operational invariant, not code.        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`token`] - Claims, codec, issuer, validator
//! - [`password`] - One-way credential hashing and verification
//! - [`error`] - Authentication error types
//!
//! ## What This Crate Does NOT Do
//!
//! - No revocation: an issued token stays valid for its full TTL, even
//!   after a password change. Stateless auth trades instant revocation for
//!   service independence.
//! - No refresh protocol, no role model, no key rotation.

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod password;
pub mod token;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{AuthError, AuthResult};
pub use password::{hash_password, verify_password};
pub use token::{
    extract_bearer_token, AuthenticatedCustomer, Claims, ClaimsCodec, TokenIssuer, TokenValidator,
};
