//! # identity-api
//!
//! HTTP service that registers accounts and issues signed bearer tokens.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         identity-api                                    │
//! │                                                                         │
//! │  Client ───► HTTP (axum) ───► IdentityService ───► PostgreSQL          │
//! │                                     │                                   │
//! │                                     ▼                                   │
//! │                               TokenIssuer                               │
//! │                            (mercato-auth)                               │
//! │                                                                         │
//! │  Login flow: find account → verify argon2 hash → mint token            │
//! │  Register flow: validate → duplicate checks → hash → insert            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - listen port (default: 8081)
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `JWT_SECRET` - shared signing secret (MUST match cart-api)
//! - `TOKEN_TTL_SECS` - token lifetime (default: 3600)

pub mod config;
pub mod error;
pub mod routes;
pub mod service;

// Re-exports
pub use config::IdentityConfig;
pub use error::ApiError;
pub use service::{AccountStore, IdentityService};
