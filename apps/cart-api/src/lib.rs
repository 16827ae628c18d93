//! # cart-api
//!
//! HTTP service that validates bearer tokens and mutates per-customer
//! shopping carts, publishing a domain event after every mutation.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           cart-api                                      │
//! │                                                                         │
//! │  Client ──Bearer token──► auth extractor ──► routes ──► CartEngine     │
//! │                           (TokenValidator)                 │            │
//! │                                                ┌───────────┴───────┐   │
//! │                                                ▼                   ▼   │
//! │                                           CartStore         EventPublisher
//! │                                          (PostgreSQL)      (Redis pub/sub)
//! │                                                                         │
//! │  Every mutation: lock customer → load cart → mutate → persist →        │
//! │  publish exactly one event. ItemNotFound persists and publishes        │
//! │  nothing.                                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_PORT` - listen port (default: 8082)
//! - `DATABASE_URL` - PostgreSQL connection string
//! - `REDIS_URL` - Redis connection string for the event channel
//! - `JWT_SECRET` - shared signing secret (MUST match identity-api)

pub mod auth;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod routes;

// Re-exports
pub use config::CartConfig;
pub use engine::{CartEngine, CartStore, EngineError};
pub use error::ApiError;
pub use events::{EventPublisher, PublishError, RedisEventPublisher};
