//! # mercato-db: Database Layer for Mercato
//!
//! This crate provides database access for both Mercato services.
//! It uses PostgreSQL with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Data Flow                                │
//! │                                                                         │
//! │  HTTP handler (identity-api / cart-api)                                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    mercato-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌─────────────┐  │   │
//! │  │   │   Database    │    │  Repositories  │    │ Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  (store/*.rs)  │    │ (embedded)  │  │   │
//! │  │   │               │    │                │    │             │  │   │
//! │  │   │ PgPool        │◄───│ AccountRepo    │    │ 0001_*.sql  │  │   │
//! │  │   │ Connection    │    │ CartRepo       │    │ 0002_*.sql  │  │   │
//! │  │   │ Management    │    │                │    │             │  │   │
//! │  │   └───────────────┘    └────────────────┘    └─────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                        PostgreSQL                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and migrations
//! - [`error`] - Database error types
//! - [`store`] - Repository implementations (account, cart)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use mercato_db::Database;
//!
//! let db = Database::connect("postgres://...").await?;
//! db.run_migrations().await?;
//!
//! let cart = db.carts().find_by_customer_id("cust-0001").await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod pool;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::Database;
pub use store::account::AccountRepository;
pub use store::cart::CartRepository;
