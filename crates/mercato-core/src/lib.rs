//! # mercato-core: Pure Business Logic for Mercato
//!
//! This crate is the **heart** of Mercato. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Mercato Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────┐                      ┌─────────────────┐          │
//! │  │  identity-api   │                      │    cart-api     │          │
//! │  │  register/login │── signed token ─────►│  cart mutations │          │
//! │  └────────┬────────┘   (HTTP Bearer)      └────────┬────────┘          │
//! │           │                                        │                    │
//! │  ┌────────▼────────────────────────────────────────▼────────┐          │
//! │  │              ★ mercato-core (THIS CRATE) ★               │          │
//! │  │                                                          │          │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────────────┐   │          │
//! │  │   │   types   │  │   cart    │  │    validation     │   │          │
//! │  │   │  Account  │  │   Cart    │  │      rules        │   │          │
//! │  │   │ CartEvent │  │ CartItem  │  │     checks        │   │          │
//! │  │   └───────────┘  └───────────┘  └───────────────────┘   │          │
//! │  │                                                          │          │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS    │          │
//! │  └──────────────────────────────────────────────────────────┘          │
//! │           │                                        │                    │
//! │  ┌────────▼────────┐                      ┌────────▼────────┐          │
//! │  │   mercato-db    │                      │  redis pub/sub  │          │
//! │  │   PostgreSQL    │                      │  "cart-events"  │          │
//! │  └─────────────────┘                      └─────────────────┘          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Account, CartEvent, etc.)
//! - [`cart`] - Cart aggregate and its mutation rules
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic given its inputs
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Explicit Ownership**: A cart owns its items; mutations are explicit
//!    sequence edits followed by a whole-cart persistence call upstream
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use mercato_core::Cart` instead of
// `use mercato_core::cart::Cart`

pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Topic name that cart domain events are published to.
///
/// ## Why a constant?
/// The cart service publishes here and external consumers subscribe here;
/// drifting the two apart silently drops every event.
pub const CART_EVENTS_TOPIC: &str = "cart-events";

/// Maximum items allowed in a single cart
///
/// ## Business Reason
/// Prevents runaway carts and ensures reasonable order sizes.
/// Can be made configurable per-tenant in future versions.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single item in cart
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;
