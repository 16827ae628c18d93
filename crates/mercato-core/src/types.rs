//! # Domain Types
//!
//! Core domain types shared by both Mercato services.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Account      │   │      Cart       │   │   CartEvent     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  event_type     │       │
//! │  │  customer_id    │   │  customer_id    │   │  cart_id        │       │
//! │  │  username       │   │  items          │   │  product_id?    │       │
//! │  │  password_hash  │   │  (see cart.rs)  │   │                 │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐                                                   │
//! │  │ CartEventType   │                                                   │
//! │  │  ─────────────  │                                                   │
//! │  │  ItemAdded      │                                                   │
//! │  │  ItemUpdated    │                                                   │
//! │  │  ItemRemoved    │                                                   │
//! │  │  CartCleared    │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Entities carry:
//! - `id`: UUID v4 - immutable, used for database relations
//! - Business key: (`customer_id`, `username`) - the externally visible handle

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Account
// =============================================================================

/// A registered customer account.
///
/// Owned by the identity service. `username` is the login handle; the
/// `customer_id` is the stable public identifier carried in tokens and used
/// as the cart partition key. The two are deliberately distinct so the login
/// name can change without orphaning carts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stable public identifier, unique across accounts.
    pub customer_id: String,

    /// Login name, unique across accounts.
    pub username: String,

    /// One-way hash of the password. Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,

    /// When the account was created.
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Cart Events
// =============================================================================

/// The kind of cart mutation an event describes.
///
/// Serialized as the PascalCase variant name (`"ItemAdded"`), which is the
/// wire shape consumers of the cart-events topic expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEventType {
    /// A new line was appended to the cart.
    ItemAdded,
    /// An existing line's quantity changed.
    ItemUpdated,
    /// A line was deleted from the cart.
    ItemRemoved,
    /// The whole cart was emptied.
    CartCleared,
}

/// An immutable notification describing one completed cart mutation.
///
/// Created once per successful mutation, published to the cart-events topic,
/// never persisted by this system. `product_id` is `None` only for
/// [`CartEventType::CartCleared`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEvent {
    /// What happened.
    pub event_type: CartEventType,

    /// The cart the mutation applied to.
    pub cart_id: String,

    /// The product the mutation touched, when there is one.
    pub product_id: Option<i64>,
}

impl CartEvent {
    /// Event for a newly appended cart line.
    pub fn item_added(cart_id: impl Into<String>, product_id: i64) -> Self {
        CartEvent {
            event_type: CartEventType::ItemAdded,
            cart_id: cart_id.into(),
            product_id: Some(product_id),
        }
    }

    /// Event for a quantity change on an existing line.
    pub fn item_updated(cart_id: impl Into<String>, product_id: i64) -> Self {
        CartEvent {
            event_type: CartEventType::ItemUpdated,
            cart_id: cart_id.into(),
            product_id: Some(product_id),
        }
    }

    /// Event for a deleted cart line.
    pub fn item_removed(cart_id: impl Into<String>, product_id: i64) -> Self {
        CartEvent {
            event_type: CartEventType::ItemRemoved,
            cart_id: cart_id.into(),
            product_id: Some(product_id),
        }
    }

    /// Event for an emptied cart. Emitted even when the cart was already
    /// empty.
    pub fn cart_cleared(cart_id: impl Into<String>) -> Self {
        CartEvent {
            event_type: CartEventType::CartCleared,
            cart_id: cart_id.into(),
            product_id: None,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_constructors() {
        let event = CartEvent::item_added("cart-1", 42);
        assert_eq!(event.event_type, CartEventType::ItemAdded);
        assert_eq!(event.cart_id, "cart-1");
        assert_eq!(event.product_id, Some(42));

        let event = CartEvent::cart_cleared("cart-1");
        assert_eq!(event.event_type, CartEventType::CartCleared);
        assert_eq!(event.product_id, None);
    }

    #[test]
    fn test_event_wire_shape() {
        let event = CartEvent::item_added("cart-1", 42);
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["eventType"], "ItemAdded");
        assert_eq!(json["cartId"], "cart-1");
        assert_eq!(json["productId"], 42);
    }

    #[test]
    fn test_account_hides_password_hash() {
        let account = Account {
            id: "a1".to_string(),
            customer_id: "cust-1".to_string(),
            username: "alice".to_string(),
            password_hash: "$argon2id$...".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("alice"));
    }
}
