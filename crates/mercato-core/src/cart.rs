//! # Cart Aggregate
//!
//! The per-customer shopping cart and its mutation rules.
//!
//! ## Ownership Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Cart Ownership                                    │
//! │                                                                         │
//! │   CartStore ──owns──► Cart ──owns──► Vec<CartItem>                      │
//! │                                                                         │
//! │   The mutation engine borrows a Cart for the duration of ONE            │
//! │   operation, applies an explicit sequence edit here, and hands the      │
//! │   whole cart back to the store for persistence. There is no cascade     │
//! │   machinery: removing an item is `Vec::remove`, nothing else.           │
//! │                                                                         │
//! │   Item identity (`CartItem.id`) is unique only within its parent        │
//! │   cart. Items never move between carts.                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - One cart per `customer_id`; created lazily on first access
//! - `quantity >= 1` for every item present in a cart (zero and negative
//!   quantities are rejected upstream by [`crate::validation::validate_quantity`])
//! - Items form an ordered sequence; each `add_item` appends a new line with
//!   a freshly assigned id, so the same product may appear on multiple lines

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

// =============================================================================
// Cart Item
// =============================================================================

/// A line in a shopping cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line identifier (UUID v4), assigned when the line is appended.
    pub id: String,

    /// The product this line refers to.
    pub product_id: i64,

    /// Quantity in cart. Always >= 1.
    pub quantity: i64,

    /// When this line was appended.
    pub added_at: DateTime<Utc>,
}

impl CartItem {
    /// Creates a new cart line with a fresh id.
    pub fn new(product_id: i64, quantity: i64) -> Self {
        CartItem {
            id: Uuid::new_v4().to_string(),
            product_id,
            quantity,
            added_at: Utc::now(),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// A customer's shopping cart.
///
/// ## Lifecycle
/// Created lazily the first time a customer's cart is accessed. Owned by the
/// cart store; borrowed per operation by the mutation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// The customer this cart belongs to. One cart per customer.
    pub customer_id: String,

    /// Ordered sequence of lines.
    pub items: Vec<CartItem>,

    /// When the cart was created.
    pub created_at: DateTime<Utc>,

    /// When the cart was last mutated.
    pub updated_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart for a customer.
    pub fn new(customer_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Cart {
            id: Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a new line to the cart.
    ///
    /// ## Behavior
    /// Every call appends a fresh line with its own id, even when the same
    /// product is already in the cart. Merging lines is a client concern.
    ///
    /// ## Returns
    /// The appended line on success; `CartTooLarge` / `QuantityTooLarge`
    /// when a structural limit would be exceeded.
    pub fn add_item(&mut self, product_id: i64, quantity: i64) -> CoreResult<&CartItem> {
        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }

        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items.push(CartItem::new(product_id, quantity));
        let index = self.items.len() - 1;
        self.touch();

        Ok(&self.items[index])
    }

    /// Sets the quantity of an existing line.
    ///
    /// ## Returns
    /// The updated line on success; `ItemNotFound` when no line with
    /// `item_id` exists. A not-found outcome leaves the sequence untouched.
    pub fn update_item(&mut self, item_id: &str, quantity: i64) -> CoreResult<&CartItem> {
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::item_not_found(item_id))?;

        self.items[index].quantity = quantity;
        self.touch();

        Ok(&self.items[index])
    }

    /// Deletes a line from the cart.
    ///
    /// ## Returns
    /// The removed line on success; `ItemNotFound` when no line with
    /// `item_id` exists.
    pub fn remove_item(&mut self, item_id: &str) -> CoreResult<CartItem> {
        let index = self
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| CoreError::item_not_found(item_id))?;

        let removed = self.items.remove(index);
        self.touch();
        Ok(removed)
    }

    /// Empties the cart. Succeeds even when the cart is already empty.
    pub fn clear(&mut self) {
        self.items.clear();
        self.touch();
    }

    /// Looks up a line by id.
    pub fn item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|i| i.id == item_id)
    }

    /// Returns the number of lines in the cart.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total quantity across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_item_appends_line() {
        let mut cart = Cart::new("cust-1");

        let item_id = cart.add_item(42, 2).unwrap().id.clone();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.total_quantity(), 2);
        let item = cart.item(&item_id).unwrap();
        assert_eq!(item.product_id, 42);
        assert_eq!(item.quantity, 2);
    }

    #[test]
    fn test_add_same_product_twice_keeps_two_lines() {
        let mut cart = Cart::new("cust-1");

        let first = cart.add_item(42, 1).unwrap().id.clone();
        let second = cart.add_item(42, 3).unwrap().id.clone();

        // Two distinct lines with distinct ids, not a merged quantity
        assert_ne!(first, second);
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_add_item_rejects_oversized_cart() {
        let mut cart = Cart::new("cust-1");
        for product_id in 0..MAX_CART_ITEMS as i64 {
            cart.add_item(product_id, 1).unwrap();
        }

        let err = cart.add_item(9999, 1).unwrap_err();
        assert!(matches!(err, CoreError::CartTooLarge { .. }));
    }

    #[test]
    fn test_update_item_sets_quantity() {
        let mut cart = Cart::new("cust-1");
        let item_id = cart.add_item(42, 1).unwrap().id.clone();

        let updated = cart.update_item(&item_id, 5).unwrap();

        assert_eq!(updated.quantity, 5);
        assert_eq!(cart.item_count(), 1);
    }

    #[test]
    fn test_update_missing_item_leaves_cart_untouched() {
        let mut cart = Cart::new("cust-1");
        cart.add_item(42, 2).unwrap();
        let before = cart.items.clone();

        let err = cart.update_item("no-such-item", 5).unwrap_err();

        assert!(matches!(err, CoreError::ItemNotFound { .. }));
        assert_eq!(cart.items, before);
    }

    #[test]
    fn test_remove_item_twice_fails_second_time() {
        let mut cart = Cart::new("cust-1");
        let item_id = cart.add_item(42, 2).unwrap().id.clone();

        let removed = cart.remove_item(&item_id).unwrap();
        assert_eq!(removed.product_id, 42);
        assert!(cart.is_empty());

        let err = cart.remove_item(&item_id).unwrap_err();
        assert!(matches!(err, CoreError::ItemNotFound { .. }));
    }

    #[test]
    fn test_clear_on_empty_cart_succeeds() {
        let mut cart = Cart::new("cust-1");
        assert!(cart.is_empty());

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_items_keep_insertion_order() {
        let mut cart = Cart::new("cust-1");
        cart.add_item(1, 1).unwrap();
        cart.add_item(2, 1).unwrap();
        cart.add_item(3, 1).unwrap();

        let products: Vec<i64> = cart.items.iter().map(|i| i.product_id).collect();
        assert_eq!(products, vec![1, 2, 3]);
    }
}
