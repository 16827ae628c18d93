//! # Cart Repository
//!
//! Database operations for shopping carts.
//!
//! ## Whole-Cart Persistence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    upsert(cart) Flow                                    │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── INSERT carts ... ON CONFLICT (id) DO UPDATE updated_at          │
//! │    │                                                                    │
//! │    ├── DELETE FROM cart_items WHERE cart_id = $1                       │
//! │    │                                                                    │
//! │    ├── INSERT cart_items (one row per line, position = index)          │
//! │    │                                                                    │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  The cart aggregate is written as a whole: the mutation engine edits    │
//! │  the item sequence in memory and hands the full cart back. There is     │
//! │  no per-item patching and no cascade machinery - ownership of the       │
//! │  items is explicit and lives with the cart.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::debug;

use crate::error::DbResult;
use mercato_core::{Cart, CartItem};

/// Row type for the carts table.
#[derive(Debug, sqlx::FromRow)]
struct CartRow {
    id: String,
    customer_id: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Row type for the cart_items table.
#[derive(Debug, sqlx::FromRow)]
struct CartItemRow {
    id: String,
    product_id: i64,
    quantity: i64,
    added_at: DateTime<Utc>,
}

impl From<CartItemRow> for CartItem {
    fn from(row: CartItemRow) -> Self {
        CartItem {
            id: row.id,
            product_id: row.product_id,
            quantity: row.quantity,
            added_at: row.added_at,
        }
    }
}

/// Repository for cart database operations.
#[derive(Debug, Clone)]
pub struct CartRepository {
    pool: PgPool,
}

impl CartRepository {
    /// Creates a new CartRepository.
    pub fn new(pool: PgPool) -> Self {
        CartRepository { pool }
    }

    /// Looks up a customer's cart, items in insertion order.
    ///
    /// Returns `None` when the customer has no cart yet; lazy creation is
    /// the mutation engine's decision, not the repository's.
    pub async fn find_by_customer_id(&self, customer_id: &str) -> DbResult<Option<Cart>> {
        let cart_row = sqlx::query_as::<_, CartRow>(
            r#"
            SELECT id, customer_id, created_at, updated_at
            FROM carts
            WHERE customer_id = $1
            "#,
        )
        .bind(customer_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(cart_row) = cart_row else {
            return Ok(None);
        };

        let item_rows = sqlx::query_as::<_, CartItemRow>(
            r#"
            SELECT id, product_id, quantity, added_at
            FROM cart_items
            WHERE cart_id = $1
            ORDER BY position
            "#,
        )
        .bind(&cart_row.id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Cart {
            id: cart_row.id,
            customer_id: cart_row.customer_id,
            items: item_rows.into_iter().map(CartItem::from).collect(),
            created_at: cart_row.created_at,
            updated_at: cart_row.updated_at,
        }))
    }

    /// Persists the whole cart transactionally.
    ///
    /// Creates the cart row on first write; rewrites the item sequence on
    /// every call. Item `position` preserves insertion order across reads.
    pub async fn upsert(&self, cart: &Cart) -> DbResult<()> {
        debug!(
            cart_id = %cart.id,
            customer_id = %cart.customer_id,
            items = cart.items.len(),
            "Persisting cart"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO carts (id, customer_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (id) DO UPDATE SET
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&cart.id)
        .bind(&cart.customer_id)
        .bind(cart.created_at)
        .bind(cart.updated_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            DELETE FROM cart_items WHERE cart_id = $1
            "#,
        )
        .bind(&cart.id)
        .execute(&mut *tx)
        .await?;

        for (position, item) in cart.items.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO cart_items (id, cart_id, product_id, quantity, position, added_at)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(&item.id)
            .bind(&cart.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(position as i32)
            .bind(item.added_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}
