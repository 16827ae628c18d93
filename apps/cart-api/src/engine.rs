//! # Cart Mutation Engine
//!
//! Applies cart operations against the store and publishes one domain event
//! per successful mutation.
//!
//! ## Per-Customer Serialization
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  The Lost-Update Hazard                                 │
//! │                                                                         │
//! │  Without serialization, two concurrent adds for one customer:          │
//! │                                                                         │
//! │    Request A: read cart [ ]      Request B: read cart [ ]              │
//! │    Request A: write    [x]                                              │
//! │                                  Request B: write    [y]   ◄── A lost! │
//! │                                                                         │
//! │  Every mutating operation therefore runs under a per-customer async    │
//! │  mutex: read-mutate-write for one customer is serial, different        │
//! │  customers proceed in parallel.                                        │
//! │                                                                         │
//! │    Request A: lock(cust) → read [ ] → write [x]    → unlock            │
//! │    Request B:            wait… lock → read [x] → write [x,y]           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operation Semantics
//! | operation     | persists | publishes        |
//! |---------------|----------|------------------|
//! | get_or_create | on first access only | never |
//! | add_item      | yes      | ItemAdded        |
//! | update_item   | on success | ItemUpdated    |
//! | remove_item   | on success | ItemRemoved    |
//! | clear         | yes      | CartCleared (even when already empty) |
//!
//! `ItemNotFound` outcomes persist nothing and publish nothing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use mercato_core::{Cart, CartEvent, CoreError};
use mercato_db::{CartRepository, DbError, DbResult};

use crate::events::EventPublisher;

// =============================================================================
// Engine Error
// =============================================================================

/// Errors from cart mutation operations.
///
/// Publish failures are deliberately absent: a failed publish after a
/// successful persist is logged, not surfaced (see [`CartEngine::emit`]).
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Db(#[from] DbError),
}

// =============================================================================
// Cart Store Port
// =============================================================================

/// Persistence contract the engine needs from cart storage.
///
/// Not-found is an `Option`, not an error: lazy creation is the engine's
/// decision.
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn find_by_customer_id(&self, customer_id: &str) -> DbResult<Option<Cart>>;
    async fn upsert(&self, cart: &Cart) -> DbResult<()>;
}

#[async_trait]
impl CartStore for CartRepository {
    async fn find_by_customer_id(&self, customer_id: &str) -> DbResult<Option<Cart>> {
        CartRepository::find_by_customer_id(self, customer_id).await
    }

    async fn upsert(&self, cart: &Cart) -> DbResult<()> {
        CartRepository::upsert(self, cart).await
    }
}

// =============================================================================
// Per-Customer Locks
// =============================================================================

/// Keyed mutex map serializing mutations per customer id.
///
/// Lock entries are created on first use and kept for the process lifetime;
/// the per-customer footprint is one `Arc<Mutex<()>>`.
#[derive(Debug, Default)]
struct CustomerLocks {
    locks: StdMutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CustomerLocks {
    /// Returns the lock guarding a customer's cart.
    fn for_customer(&self, customer_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().expect("Customer lock map poisoned");
        locks
            .entry(customer_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

// =============================================================================
// Cart Engine
// =============================================================================

/// The cart mutation state machine.
///
/// Generic over its store and publisher so tests run against in-memory
/// doubles and production runs against PostgreSQL + Redis.
#[derive(Debug)]
pub struct CartEngine<S, P> {
    store: S,
    publisher: P,
    locks: CustomerLocks,
}

impl<S: CartStore, P: EventPublisher> CartEngine<S, P> {
    /// Creates a new engine.
    pub fn new(store: S, publisher: P) -> Self {
        CartEngine {
            store,
            publisher,
            locks: CustomerLocks::default(),
        }
    }

    /// Returns the customer's cart, creating an empty one on first access.
    ///
    /// Idempotent: a second call returns the same cart identity. Never
    /// publishes an event - lazy creation is a read with a side effect, not
    /// a client-initiated mutation.
    pub async fn get_or_create(&self, customer_id: &str) -> Result<Cart, EngineError> {
        let lock = self.locks.for_customer(customer_id);
        let _guard = lock.lock().await;

        self.load_or_create(customer_id).await
    }

    /// Appends a new item to the customer's cart.
    ///
    /// Persists the whole cart, then publishes exactly one `ItemAdded`.
    pub async fn add_item(
        &self,
        customer_id: &str,
        product_id: i64,
        quantity: i64,
    ) -> Result<Cart, EngineError> {
        let lock = self.locks.for_customer(customer_id);
        let _guard = lock.lock().await;

        let mut cart = self.load_or_create(customer_id).await?;
        cart.add_item(product_id, quantity)?;
        self.store.upsert(&cart).await?;

        info!(
            customer_id = %customer_id,
            cart_id = %cart.id,
            product_id,
            quantity,
            "Item added to cart"
        );

        self.emit(CartEvent::item_added(&cart.id, product_id)).await;
        Ok(cart)
    }

    /// Sets the quantity of an existing item.
    ///
    /// `ItemNotFound` persists nothing and publishes nothing.
    pub async fn update_item(
        &self,
        customer_id: &str,
        item_id: &str,
        quantity: i64,
    ) -> Result<Cart, EngineError> {
        let lock = self.locks.for_customer(customer_id);
        let _guard = lock.lock().await;

        let mut cart = self.load_or_create(customer_id).await?;
        let product_id = cart.update_item(item_id, quantity)?.product_id;
        self.store.upsert(&cart).await?;

        info!(
            customer_id = %customer_id,
            cart_id = %cart.id,
            item_id = %item_id,
            quantity,
            "Cart item updated"
        );

        self.emit(CartEvent::item_updated(&cart.id, product_id)).await;
        Ok(cart)
    }

    /// Removes an existing item.
    ///
    /// `ItemNotFound` persists nothing and publishes nothing.
    pub async fn remove_item(
        &self,
        customer_id: &str,
        item_id: &str,
    ) -> Result<Cart, EngineError> {
        let lock = self.locks.for_customer(customer_id);
        let _guard = lock.lock().await;

        let mut cart = self.load_or_create(customer_id).await?;
        let removed = cart.remove_item(item_id)?;
        self.store.upsert(&cart).await?;

        info!(
            customer_id = %customer_id,
            cart_id = %cart.id,
            item_id = %item_id,
            product_id = removed.product_id,
            "Cart item removed"
        );

        self.emit(CartEvent::item_removed(&cart.id, removed.product_id))
            .await;
        Ok(cart)
    }

    /// Empties the customer's cart.
    ///
    /// Publishes `CartCleared` even when the cart was already empty: the
    /// client asked for a clear and a clear happened.
    pub async fn clear(&self, customer_id: &str) -> Result<Cart, EngineError> {
        let lock = self.locks.for_customer(customer_id);
        let _guard = lock.lock().await;

        let mut cart = self.load_or_create(customer_id).await?;
        cart.clear();
        self.store.upsert(&cart).await?;

        info!(customer_id = %customer_id, cart_id = %cart.id, "Cart cleared");

        self.emit(CartEvent::cart_cleared(&cart.id)).await;
        Ok(cart)
    }

    /// Loads the cart, creating and persisting an empty one when absent.
    ///
    /// Callers hold the customer lock.
    async fn load_or_create(&self, customer_id: &str) -> Result<Cart, EngineError> {
        if let Some(cart) = self.store.find_by_customer_id(customer_id).await? {
            return Ok(cart);
        }

        let cart = Cart::new(customer_id);
        self.store.upsert(&cart).await?;

        info!(customer_id = %customer_id, cart_id = %cart.id, "Cart created");
        Ok(cart)
    }

    /// Publishes an event, logging instead of failing.
    ///
    /// The mutation is already persisted when this runs; persisted state
    /// wins over the event channel. At-least-once-attempted, not
    /// guaranteed-delivered.
    async fn emit(&self, event: CartEvent) {
        if let Err(e) = self.publisher.publish(&event).await {
            warn!(
                error = %e,
                event_type = ?event.event_type,
                cart_id = %event.cart_id,
                "Failed to publish cart event; mutation remains persisted"
            );
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use mercato_core::CartEventType;

    use crate::events::PublishError;

    /// In-memory cart store. Clones share state so tests can inspect it.
    #[derive(Debug, Clone, Default)]
    struct MemoryCartStore {
        carts: Arc<StdMutex<HashMap<String, Cart>>>,
    }

    #[async_trait]
    impl CartStore for MemoryCartStore {
        async fn find_by_customer_id(&self, customer_id: &str) -> DbResult<Option<Cart>> {
            Ok(self.carts.lock().unwrap().get(customer_id).cloned())
        }

        async fn upsert(&self, cart: &Cart) -> DbResult<()> {
            self.carts
                .lock()
                .unwrap()
                .insert(cart.customer_id.clone(), cart.clone());
            Ok(())
        }
    }

    /// Publisher double that records every event it is handed.
    #[derive(Debug, Clone, Default)]
    struct RecordingPublisher {
        events: Arc<StdMutex<Vec<CartEvent>>>,
    }

    impl RecordingPublisher {
        fn events(&self) -> Vec<CartEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EventPublisher for RecordingPublisher {
        async fn publish(&self, event: &CartEvent) -> Result<(), PublishError> {
            self.events.lock().unwrap().push(event.clone());
            Ok(())
        }
    }

    /// Publisher double whose channel is always down.
    #[derive(Debug, Clone, Default)]
    struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _event: &CartEvent) -> Result<(), PublishError> {
            Err(PublishError::Channel("connection refused".to_string()))
        }
    }

    fn engine() -> (
        CartEngine<MemoryCartStore, RecordingPublisher>,
        MemoryCartStore,
        RecordingPublisher,
    ) {
        let store = MemoryCartStore::default();
        let publisher = RecordingPublisher::default();
        let engine = CartEngine::new(store.clone(), publisher.clone());
        (engine, store, publisher)
    }

    #[tokio::test]
    async fn test_get_or_create_is_idempotent() {
        let (engine, store, publisher) = engine();

        let first = engine.get_or_create("cust-1").await.unwrap();
        let second = engine.get_or_create("cust-1").await.unwrap();

        assert_eq!(first.id, second.id);
        assert_eq!(store.carts.lock().unwrap().len(), 1);
        assert!(publisher.events().is_empty());
    }

    #[tokio::test]
    async fn test_add_item_persists_and_publishes_once() {
        let (engine, _store, publisher) = engine();

        let cart = engine.add_item("cust-1", 42, 2).await.unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items[0].product_id, 42);
        assert_eq!(cart.items[0].quantity, 2);

        let events = publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], CartEvent::item_added(&cart.id, 42));
    }

    #[tokio::test]
    async fn test_update_item_publishes_item_updated() {
        let (engine, _store, publisher) = engine();

        let cart = engine.add_item("cust-1", 42, 1).await.unwrap();
        let item_id = cart.items[0].id.clone();

        let updated = engine.update_item("cust-1", &item_id, 5).await.unwrap();

        assert_eq!(updated.items[0].quantity, 5);
        let events = publisher.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].event_type, CartEventType::ItemUpdated);
        assert_eq!(events[1].product_id, Some(42));
    }

    #[tokio::test]
    async fn test_update_missing_item_persists_and_publishes_nothing() {
        let (engine, store, publisher) = engine();

        let cart = engine.add_item("cust-1", 42, 2).await.unwrap();
        let persisted_before = store.carts.lock().unwrap().get("cust-1").cloned().unwrap();

        let err = engine
            .update_item("cust-1", "no-such-item", 5)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            EngineError::Core(CoreError::ItemNotFound { .. })
        ));

        // State untouched, only the ItemAdded event from setup exists
        let persisted_after = store.carts.lock().unwrap().get("cust-1").cloned().unwrap();
        assert_eq!(persisted_after.items, persisted_before.items);
        assert_eq!(publisher.events().len(), 1);
        assert_eq!(cart.items[0].quantity, 2);
    }

    #[tokio::test]
    async fn test_remove_item_twice() {
        let (engine, _store, publisher) = engine();

        let cart = engine.add_item("cust-1", 42, 2).await.unwrap();
        let item_id = cart.items[0].id.clone();

        let after_remove = engine.remove_item("cust-1", &item_id).await.unwrap();
        assert!(after_remove.is_empty());

        let err = engine.remove_item("cust-1", &item_id).await.unwrap_err();
        assert!(matches!(
            err,
            EngineError::Core(CoreError::ItemNotFound { .. })
        ));

        // Exactly one ItemRemoved despite two calls
        let removals: Vec<_> = publisher
            .events()
            .into_iter()
            .filter(|e| e.event_type == CartEventType::ItemRemoved)
            .collect();
        assert_eq!(removals.len(), 1);
        assert_eq!(removals[0].product_id, Some(42));
    }

    #[tokio::test]
    async fn test_clear_on_empty_cart_still_publishes() {
        let (engine, _store, publisher) = engine();

        let cart = engine.clear("cust-1").await.unwrap();

        assert!(cart.is_empty());
        let events = publisher.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0], CartEvent::cart_cleared(&cart.id));
    }

    #[tokio::test]
    async fn test_clear_publishes_every_time() {
        let (engine, _store, publisher) = engine();

        engine.add_item("cust-1", 42, 1).await.unwrap();
        engine.clear("cust-1").await.unwrap();
        engine.clear("cust-1").await.unwrap();

        let clears: Vec<_> = publisher
            .events()
            .into_iter()
            .filter(|e| e.event_type == CartEventType::CartCleared)
            .collect();
        assert_eq!(clears.len(), 2);
    }

    #[tokio::test]
    async fn test_publish_failure_does_not_roll_back() {
        let store = MemoryCartStore::default();
        let engine = CartEngine::new(store.clone(), FailingPublisher);

        let cart = engine.add_item("cust-1", 42, 2).await.unwrap();

        // The mutation is persisted even though every publish failed
        assert_eq!(cart.item_count(), 1);
        let persisted = store.carts.lock().unwrap().get("cust-1").cloned().unwrap();
        assert_eq!(persisted.items.len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_adds_both_survive() {
        // Lost-update regression: two concurrent adds for the same customer
        // must both end up in the cart
        let (engine, _store, publisher) = engine();
        let engine = Arc::new(engine);

        let a = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.add_item("cust-1", 1, 1).await })
        };
        let b = {
            let engine = engine.clone();
            tokio::spawn(async move { engine.add_item("cust-1", 2, 1).await })
        };

        a.await.unwrap().unwrap();
        b.await.unwrap().unwrap();

        let cart = engine.get_or_create("cust-1").await.unwrap();
        let mut products: Vec<i64> = cart.items.iter().map(|i| i.product_id).collect();
        products.sort_unstable();

        assert_eq!(products, vec![1, 2]);
        assert_eq!(publisher.events().len(), 2);
    }

    #[tokio::test]
    async fn test_customers_do_not_share_carts() {
        let (engine, _store, _publisher) = engine();

        engine.add_item("cust-1", 1, 1).await.unwrap();
        engine.add_item("cust-2", 2, 1).await.unwrap();

        let first = engine.get_or_create("cust-1").await.unwrap();
        let second = engine.get_or_create("cust-2").await.unwrap();

        assert_ne!(first.id, second.id);
        assert_eq!(first.items[0].product_id, 1);
        assert_eq!(second.items[0].product_id, 2);
    }
}
