//! # Event Publication
//!
//! Cart domain events go out on the `cart-events` Redis topic.
//!
//! ## Delivery Contract
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Publish-After-Persist                                │
//! │                                                                         │
//! │  persist cart ──► PUBLISH cart-events {"eventType": "ItemAdded", ...}  │
//! │       │                      │                                          │
//! │       │                      └── fails? log + keep going               │
//! │       └── fails? whole operation fails, nothing published              │
//! │                                                                         │
//! │  The event is at-least-once-ATTEMPTED, not guaranteed-delivered:       │
//! │  a failed publish does not roll back the persisted mutation and is     │
//! │  not retried. Consumers needing a durable feed would put an outbox     │
//! │  table in front of this channel; the publishing contract here stays    │
//! │  the same either way.                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::{debug, info};

use mercato_core::{CartEvent, CART_EVENTS_TOPIC};

// =============================================================================
// Publish Error
// =============================================================================

/// Event publication errors.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// The event channel is unreachable or rejected the command.
    #[error("Event channel unavailable: {0}")]
    Channel(String),

    /// The event could not be serialized.
    #[error("Event serialization failed: {0}")]
    Serialization(String),
}

// =============================================================================
// Publisher Port
// =============================================================================

/// Fire-an-event contract the mutation engine needs from the message bus.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publishes one cart event with at-least-once delivery intent.
    async fn publish(&self, event: &CartEvent) -> Result<(), PublishError>;
}

// =============================================================================
// Redis Publisher
// =============================================================================

/// Publishes cart events to the `cart-events` Redis channel.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: ConnectionManager,
}

impl RedisEventPublisher {
    /// Connects to Redis and hands back a publisher.
    ///
    /// The connection manager reconnects on its own after transient drops,
    /// so a single publisher instance lives for the whole process.
    pub async fn connect(redis_url: &str) -> Result<Self, PublishError> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| PublishError::Channel(e.to_string()))?;

        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| PublishError::Channel(e.to_string()))?;

        info!("Connected to Redis event channel");

        Ok(RedisEventPublisher { conn })
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: &CartEvent) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)
            .map_err(|e| PublishError::Serialization(e.to_string()))?;

        let mut conn = self.conn.clone();
        let receivers: i64 = conn
            .publish(CART_EVENTS_TOPIC, payload)
            .await
            .map_err(|e| PublishError::Channel(e.to_string()))?;

        debug!(
            event_type = ?event.event_type,
            cart_id = %event.cart_id,
            receivers,
            "Published cart event"
        );

        Ok(())
    }
}

impl std::fmt::Debug for RedisEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventPublisher").finish_non_exhaustive()
    }
}
