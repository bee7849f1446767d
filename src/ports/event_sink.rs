//! EventSink port - The persistence/notification collaborator for webhook events.
//!
//! The webhook processor calls this interface exactly once per newly-seen
//! event identifier. What sits behind it (a database table, a queue, a
//! notification service) is an adapter concern; the processor only cares
//! that the call either lands or fails.
//!
//! Sink failures follow the downstream-failure policy: logged, swallowed
//! from the webhook caller's perspective, eligible for out-of-band retry.

use async_trait::async_trait;
use thiserror::Error;

/// Errors from sink dispatch.
#[derive(Debug, Clone, Error)]
pub enum SinkError {
    /// The sink could not be reached or rejected the write.
    #[error("Sink unavailable: {0}")]
    Unavailable(String),

    /// The sink did not respond within the bounded timeout.
    #[error("Sink timed out after {0} seconds")]
    Timeout(u64),

    /// The queued dispatcher's buffer is full; the event was dropped.
    #[error("Sink queue full, event dropped")]
    QueueFull,
}

/// Port for recording subscription-affecting webhook events.
///
/// Implementations must be safe to call concurrently. They do not need to
/// deduplicate: the caller guarantees at most one call per event id.
#[async_trait]
pub trait EventSink: Send + Sync {
    /// Record one newly-seen webhook event.
    ///
    /// `customer_ref` is the vendor customer id carried by the event object,
    /// when present. `payload` is the full verified event for auditing.
    async fn record_subscription_event(
        &self,
        event_id: &str,
        event_type: &str,
        customer_ref: Option<&str>,
        payload: &serde_json::Value,
    ) -> Result<(), SinkError>;
}
