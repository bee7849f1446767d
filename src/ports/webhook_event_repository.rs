//! WebhookEventRepository port - Interface for tracking processed Stripe webhooks.
//!
//! This port enables idempotent webhook handling by tracking which webhook
//! events have been seen, and stores the full payload for auditing.
//!
//! ## Why Webhook Idempotency Matters
//!
//! Stripe may deliver the same webhook multiple times due to:
//! - Network timeouts
//! - 5xx response from our endpoint (triggers retry)
//! - Our endpoint returning success but Stripe not receiving it
//!
//! The record doubles as the claim: the delivery that inserts it owns the
//! side effect, every other delivery of the same event id backs off.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::foundation::DomainError;

/// Record of a processed webhook event.
///
/// Created once per event id, before the side effect runs, and never
/// mutated afterwards.
#[derive(Debug, Clone)]
pub struct WebhookEventRecord {
    /// Stripe event ID (evt_xxx format).
    pub event_id: String,

    /// Type of Stripe event (e.g., "payment_intent.succeeded").
    pub event_type: String,

    /// When the event was claimed for processing.
    pub processed_at: DateTime<Utc>,

    /// Result of classification: "processed" or "ignored".
    pub result: String,

    /// Reason the event was ignored, if it was.
    pub error_message: Option<String>,

    /// Original event payload for auditing.
    pub payload: serde_json::Value,
}

impl WebhookEventRecord {
    /// Creates a record for a recognized event about to be dispatched.
    pub fn processed(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: "processed".to_string(),
            error_message: None,
            payload,
        }
    }

    /// Creates a record for an unrecognized event that was acknowledged.
    pub fn ignored(
        event_id: impl Into<String>,
        event_type: impl Into<String>,
        reason: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            event_type: event_type.into(),
            processed_at: Utc::now(),
            result: "ignored".to_string(),
            error_message: Some(reason.into()),
            payload,
        }
    }

    /// Returns true if the event was dispatched to the sink.
    pub fn was_dispatched(&self) -> bool {
        self.result == "processed"
    }
}

/// Result of attempting to save a webhook event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveResult {
    /// Record was inserted (first time seeing this event).
    Inserted,
    /// Record already exists (duplicate event).
    AlreadyExists,
}

/// Port for storing and retrieving processed webhook events.
///
/// Implementations must make `save` atomic (PRIMARY KEY on event_id with
/// `ON CONFLICT DO NOTHING`, or an equivalent single compare-and-set) so
/// concurrent deliveries of one event id cannot both win the claim.
#[async_trait]
pub trait WebhookEventRepository: Send + Sync {
    /// Find a previously processed event by its Stripe event ID.
    ///
    /// Returns `None` if the event hasn't been processed yet.
    async fn find_by_event_id(
        &self,
        event_id: &str,
    ) -> Result<Option<WebhookEventRecord>, DomainError>;

    /// Attempt to save a webhook event record.
    ///
    /// Returns `SaveResult::Inserted` if this is the first time seeing the
    /// event, or `SaveResult::AlreadyExists` if another delivery already
    /// claimed it.
    async fn save(&self, record: WebhookEventRecord) -> Result<SaveResult, DomainError>;

    /// Delete records older than the specified timestamp.
    ///
    /// Returns the number of records deleted.
    /// Used for cleanup/retention policy (e.g., keep 30 days).
    async fn delete_before(&self, timestamp: DateTime<Utc>) -> Result<u64, DomainError>;
}
