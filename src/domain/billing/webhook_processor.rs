//! Webhook processor - Orchestrates idempotent webhook event handling.
//!
//! This module sits between signature verification and the event sink,
//! ensuring each event identifier produces at most one durable side effect.
//!
//! ## Claim-before-act
//!
//! The processed-event record doubles as the claim. The processor inserts
//! the record *first* (a single atomic operation in the repository), and
//! only the delivery that wins the insert dispatches to the sink. Checking
//! first and recording after would leave a window where two concurrent
//! deliveries of the same event id both observe "not yet processed".
//!
//! ## Sink failures
//!
//! A sink failure after a won claim is logged and swallowed: the event is
//! already claimed, so letting Stripe redeliver could never reapply the
//! side effect. Recovery belongs to an out-of-band job, not the delivery
//! path.

use std::sync::Arc;

use crate::domain::billing::{StripeEvent, WebhookError};
use crate::domain::foundation::DomainError;
use crate::ports::{EventSink, SaveResult, WebhookEventRecord, WebhookEventRepository};

/// Outcome of processing a verified webhook event.
///
/// All three variants are acknowledged with a success status; the
/// distinction is informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// Recognized event, claim won, side effect dispatched.
    Processed,
    /// Unrecognized event type, recorded and skipped.
    Ignored,
    /// Another delivery of this event id already holds the claim.
    AlreadyProcessed,
}

impl WebhookOutcome {
    /// Short label used in acknowledgement bodies and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            WebhookOutcome::Processed => "processed",
            WebhookOutcome::Ignored => "ignored",
            WebhookOutcome::AlreadyProcessed => "duplicate",
        }
    }
}

/// Processes verified webhook events with exactly-once sink dispatch.
pub struct IdempotentWebhookProcessor {
    repository: Arc<dyn WebhookEventRepository>,
    sink: Arc<dyn EventSink>,
}

impl IdempotentWebhookProcessor {
    /// Creates a new processor over the given claim store and sink.
    pub fn new(repository: Arc<dyn WebhookEventRepository>, sink: Arc<dyn EventSink>) -> Self {
        Self { repository, sink }
    }

    /// Process a verified event exactly once.
    ///
    /// # Returns
    ///
    /// - `Ok(WebhookOutcome::Processed)` - claim won, sink invoked (sink
    ///   failures are logged, not surfaced)
    /// - `Ok(WebhookOutcome::Ignored)` - unrecognized type, recorded so its
    ///   redeliveries are deduplicated too, sink never invoked
    /// - `Ok(WebhookOutcome::AlreadyProcessed)` - duplicate delivery, no-op
    /// - `Err(WebhookError::Database(_))` - the claim itself could not be
    ///   attempted; safe for the vendor to retry
    pub async fn process(&self, event: StripeEvent) -> Result<WebhookOutcome, WebhookError> {
        let payload = serde_json::to_value(&event)
            .map_err(|e| WebhookError::ParseError(format!("Failed to serialize event: {}", e)))?;

        let event_type = event.parsed_type();
        if !event_type.is_recognized() {
            tracing::info!(
                event_id = %event.id,
                event_type = %event.event_type,
                "Unrecognized webhook event type, acknowledging without dispatch"
            );
            let record = WebhookEventRecord::ignored(
                &event.id,
                &event.event_type,
                "unrecognized event type",
                payload,
            );
            return match self.repository.save(record).await? {
                SaveResult::Inserted => Ok(WebhookOutcome::Ignored),
                SaveResult::AlreadyExists => Ok(WebhookOutcome::AlreadyProcessed),
            };
        }

        let record = WebhookEventRecord::processed(&event.id, &event.event_type, payload.clone());
        match self.repository.save(record).await? {
            SaveResult::AlreadyExists => {
                tracing::debug!(event_id = %event.id, "Duplicate webhook delivery skipped");
                Ok(WebhookOutcome::AlreadyProcessed)
            }
            SaveResult::Inserted => {
                let customer_ref = event.customer_ref();
                match self
                    .sink
                    .record_subscription_event(
                        &event.id,
                        &event.event_type,
                        customer_ref.as_deref(),
                        &payload,
                    )
                    .await
                {
                    Ok(()) => {
                        tracing::info!(
                            event_id = %event.id,
                            event_type = %event.event_type,
                            "Webhook event dispatched to sink"
                        );
                    }
                    Err(e) => {
                        // The claim stands; an operator job can replay from
                        // the recorded payload.
                        tracing::error!(
                            event_id = %event.id,
                            event_type = %event.event_type,
                            error = %e,
                            "Sink dispatch failed, event remains claimed for out-of-band retry"
                        );
                    }
                }
                Ok(WebhookOutcome::Processed)
            }
        }
    }
}

/// Converts DomainError to WebhookError for repository operations.
impl From<DomainError> for WebhookError {
    fn from(err: DomainError) -> Self {
        WebhookError::Database(err.to_string())
    }
}
