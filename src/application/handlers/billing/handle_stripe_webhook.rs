//! HandleStripeWebhookHandler - Command handler for Stripe webhook deliveries.
//!
//! Verification happens on the raw body bytes before any JSON parsing,
//! then the parsed event goes through the idempotent processor.

use crate::domain::billing::{
    IdempotentWebhookProcessor, StripeWebhookVerifier, WebhookError, WebhookOutcome,
};

/// Command to handle a Stripe webhook delivery.
#[derive(Debug, Clone)]
pub struct HandleStripeWebhookCommand {
    /// Raw request body, byte-for-byte as received.
    pub payload: Vec<u8>,

    /// Value of the `Stripe-Signature` header, if present.
    pub signature: Option<String>,
}

/// Handler for Stripe webhook deliveries.
pub struct HandleStripeWebhookHandler {
    verifier: StripeWebhookVerifier,
    processor: IdempotentWebhookProcessor,
}

impl HandleStripeWebhookHandler {
    pub fn new(verifier: StripeWebhookVerifier, processor: IdempotentWebhookProcessor) -> Self {
        Self {
            verifier,
            processor,
        }
    }

    /// Verify, parse, and idempotently process one delivery.
    ///
    /// Sink failures do not surface here; once the signature checks out
    /// and the claim is stored, the delivery is acknowledged.
    pub async fn handle(
        &self,
        cmd: HandleStripeWebhookCommand,
    ) -> Result<WebhookOutcome, WebhookError> {
        let signature = cmd
            .signature
            .as_deref()
            .ok_or(WebhookError::MissingSignatureHeader)?;

        let event = self.verifier.verify_and_parse(&cmd.payload, signature)?;

        tracing::debug!(
            event_id = %event.id,
            event_type = %event.event_type,
            livemode = event.livemode,
            "Webhook signature verified"
        );

        self.processor.process(event).await
    }
}
