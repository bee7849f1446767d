//! Billing domain - Stripe webhook ingress and payment proxy validation.
//!
//! The webhook side is the core of this service: raw-byte signature
//! verification, event classification, and exactly-once dispatch to the
//! event sink. The proxy side is input validation that runs before any
//! request leaves for the vendor.

mod payment_request;
mod stripe_event;
mod webhook_errors;
mod webhook_processor;
mod webhook_verifier;

pub use payment_request::{
    CustomerSelector, PaymentIntentInput, PaymentIntentRequest, PortalSessionRequest,
};
pub use stripe_event::{BillingEventType, StripeEvent, StripeEventData};
pub use webhook_errors::WebhookError;
pub use webhook_processor::{IdempotentWebhookProcessor, WebhookOutcome};
pub use webhook_verifier::{SignatureHeader, StripeWebhookVerifier};

#[cfg(test)]
pub use stripe_event::StripeEventBuilder;
#[cfg(test)]
pub use webhook_verifier::compute_test_signature;
