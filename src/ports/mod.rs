//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `PaymentProvider` - Outbound vendor API (customers, payment intents,
//!   portal sessions)
//! - `EventSink` - Persistence/notification collaborator, invoked once per
//!   newly-seen webhook event
//! - `WebhookEventRepository` - Atomic claim store for webhook idempotency

mod event_sink;
mod payment_provider;
mod webhook_event_repository;

pub use event_sink::{EventSink, SinkError};
pub use payment_provider::{
    CreateCustomerRequest, CreatePaymentIntentRequest, Customer, PaymentError, PaymentErrorCode,
    PaymentIntent, PaymentProvider, PortalSession,
};
pub use webhook_event_repository::{SaveResult, WebhookEventRecord, WebhookEventRepository};
