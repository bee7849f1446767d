//! HTTP adapter for billing endpoints.
//!
//! Exposes the billing surface via REST API:
//! - `POST /webhooks/stripe` - Stripe webhook ingress (signature verified)
//! - `POST /billing/payment-intents` - Create a payment intent
//! - `POST /billing/portal-sessions` - Create a billing portal session
//! - `GET /billing/customers` - Look up a vendor customer by email
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::BillingAppState;
pub use routes::{billing_router, billing_routes, webhook_routes};
