//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port against Stripe's REST API:
//! - Customer lookup and creation
//! - Payment intent creation
//! - Billing portal sessions
//!
//! All secrets are handled via `secrecy::SecretString`. Webhook signature
//! verification lives in the domain layer (`domain::billing`), not here;
//! this adapter only covers the outbound API surface.

mod api_types;
mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
