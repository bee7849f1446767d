//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod billing;

pub use billing::{
    BillingError, CreatePaymentIntentHandler, CreatePortalSessionHandler, GetCustomerHandler,
    HandleStripeWebhookCommand, HandleStripeWebhookHandler,
};
