//! Billing command and query handlers.
//!
//! - `HandleStripeWebhookHandler` - webhook verify, dedupe, dispatch
//! - `CreatePaymentIntentHandler` - payment intent creation with customer resolution
//! - `CreatePortalSessionHandler` - billing portal sessions
//! - `GetCustomerHandler` - customer lookup by email

mod create_payment_intent;
mod create_portal_session;
mod get_customer;
mod handle_stripe_webhook;

pub use create_payment_intent::CreatePaymentIntentHandler;
pub use create_portal_session::CreatePortalSessionHandler;
pub use get_customer::GetCustomerHandler;
pub use handle_stripe_webhook::{HandleStripeWebhookCommand, HandleStripeWebhookHandler};

use thiserror::Error;

use crate::domain::foundation::ValidationError;
use crate::ports::PaymentError;

/// Errors from the billing proxy handlers.
///
/// Webhook handling has its own error type (`WebhookError`) because its
/// HTTP mapping is different: auth failures there must not reveal which
/// check failed.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Request failed local validation; nothing was sent to the vendor.
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The payment provider rejected the operation or was unreachable.
    #[error("{0}")]
    Payment(#[from] PaymentError),

    /// No vendor customer matches the given email.
    #[error("no customer found for '{0}'")]
    CustomerNotFound(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PaymentErrorCode;

    #[test]
    fn validation_error_converts() {
        let err: BillingError = ValidationError::empty_field("amount").into();
        assert!(matches!(err, BillingError::Validation(_)));
    }

    #[test]
    fn payment_error_converts() {
        let err: BillingError =
            PaymentError::new(PaymentErrorCode::CardError, "declined").into();
        assert!(matches!(err, BillingError::Payment(_)));
    }

    #[test]
    fn not_found_display_names_the_email() {
        let err = BillingError::CustomerNotFound("a@example.com".to_string());
        assert!(err.to_string().contains("a@example.com"));
    }
}
