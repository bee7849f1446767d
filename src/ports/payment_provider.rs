//! Payment provider port for external payment processing.
//!
//! Defines the contract for payment gateway integrations (e.g., Stripe).
//! Implementations handle customer lookup, payment-intent creation, and
//! billing-portal sessions; webhook verification stays in the domain
//! because it runs over raw request bytes, never over SDK objects.
//!
//! # Design
//!
//! - **Gateway agnostic**: the interface works with any payment provider
//! - **Vendor classification preserved**: `PaymentError` carries the
//!   provider's own error code so callers see "card error" vs "invalid
//!   request" vs "server error" exactly as the vendor reported it

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Port for payment provider integrations.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Find a customer by email address.
    ///
    /// Returns `None` if no customer with that email exists.
    async fn find_customer_by_email(&self, email: &str)
        -> Result<Option<Customer>, PaymentError>;

    /// Create a customer in the payment system.
    async fn create_customer(&self, request: CreateCustomerRequest)
        -> Result<Customer, PaymentError>;

    /// Create a payment intent for the given customer.
    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError>;

    /// Create a billing portal session for subscription management.
    ///
    /// Returns a URL for the customer to manage their billing.
    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError>;
}

/// Request to create a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    /// Customer email address.
    pub email: String,

    /// Customer name (optional).
    pub name: Option<String>,
}

/// Customer in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Provider's customer ID (cus_xxx).
    pub id: String,

    /// Customer email.
    pub email: String,

    /// Customer name.
    pub name: Option<String>,

    /// When the customer was created (provider Unix timestamp).
    pub created_at: i64,
}

/// Request to create a payment intent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentIntentRequest {
    /// Amount in the currency's minor units.
    pub amount: i64,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Provider's customer ID.
    pub customer_id: String,

    /// Payment method to attach (optional).
    pub payment_method_id: Option<String>,

    /// Free-form metadata forwarded to the provider.
    pub metadata: HashMap<String, String>,
}

/// Payment intent in the payment system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    /// Provider's intent ID (pi_xxx).
    pub id: String,

    /// Client secret for frontend confirmation flows.
    pub client_secret: Option<String>,

    /// Provider status string (e.g., "requires_confirmation").
    pub status: String,

    /// Amount in minor units.
    pub amount: i64,

    /// Lowercase ISO currency code.
    pub currency: String,

    /// Provider's customer ID, if attached.
    pub customer_id: Option<String>,
}

/// Portal session for subscription management.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PortalSession {
    /// Provider's session ID.
    pub id: String,

    /// URL for the customer to access the portal.
    pub url: String,
}

/// Errors from payment provider operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (e.g., "card_declined"), when available.
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    /// Create a new payment error.
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    /// Attach the provider's own error code.
    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    /// Create a network error.
    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    /// Create a provider-side error.
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }

    /// Create a not found error.
    pub fn not_found(resource: &str) -> Self {
        Self::new(
            PaymentErrorCode::NotFound,
            format!("{} not found", resource),
        )
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

/// Payment error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API authentication failed.
    AuthenticationError,

    /// Card was declined or otherwise rejected.
    CardError,

    /// The request itself was invalid (vendor's invalid_request_error).
    InvalidRequest,

    /// Resource not found.
    NotFound,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider-side server error.
    ProviderError,

    /// Unknown error.
    Unknown,
}

impl PaymentErrorCode {
    /// Check if this error type is typically retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::CardError => "card_error",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts_dyn(_provider: &dyn PaymentProvider) {}
    }

    #[test]
    fn payment_error_retryable() {
        assert!(PaymentErrorCode::NetworkError.is_retryable());
        assert!(PaymentErrorCode::RateLimitExceeded.is_retryable());
        assert!(PaymentErrorCode::ProviderError.is_retryable());

        assert!(!PaymentErrorCode::CardError.is_retryable());
        assert!(!PaymentErrorCode::InvalidRequest.is_retryable());
        assert!(!PaymentErrorCode::NotFound.is_retryable());
    }

    #[test]
    fn payment_error_display() {
        let err = PaymentError::new(PaymentErrorCode::CardError, "Your card was declined")
            .with_provider_code("card_declined");
        assert!(err.to_string().contains("card_error"));
        assert!(err.to_string().contains("Your card was declined"));
        assert_eq!(err.provider_code.as_deref(), Some("card_declined"));
    }

    #[test]
    fn not_found_message_names_the_resource() {
        let err = PaymentError::not_found("Customer");
        assert_eq!(err.message, "Customer not found");
        assert_eq!(err.code, PaymentErrorCode::NotFound);
    }
}
