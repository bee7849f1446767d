//! HTTP DTOs (Data Transfer Objects) for billing endpoints.
//!
//! These types define the JSON request/response structure for the billing API.
//! They serve as the boundary between HTTP and the application layer.

use serde::{Deserialize, Serialize};

use crate::domain::billing::PaymentIntentInput;
use crate::ports::{Customer, PaymentIntent, PortalSession};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a payment intent.
///
/// Everything is optional at the wire level; the domain validator decides
/// what is required and rejects the rest with field-level errors.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePaymentIntentRequest {
    #[serde(default)]
    pub amount: Option<i64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub customer_name: Option<String>,
    #[serde(default)]
    pub plan_type: Option<String>,
    #[serde(default)]
    pub user_country: Option<String>,
}

impl From<CreatePaymentIntentRequest> for PaymentIntentInput {
    fn from(request: CreatePaymentIntentRequest) -> Self {
        Self {
            amount: request.amount,
            currency: request.currency,
            payment_method_id: request.payment_method_id,
            customer_email: request.customer_email,
            customer_name: request.customer_name,
            plan_type: request.plan_type,
            user_country: request.user_country,
        }
    }
}

/// Request to create a billing portal session.
///
/// One of `customer_id` / `customer_email` is required; id wins when both
/// are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreatePortalSessionRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub customer_email: Option<String>,
    #[serde(default)]
    pub return_url: Option<String>,
}

/// Query string for customer lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerLookupQuery {
    #[serde(default)]
    pub email: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Response for a created payment intent.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentIntentResponse {
    pub id: String,
    /// Client secret the frontend needs to confirm the intent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

impl From<PaymentIntent> for PaymentIntentResponse {
    fn from(intent: PaymentIntent) -> Self {
        Self {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
            customer_id: intent.customer_id,
        }
    }
}

/// Response for a created portal session.
#[derive(Debug, Clone, Serialize)]
pub struct PortalSessionResponse {
    pub id: String,
    pub url: String,
}

impl From<PortalSession> for PortalSessionResponse {
    fn from(session: PortalSession) -> Self {
        Self {
            id: session.id,
            url: session.url,
        }
    }
}

/// Response for a customer lookup.
#[derive(Debug, Clone, Serialize)]
pub struct CustomerResponse {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub created_at: i64,
}

impl From<Customer> for CustomerResponse {
    fn from(customer: Customer) -> Self {
        Self {
            id: customer.id,
            email: customer.email,
            name: customer.name,
            created_at: customer.created_at,
        }
    }
}

/// Acknowledgement body returned for every accepted webhook delivery.
#[derive(Debug, Clone, Serialize)]
pub struct WebhookAckResponse {
    pub received: bool,
    /// One of "processed", "ignored", "duplicate".
    pub outcome: &'static str,
}

/// Response for the health endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Standard error response format.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}
