//! Serde shapes for Stripe REST API responses.
//!
//! Only fields the adapter actually reads are captured; Stripe's full
//! object schemas are much larger and deserialization ignores the rest.

use serde::Deserialize;

/// A customer object as returned by `/v1/customers`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomer {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub deleted: bool,
}

/// The list envelope for `GET /v1/customers?email=...`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomerList {
    pub data: Vec<StripeCustomer>,
}

/// A payment intent object as returned by `/v1/payment_intents`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    #[serde(default)]
    pub customer: Option<String>,
}

/// A billing portal session as returned by `/v1/billing_portal/sessions`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripePortalSession {
    pub id: String,
    pub url: String,
}

/// Stripe's error envelope: `{"error": {"type": ..., "code": ..., "message": ...}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeErrorEnvelope {
    pub error: StripeApiError,
}

/// The error object inside [`StripeErrorEnvelope`].
#[derive(Debug, Clone, Deserialize)]
pub struct StripeApiError {
    /// Stripe's error class: "card_error", "invalid_request_error",
    /// "api_error", "authentication_error", "rate_limit_error".
    #[serde(rename = "type")]
    #[serde(default)]
    pub error_type: Option<String>,

    /// Fine-grained code within the class, e.g. "card_declined".
    #[serde(default)]
    pub code: Option<String>,

    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_customer_list() {
        let json = r#"{
            "object": "list",
            "data": [
                {"id": "cus_1", "email": "a@example.com", "name": "A", "created": 1704067200}
            ],
            "has_more": false
        }"#;

        let list: StripeCustomerList = serde_json::from_str(json).unwrap();
        assert_eq!(list.data.len(), 1);
        assert_eq!(list.data[0].id, "cus_1");
        assert!(!list.data[0].deleted);
    }

    #[test]
    fn deserialize_payment_intent() {
        let json = r#"{
            "id": "pi_1",
            "object": "payment_intent",
            "client_secret": "pi_1_secret_abc",
            "status": "requires_confirmation",
            "amount": 1999,
            "currency": "usd",
            "customer": "cus_1"
        }"#;

        let intent: StripePaymentIntent = serde_json::from_str(json).unwrap();
        assert_eq!(intent.id, "pi_1");
        assert_eq!(intent.amount, 1999);
        assert_eq!(intent.customer.as_deref(), Some("cus_1"));
    }

    #[test]
    fn deserialize_error_envelope() {
        let json = r#"{
            "error": {
                "type": "card_error",
                "code": "card_declined",
                "message": "Your card was declined."
            }
        }"#;

        let envelope: StripeErrorEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.error.error_type.as_deref(), Some("card_error"));
        assert_eq!(envelope.error.code.as_deref(), Some("card_declined"));
    }

    #[test]
    fn deserialize_error_envelope_with_missing_fields() {
        let envelope: StripeErrorEnvelope = serde_json::from_str(r#"{"error": {}}"#).unwrap();
        assert!(envelope.error.error_type.is_none());
        assert!(envelope.error.code.is_none());
    }
}
