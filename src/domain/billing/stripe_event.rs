//! Stripe webhook event types.
//!
//! Defines the structures for parsing Stripe webhook payloads.
//! Only fields relevant to our processing are captured.

use serde::{Deserialize, Serialize};

/// Stripe webhook event (simplified).
///
/// Contains the essential fields needed for webhook processing.
/// Additional fields from Stripe's full event schema are ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEvent {
    /// Unique identifier for the event (evt_xxx format).
    pub id: String,

    /// Type of event (e.g., "payment_intent.succeeded").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    pub created: i64,

    /// Object containing event-specific data.
    pub data: StripeEventData,

    /// Whether this is a live mode event (vs test mode).
    pub livemode: bool,

    /// API version used to render this event.
    #[serde(default)]
    pub api_version: Option<String>,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StripeEventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl StripeEvent {
    /// Returns true if this is a live mode event.
    pub fn is_live(&self) -> bool {
        self.livemode
    }

    /// Returns true if this is a test mode event.
    pub fn is_test(&self) -> bool {
        !self.livemode
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> BillingEventType {
        BillingEventType::from_str(&self.event_type)
    }

    /// Extract the customer reference from the event object, if present.
    ///
    /// Payment intents, subscriptions, and invoices all carry a top-level
    /// `customer` field; it may be null for intents created without one.
    pub fn customer_ref(&self) -> Option<String> {
        self.data
            .object
            .get("customer")
            .and_then(|v| v.as_str())
            .map(String::from)
    }

    /// Attempts to deserialize the data object as the specified type.
    pub fn deserialize_object<T: serde::de::DeserializeOwned>(
        &self,
    ) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.data.object.clone())
    }
}

/// Billing event classification for the recognized Stripe event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BillingEventType {
    /// Payment intent succeeded.
    PaymentSucceeded,
    /// Payment intent failed.
    PaymentFailed,
    /// Customer subscription was created.
    SubscriptionCreated,
    /// Customer subscription was updated.
    SubscriptionUpdated,
    /// Customer subscription was cancelled (deleted on the vendor side).
    SubscriptionCancelled,
    /// Invoice was paid.
    InvoicePaid,
    /// Invoice payment failed.
    InvoicePaymentFailed,
    /// Unknown or unhandled event type.
    Unknown,
}

impl BillingEventType {
    /// Parse event type from the Stripe event type string.
    pub fn from_str(s: &str) -> Self {
        match s {
            "payment_intent.succeeded" => Self::PaymentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentFailed,
            "customer.subscription.created" => Self::SubscriptionCreated,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionCancelled,
            "invoice.paid" => Self::InvoicePaid,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            _ => Self::Unknown,
        }
    }

    /// Convert to the Stripe event type string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PaymentSucceeded => "payment_intent.succeeded",
            Self::PaymentFailed => "payment_intent.payment_failed",
            Self::SubscriptionCreated => "customer.subscription.created",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionCancelled => "customer.subscription.deleted",
            Self::InvoicePaid => "invoice.paid",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::Unknown => "unknown",
        }
    }

    /// Returns true for every variant except `Unknown`.
    ///
    /// Unrecognized types are acknowledged and ignored, never dispatched.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// Builder for creating test StripeEvent instances.
#[cfg(test)]
pub struct StripeEventBuilder {
    id: String,
    event_type: String,
    created: i64,
    object: serde_json::Value,
    previous_attributes: Option<serde_json::Value>,
    livemode: bool,
    api_version: Option<String>,
}

#[cfg(test)]
impl Default for StripeEventBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            created: chrono::Utc::now().timestamp(),
            object: serde_json::json!({}),
            previous_attributes: None,
            livemode: false,
            api_version: Some("2023-10-16".to_string()),
        }
    }
}

#[cfg(test)]
impl StripeEventBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn created(mut self, created: i64) -> Self {
        self.created = created;
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn previous_attributes(mut self, attrs: serde_json::Value) -> Self {
        self.previous_attributes = Some(attrs);
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> StripeEvent {
        StripeEvent {
            id: self.id,
            event_type: self.event_type,
            created: self.created,
            data: StripeEventData {
                object: self.object,
                previous_attributes: self.previous_attributes,
            },
            livemode: self.livemode,
            api_version: self.api_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // ══════════════════════════════════════════════════════════════
    // StripeEvent Deserialization Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn deserialize_minimal_event() {
        let json = r#"{
            "id": "evt_1234567890",
            "type": "payment_intent.succeeded",
            "created": 1704067200,
            "data": {
                "object": {}
            },
            "livemode": false,
            "api_version": "2023-10-16"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_1234567890");
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert_eq!(event.created, 1704067200);
        assert!(!event.livemode);
        assert_eq!(event.api_version.as_deref(), Some("2023-10-16"));
    }

    #[test]
    fn deserialize_event_without_api_version() {
        let json = r#"{
            "id": "evt_no_version",
            "type": "invoice.paid",
            "created": 1704067200,
            "data": {
                "object": {}
            },
            "livemode": false
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();
        assert!(event.api_version.is_none());
    }

    #[test]
    fn deserialize_event_with_previous_attributes() {
        let json = r#"{
            "id": "evt_update_123",
            "type": "customer.subscription.updated",
            "created": 1704067200,
            "data": {
                "object": {"status": "active"},
                "previous_attributes": {"status": "past_due"}
            },
            "livemode": true,
            "api_version": "2023-10-16"
        }"#;

        let event: StripeEvent = serde_json::from_str(json).unwrap();

        assert_eq!(event.id, "evt_update_123");
        assert!(event.livemode);
        assert!(event.data.previous_attributes.is_some());
        let prev = event.data.previous_attributes.unwrap();
        assert_eq!(prev["status"], "past_due");
    }

    #[test]
    fn serialize_event_roundtrip() {
        let event = StripeEventBuilder::new()
            .id("evt_roundtrip")
            .event_type("invoice.payment_failed")
            .livemode(true)
            .build();

        let json = serde_json::to_string(&event).unwrap();
        let parsed: StripeEvent = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.id, "evt_roundtrip");
        assert_eq!(parsed.event_type, "invoice.payment_failed");
        assert!(parsed.livemode);
    }

    // ══════════════════════════════════════════════════════════════
    // StripeEvent Method Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn is_live_returns_true_for_live_mode() {
        let event = StripeEventBuilder::new().livemode(true).build();
        assert!(event.is_live());
        assert!(!event.is_test());
    }

    #[test]
    fn is_test_returns_true_for_test_mode() {
        let event = StripeEventBuilder::new().livemode(false).build();
        assert!(event.is_test());
        assert!(!event.is_live());
    }

    #[test]
    fn customer_ref_extracted_from_object() {
        let event = StripeEventBuilder::new()
            .object(json!({"id": "pi_123", "customer": "cus_xyz789"}))
            .build();

        assert_eq!(event.customer_ref(), Some("cus_xyz789".to_string()));
    }

    #[test]
    fn customer_ref_none_when_null() {
        let event = StripeEventBuilder::new()
            .object(json!({"id": "pi_123", "customer": null}))
            .build();

        assert_eq!(event.customer_ref(), None);
    }

    #[test]
    fn customer_ref_none_when_absent() {
        let event = StripeEventBuilder::new().object(json!({"id": "pi_123"})).build();
        assert_eq!(event.customer_ref(), None);
    }

    #[test]
    fn deserialize_object_to_custom_type() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct PaymentIntent {
            id: String,
            amount: i64,
        }

        let event = StripeEventBuilder::new()
            .object(json!({
                "id": "pi_test_abc123",
                "amount": 1999
            }))
            .build();

        let intent: PaymentIntent = event.deserialize_object().unwrap();
        assert_eq!(intent.id, "pi_test_abc123");
        assert_eq!(intent.amount, 1999);
    }

    #[test]
    fn deserialize_object_fails_for_wrong_type() {
        #[derive(Debug, Deserialize)]
        struct Invoice {
            amount_due: i64,
        }

        let event = StripeEventBuilder::new()
            .object(json!({
                "id": "pi_test",
                "status": "succeeded"
            }))
            .build();

        let result: Result<Invoice, _> = event.deserialize_object();
        assert!(result.is_err());
    }

    // ══════════════════════════════════════════════════════════════
    // BillingEventType Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn event_type_from_str_payment_succeeded() {
        assert_eq!(
            BillingEventType::from_str("payment_intent.succeeded"),
            BillingEventType::PaymentSucceeded
        );
    }

    #[test]
    fn event_type_from_str_payment_failed() {
        assert_eq!(
            BillingEventType::from_str("payment_intent.payment_failed"),
            BillingEventType::PaymentFailed
        );
    }

    #[test]
    fn event_type_from_str_subscription_created() {
        assert_eq!(
            BillingEventType::from_str("customer.subscription.created"),
            BillingEventType::SubscriptionCreated
        );
    }

    #[test]
    fn event_type_from_str_subscription_updated() {
        assert_eq!(
            BillingEventType::from_str("customer.subscription.updated"),
            BillingEventType::SubscriptionUpdated
        );
    }

    #[test]
    fn event_type_from_str_subscription_deleted_maps_to_cancelled() {
        assert_eq!(
            BillingEventType::from_str("customer.subscription.deleted"),
            BillingEventType::SubscriptionCancelled
        );
    }

    #[test]
    fn event_type_from_str_invoice_paid() {
        assert_eq!(
            BillingEventType::from_str("invoice.paid"),
            BillingEventType::InvoicePaid
        );
    }

    #[test]
    fn event_type_from_str_invoice_payment_failed() {
        assert_eq!(
            BillingEventType::from_str("invoice.payment_failed"),
            BillingEventType::InvoicePaymentFailed
        );
    }

    #[test]
    fn event_type_from_str_unknown() {
        assert_eq!(
            BillingEventType::from_str("some.future.event"),
            BillingEventType::Unknown
        );
    }

    #[test]
    fn checkout_session_completed_is_not_recognized() {
        let parsed = BillingEventType::from_str("checkout.session.completed");
        assert_eq!(parsed, BillingEventType::Unknown);
        assert!(!parsed.is_recognized());
    }

    #[test]
    fn event_type_as_str_roundtrip() {
        let types = [
            BillingEventType::PaymentSucceeded,
            BillingEventType::PaymentFailed,
            BillingEventType::SubscriptionCreated,
            BillingEventType::SubscriptionUpdated,
            BillingEventType::SubscriptionCancelled,
            BillingEventType::InvoicePaid,
            BillingEventType::InvoicePaymentFailed,
        ];

        for event_type in types {
            let s = event_type.as_str();
            assert_eq!(BillingEventType::from_str(s), event_type);
            assert!(event_type.is_recognized());
        }
    }

    #[test]
    fn unknown_is_not_recognized() {
        assert!(!BillingEventType::Unknown.is_recognized());
    }

    #[test]
    fn parsed_type_returns_correct_variant() {
        let event = StripeEventBuilder::new()
            .event_type("invoice.payment_failed")
            .build();

        assert_eq!(event.parsed_type(), BillingEventType::InvoicePaymentFailed);
    }

    // ══════════════════════════════════════════════════════════════
    // Builder Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn builder_default_values() {
        let event = StripeEventBuilder::new().build();

        assert!(event.id.starts_with("evt_"));
        assert_eq!(event.event_type, "payment_intent.succeeded");
        assert!(!event.livemode);
    }

    #[test]
    fn builder_with_custom_values() {
        let event = StripeEventBuilder::new()
            .id("evt_custom")
            .event_type("invoice.paid")
            .created(1234567890)
            .livemode(true)
            .object(json!({"amount": 1000}))
            .previous_attributes(json!({"amount": 500}))
            .build();

        assert_eq!(event.id, "evt_custom");
        assert_eq!(event.event_type, "invoice.paid");
        assert_eq!(event.created, 1234567890);
        assert!(event.livemode);
        assert_eq!(event.data.object["amount"], 1000);
        assert!(event.data.previous_attributes.is_some());
    }
}
