//! Axum router configuration for billing endpoints.
//!
//! Wires billing routes to their handlers.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    create_payment_intent, create_portal_session, get_customer, handle_stripe_webhook, health,
    BillingAppState,
};

/// Create the billing API router.
///
/// # Routes
/// - `POST /payment-intents` - Create a payment intent
/// - `POST /portal-sessions` - Create a billing portal session
/// - `GET /customers` - Look up a vendor customer by email
pub fn billing_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/payment-intents", post(create_payment_intent))
        .route("/portal-sessions", post(create_portal_session))
        .route("/customers", get(get_customer))
}

/// Create the Stripe webhook router.
///
/// Separate from the billing routes because webhook requests carry no
/// caller identity; they are authenticated by signature alone.
///
/// # Routes
/// - `POST /stripe` - Handle Stripe webhook deliveries
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/stripe", post(handle_stripe_webhook))
}

/// Create the complete service router.
///
/// # Example
///
/// ```ignore
/// let app = billing_router().with_state(app_state);
/// ```
pub fn billing_router() -> Router<BillingAppState> {
    Router::new()
        .nest("/billing", billing_routes())
        .nest("/webhooks", webhook_routes())
        .route("/health", get(health))
}
