//! HTTP handlers for billing endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers. The webhook handler takes the raw body as `Bytes` so the
//! signature is checked over the exact bytes Stripe signed, before any
//! JSON parsing.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Json, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use secrecy::{ExposeSecret, SecretString};

use crate::application::handlers::billing::{
    BillingError, CreatePaymentIntentHandler, CreatePortalSessionHandler, GetCustomerHandler,
    HandleStripeWebhookCommand, HandleStripeWebhookHandler,
};
use crate::domain::billing::{
    IdempotentWebhookProcessor, PortalSessionRequest, StripeWebhookVerifier, WebhookError,
};
use crate::ports::{EventSink, PaymentErrorCode, PaymentProvider, WebhookEventRepository};

use super::dto::{
    CreatePaymentIntentRequest, CreatePortalSessionRequest, CustomerLookupQuery, CustomerResponse,
    ErrorResponse, HealthResponse, PaymentIntentResponse, PortalSessionResponse,
    WebhookAckResponse,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all dependencies.
///
/// Cloned per request; dependencies are Arc-wrapped for cheap sharing.
#[derive(Clone)]
pub struct BillingAppState {
    pub payment_provider: Arc<dyn PaymentProvider>,
    pub webhook_repository: Arc<dyn WebhookEventRepository>,
    pub event_sink: Arc<dyn EventSink>,
    pub webhook_secret: SecretString,
}

impl BillingAppState {
    /// Create handlers on demand from the shared state.
    pub fn webhook_handler(&self) -> HandleStripeWebhookHandler {
        HandleStripeWebhookHandler::new(
            StripeWebhookVerifier::new(self.webhook_secret.expose_secret()),
            IdempotentWebhookProcessor::new(
                self.webhook_repository.clone(),
                self.event_sink.clone(),
            ),
        )
    }

    pub fn payment_intent_handler(&self) -> CreatePaymentIntentHandler {
        CreatePaymentIntentHandler::new(self.payment_provider.clone())
    }

    pub fn portal_session_handler(&self) -> CreatePortalSessionHandler {
        CreatePortalSessionHandler::new(self.payment_provider.clone())
    }

    pub fn get_customer_handler(&self) -> GetCustomerHandler {
        GetCustomerHandler::new(self.payment_provider.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook Ingress
// ════════════════════════════════════════════════════════════════════════════════

/// POST /webhooks/stripe - Handle Stripe webhook deliveries.
///
/// Returns 200 with an acknowledgement body for every delivery that passes
/// signature verification, including duplicates and events whose sink
/// dispatch failed. Only a store failure returns 5xx, which tells Stripe
/// to redeliver.
pub async fn handle_stripe_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, WebhookApiError> {
    let signature = headers
        .get("Stripe-Signature")
        .and_then(|v| v.to_str().ok())
        .map(String::from);

    let handler = state.webhook_handler();
    let outcome = handler
        .handle(HandleStripeWebhookCommand {
            payload: body.to_vec(),
            signature,
        })
        .await?;

    Ok((
        StatusCode::OK,
        Json(WebhookAckResponse {
            received: true,
            outcome: outcome.as_str(),
        }),
    ))
}

/// Webhook rejection: plain-text body, status from the error itself.
///
/// Deliberately terse so a rejected caller learns nothing beyond the
/// status class; details go to the logs.
pub struct WebhookApiError(WebhookError);

impl From<WebhookError> for WebhookApiError {
    fn from(err: WebhookError) -> Self {
        Self(err)
    }
}

impl IntoResponse for WebhookApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.0.status_code();
        tracing::warn!(status = status.as_u16(), error = %self.0, "Webhook delivery rejected");
        (status, self.0.to_string()).into_response()
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Proxy Endpoints
// ════════════════════════════════════════════════════════════════════════════════

/// POST /billing/payment-intents - Create a payment intent.
pub async fn create_payment_intent(
    State(state): State<BillingAppState>,
    Json(request): Json<CreatePaymentIntentRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let handler = state.payment_intent_handler();
    let intent = handler.handle(request.into()).await?;

    Ok((StatusCode::CREATED, Json(PaymentIntentResponse::from(intent))))
}

/// POST /billing/portal-sessions - Create a billing portal session.
pub async fn create_portal_session(
    State(state): State<BillingAppState>,
    Json(request): Json<CreatePortalSessionRequest>,
) -> Result<impl IntoResponse, BillingApiError> {
    let validated = PortalSessionRequest::validate(
        request.customer_id,
        request.customer_email,
        request.return_url,
    )
    .map_err(BillingError::from)?;

    let handler = state.portal_session_handler();
    let session = handler.handle(validated).await?;

    Ok((StatusCode::CREATED, Json(PortalSessionResponse::from(session))))
}

/// GET /billing/customers?email=... - Look up a vendor customer.
pub async fn get_customer(
    State(state): State<BillingAppState>,
    Query(query): Query<CustomerLookupQuery>,
) -> Result<impl IntoResponse, BillingApiError> {
    let email = query.email.unwrap_or_default();
    let handler = state.get_customer_handler();
    let customer = handler.handle(&email).await?;

    Ok(Json(CustomerResponse::from(customer)))
}

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts billing errors to HTTP responses.
pub struct BillingApiError(BillingError);

impl From<BillingError> for BillingApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl IntoResponse for BillingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            BillingError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            BillingError::CustomerNotFound(_) => (StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND"),
            BillingError::Payment(e) => match e.code {
                PaymentErrorCode::CardError => (StatusCode::PAYMENT_REQUIRED, "CARD_ERROR"),
                PaymentErrorCode::InvalidRequest => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "INVALID_REQUEST")
                }
                PaymentErrorCode::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                // Vendor auth and rate limit problems are our operational
                // failures from the caller's point of view.
                PaymentErrorCode::NetworkError
                | PaymentErrorCode::AuthenticationError
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderError
                | PaymentErrorCode::Unknown => (StatusCode::BAD_GATEWAY, "PAYMENT_PROVIDER_ERROR"),
            },
        };

        if status.is_server_error() {
            tracing::error!(error = %self.0, "Billing request failed");
        }

        let body = ErrorResponse::new(error_code, self.0.to_string());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::PaymentError;

    fn status_of(err: BillingError) -> StatusCode {
        BillingApiError(err).into_response().status()
    }

    #[test]
    fn validation_maps_to_bad_request() {
        let err = crate::domain::foundation::ValidationError::empty_field("amount");
        assert_eq!(status_of(err.into()), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn card_error_maps_to_payment_required() {
        let err = PaymentError::new(PaymentErrorCode::CardError, "declined");
        assert_eq!(status_of(err.into()), StatusCode::PAYMENT_REQUIRED);
    }

    #[test]
    fn invalid_request_maps_to_unprocessable() {
        let err = PaymentError::new(PaymentErrorCode::InvalidRequest, "no such price");
        assert_eq!(status_of(err.into()), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn provider_errors_map_to_bad_gateway() {
        for code in [
            PaymentErrorCode::NetworkError,
            PaymentErrorCode::AuthenticationError,
            PaymentErrorCode::RateLimitExceeded,
            PaymentErrorCode::ProviderError,
        ] {
            let err = PaymentError::new(code, "vendor trouble");
            assert_eq!(status_of(err.into()), StatusCode::BAD_GATEWAY);
        }
    }

    #[test]
    fn customer_not_found_maps_to_not_found() {
        let err = BillingError::CustomerNotFound("a@example.com".to_string());
        assert_eq!(status_of(err), StatusCode::NOT_FOUND);
    }

    #[test]
    fn webhook_auth_errors_map_to_unauthorized() {
        let response = WebhookApiError(WebhookError::InvalidSignature).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn webhook_store_errors_map_to_server_error() {
        let response =
            WebhookApiError(WebhookError::Database("down".to_string())).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
