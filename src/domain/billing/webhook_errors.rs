//! Webhook error types for Stripe webhook handling.
//!
//! Defines all error conditions that can occur during webhook ingress,
//! with HTTP status code mapping and retryability semantics.

use axum::http::StatusCode;
use thiserror::Error;

/// Errors that occur during webhook ingress.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The Stripe-Signature header was not present on the request.
    #[error("Missing signature header")]
    MissingSignatureHeader,

    /// No webhook signing secret is configured for this environment.
    #[error("Webhook signing secret not configured")]
    MissingSecret,

    /// Webhook signature verification failed.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Webhook timestamp is outside the acceptable window (5 minutes).
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Event timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Failed to parse webhook payload or signature header.
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Processed-event store operation failed.
    #[error("Database error: {0}")]
    Database(String),
}

impl WebhookError {
    /// Returns true if Stripe should retry delivering this webhook.
    ///
    /// Only a store failure is retryable: the event was never claimed, so a
    /// redelivery can still be processed. Authentication and parse failures
    /// will fail identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, WebhookError::Database(_))
    }

    /// Maps the error to an appropriate HTTP status code.
    ///
    /// Status codes determine Stripe's retry behavior:
    /// - 2xx: Event acknowledged, no retry
    /// - 4xx: Client error, no retry
    /// - 5xx: Server error, will retry
    pub fn status_code(&self) -> StatusCode {
        match self {
            // Auth failures, including both replay-window violations - don't retry
            WebhookError::MissingSignatureHeader
            | WebhookError::MissingSecret
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp => StatusCode::UNAUTHORIZED,

            // Malformed input - don't retry
            WebhookError::ParseError(_) => StatusCode::BAD_REQUEST,

            // Store failures - the claim never happened, retry is safe
            WebhookError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
