//! Stripe webhook signature verification.
//!
//! Implements secure verification of Stripe webhook signatures using HMAC-SHA256.
//! Includes timestamp validation to prevent replay attacks.
//!
//! Verification always runs against the raw request bytes. Parsing happens
//! only after the signature checks out; a re-serialized body is never
//! byte-identical to what Stripe signed.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::stripe_event::StripeEvent;
use super::webhook_errors::WebhookError;

/// Maximum allowed age for webhook events (5 minutes).
const MAX_EVENT_AGE_SECS: i64 = 300;

/// Maximum allowed clock skew for future events (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

/// Parsed components from the Stripe-Signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signature (HMAC-SHA256).
    pub v1_signature: Vec<u8>,
    /// Optional v0 legacy signature. Parsed but never trusted.
    pub v0_signature: Option<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a Stripe-Signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::ParseError` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signature: Option<Vec<u8>> = None;
        let mut v0_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part
                .split_once('=')
                .ok_or_else(|| WebhookError::ParseError("invalid header format".to_string()))?;

            match key.trim() {
                "t" => {
                    timestamp = Some(value.trim().parse().map_err(|_| {
                        WebhookError::ParseError("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v1 signature hex".to_string())
                    })?);
                }
                "v0" => {
                    v0_signature = Some(hex::decode(value.trim()).map_err(|_| {
                        WebhookError::ParseError("invalid v0 signature hex".to_string())
                    })?);
                }
                _ => {
                    // Ignore unknown fields for forward compatibility
                }
            }
        }

        let timestamp =
            timestamp.ok_or_else(|| WebhookError::ParseError("missing timestamp".to_string()))?;
        let v1_signature = v1_signature
            .ok_or_else(|| WebhookError::ParseError("missing v1 signature".to_string()))?;

        Ok(SignatureHeader {
            timestamp,
            v1_signature,
            v0_signature,
        })
    }
}

/// Verifier for Stripe webhook signatures.
pub struct StripeWebhookVerifier {
    /// The webhook signing secret from the Stripe dashboard.
    secret: String,
}

impl StripeWebhookVerifier {
    /// Creates a new verifier with the given webhook secret.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Verifies the signature over the raw payload without parsing the body.
    ///
    /// # Verification Steps
    ///
    /// 1. Reject if no signing secret is configured
    /// 2. Parse the signature header
    /// 3. Validate timestamp is within acceptable range
    /// 4. Compute expected signature using HMAC-SHA256
    /// 5. Compare signatures using constant-time comparison
    ///
    /// # Errors
    ///
    /// - `MissingSecret` - No signing secret configured
    /// - `InvalidSignature` - Signature verification failed
    /// - `TimestampOutOfRange` - Event is older than 5 minutes
    /// - `InvalidTimestamp` - Event timestamp is in the future
    /// - `ParseError` - Failed to parse the header
    pub fn verify_signature(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<(), WebhookError> {
        if self.secret.is_empty() {
            return Err(WebhookError::MissingSecret);
        }

        let header = SignatureHeader::parse(signature_header)?;

        self.validate_timestamp(header.timestamp)?;

        let expected_signature = self.compute_signature(header.timestamp, payload);

        if !constant_time_compare(&expected_signature, &header.v1_signature) {
            return Err(WebhookError::InvalidSignature);
        }

        Ok(())
    }

    /// Verifies the webhook signature and parses the event.
    ///
    /// Runs `verify_signature` first, then deserializes the payload into a
    /// `StripeEvent`. Parse failures after a valid signature map to
    /// `WebhookError::ParseError`.
    pub fn verify_and_parse(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<StripeEvent, WebhookError> {
        self.verify_signature(payload, signature_header)?;

        let event: StripeEvent = serde_json::from_slice(payload)
            .map_err(|e| WebhookError::ParseError(e.to_string()))?;

        Ok(event)
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64) -> Result<(), WebhookError> {
        let now = chrono::Utc::now().timestamp();
        let age = now - timestamp;

        // Reject events that are too old
        if age > MAX_EVENT_AGE_SECS {
            return Err(WebhookError::TimestampOutOfRange);
        }

        // Reject events from the future (with clock skew tolerance)
        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    /// Computes the HMAC-SHA256 signature for the given timestamp and payload.
    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Vec<u8> {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));

        let mut mac =
            Hmac::<Sha256>::new_from_slice(self.secret.as_bytes()).expect("HMAC accepts any key");
        mac.update(signed_payload.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

/// Performs constant-time comparison of two byte slices.
///
/// This prevents timing attacks that could leak information about the expected signature.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes HMAC-SHA256 for use in test fixtures.
#[cfg(test)]
pub fn compute_test_signature(secret: &str, timestamp: i64, payload: &str) -> String {
    let signed_payload = format!("{}.{}", timestamp, payload);
    let mut mac =
        Hmac::<Sha256>::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key");
    mac.update(signed_payload.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}


#[cfg(test)]
mod signature_properties {
    use super::*;
    use proptest::prelude::*;

    fn sign_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
        let signature =
            compute_test_signature(secret, timestamp, &String::from_utf8_lossy(payload));
        format!("t={},v1={}", timestamp, signature)
    }

    proptest! {
        #[test]
        fn correct_signature_always_verifies(
            payload in "[ -~]{1,200}",
            secret in "whsec_[a-zA-Z0-9]{8,32}",
        ) {
            let verifier = StripeWebhookVerifier::new(secret.clone());
            let timestamp = chrono::Utc::now().timestamp();
            let header = sign_header(&secret, timestamp, payload.as_bytes());

            prop_assert!(verifier.verify_signature(payload.as_bytes(), &header).is_ok());
        }

        #[test]
        fn single_bit_mutation_always_fails(
            payload in "[ -~]{1,200}",
            secret in "whsec_[a-zA-Z0-9]{8,32}",
            byte_index in any::<prop::sample::Index>(),
            bit in 0u8..7,
        ) {
            let verifier = StripeWebhookVerifier::new(secret.clone());
            let timestamp = chrono::Utc::now().timestamp();
            let header = sign_header(&secret, timestamp, payload.as_bytes());

            let mut mutated = payload.clone().into_bytes();
            let idx = byte_index.index(mutated.len());
            mutated[idx] ^= 1 << bit;

            prop_assert!(matches!(
                verifier.verify_signature(&mutated, &header),
                Err(WebhookError::InvalidSignature)
            ));
        }

        #[test]
        fn different_secret_always_fails(
            payload in "[ -~]{1,200}",
            secret in "whsec_[a-zA-Z0-9]{8,32}",
            other in "whsec_[a-zA-Z0-9]{8,32}",
        ) {
            prop_assume!(secret != other);

            let verifier = StripeWebhookVerifier::new(other);
            let timestamp = chrono::Utc::now().timestamp();
            let header = sign_header(&secret, timestamp, payload.as_bytes());

            prop_assert!(matches!(
                verifier.verify_signature(payload.as_bytes(), &header),
                Err(WebhookError::InvalidSignature)
            ));
        }
    }
}
