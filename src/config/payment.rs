//! Payment configuration
//!
//! Secrets stay wrapped in `SecretString` from the moment they are
//! deserialized; they never appear in Debug output or logs.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;

/// Payment configuration (Stripe)
#[derive(Clone, Deserialize)]
pub struct PaymentConfig {
    /// Stripe secret API key (sk_test_... or sk_live_...)
    pub stripe_api_key: SecretString,

    /// Stripe webhook signing secret (whsec_...)
    pub stripe_webhook_secret: SecretString,

    /// Base URL override for the Stripe API (tests and local stubs)
    pub api_base_url: Option<String>,
}

impl std::fmt::Debug for PaymentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentConfig")
            .field("stripe_api_key", &"[REDACTED]")
            .field("stripe_webhook_secret", &"[REDACTED]")
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl PaymentConfig {
    /// Check if using Stripe test mode
    pub fn is_test_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_test_")
    }

    /// Check if using Stripe live mode
    pub fn is_live_mode(&self) -> bool {
        self.stripe_api_key.expose_secret().starts_with("sk_live_")
    }

    /// Validate payment configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let api_key = self.stripe_api_key.expose_secret();
        if api_key.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__STRIPE_API_KEY"));
        }
        if !api_key.starts_with("sk_") {
            return Err(ValidationError::InvalidStripeKey);
        }

        let webhook_secret = self.stripe_webhook_secret.expose_secret();
        if webhook_secret.is_empty() {
            return Err(ValidationError::MissingRequired(
                "PAYMENT__STRIPE_WEBHOOK_SECRET",
            ));
        }
        if !webhook_secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidStripeWebhookSecret);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(api_key: &str, webhook_secret: &str) -> PaymentConfig {
        PaymentConfig {
            stripe_api_key: SecretString::new(api_key.to_string()),
            stripe_webhook_secret: SecretString::new(webhook_secret.to_string()),
            api_base_url: None,
        }
    }

    #[test]
    fn test_mode_detection() {
        let c = config("sk_test_xxx", "whsec_xxx");
        assert!(c.is_test_mode());
        assert!(!c.is_live_mode());
    }

    #[test]
    fn live_mode_detection() {
        let c = config("sk_live_xxx", "whsec_xxx");
        assert!(c.is_live_mode());
        assert!(!c.is_test_mode());
    }

    #[test]
    fn missing_api_key_fails_validation() {
        assert!(config("", "whsec_xxx").validate().is_err());
    }

    #[test]
    fn wrong_api_key_prefix_fails_validation() {
        // Publishable keys must never be accepted where a secret key belongs.
        assert!(config("pk_test_xxx", "whsec_xxx").validate().is_err());
    }

    #[test]
    fn wrong_webhook_secret_prefix_fails_validation() {
        assert!(config("sk_test_xxx", "secret_xxx").validate().is_err());
    }

    #[test]
    fn valid_config_passes() {
        assert!(config("sk_test_abcd1234", "whsec_xyz789").validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let c = config("sk_test_supersecret", "whsec_alsosecret");
        let debug = format!("{:?}", c);
        assert!(!debug.contains("supersecret"));
        assert!(!debug.contains("alsosecret"));
        assert!(debug.contains("REDACTED"));
    }
}
