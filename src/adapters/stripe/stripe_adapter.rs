//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` trait over Stripe's REST API.
//! All requests use form encoding and HTTP basic auth with the secret
//! API key, per Stripe's API conventions.
//!
//! # Configuration
//!
//! ```ignore
//! let config = StripeConfig::new(api_key);
//! let adapter = StripePaymentAdapter::new(config);
//! ```

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, Customer, PaymentError, PaymentErrorCode,
    PaymentIntent, PaymentProvider, PortalSession,
};

use super::api_types::{
    StripeCustomer, StripeCustomerList, StripeErrorEnvelope, StripePaymentIntent,
    StripePortalSession,
};

/// Stripe API configuration.
#[derive(Clone)]
pub struct StripeConfig {
    /// Stripe secret API key (sk_live_... or sk_test_...).
    api_key: SecretString,

    /// Base URL for Stripe API (default: https://api.stripe.com).
    api_base_url: String,
}

impl StripeConfig {
    /// Create a new Stripe configuration.
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            api_base_url: "https://api.stripe.com".to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }
}

/// Stripe payment provider adapter.
pub struct StripePaymentAdapter {
    config: StripeConfig,
    http_client: reqwest::Client,
}

impl StripePaymentAdapter {
    /// Create a new Stripe adapter with the given configuration.
    pub fn new(config: StripeConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    /// Translate a non-success Stripe response into a `PaymentError`.
    ///
    /// Stripe wraps errors in `{"error": {"type", "code", "message"}}`.
    /// The error class maps onto our error codes; the fine-grained code
    /// (e.g. "card_declined") is preserved as the provider code.
    async fn map_error_response(&self, operation: &str, response: reqwest::Response) -> PaymentError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let parsed: Option<StripeErrorEnvelope> = serde_json::from_str(&body).ok();
        let (error_type, provider_code, message) = match &parsed {
            Some(envelope) => (
                envelope.error.error_type.as_deref().unwrap_or(""),
                envelope.error.code.clone(),
                envelope
                    .error
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("Stripe API error ({})", status)),
            ),
            None => ("", None, format!("Stripe API error ({}): {}", status, body)),
        };

        let code = match error_type {
            "card_error" => PaymentErrorCode::CardError,
            "invalid_request_error" => PaymentErrorCode::InvalidRequest,
            "authentication_error" => PaymentErrorCode::AuthenticationError,
            "rate_limit_error" => PaymentErrorCode::RateLimitExceeded,
            _ if status == reqwest::StatusCode::UNAUTHORIZED => {
                PaymentErrorCode::AuthenticationError
            }
            _ if status == reqwest::StatusCode::TOO_MANY_REQUESTS => {
                PaymentErrorCode::RateLimitExceeded
            }
            _ if status.is_server_error() => PaymentErrorCode::ProviderError,
            _ => PaymentErrorCode::ProviderError,
        };

        tracing::error!(
            operation = operation,
            status = status.as_u16(),
            error_type = error_type,
            provider_code = provider_code.as_deref().unwrap_or(""),
            "Stripe request failed"
        );

        let mut error = PaymentError::new(code, message);
        if let Some(provider_code) = provider_code {
            error = error.with_provider_code(provider_code);
        }
        error
    }

    fn parse_error(operation: &str) -> impl Fn(reqwest::Error) -> PaymentError + '_ {
        move |e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse Stripe {} response: {}", operation, e),
            )
        }
    }
}

#[async_trait]
impl PaymentProvider for StripePaymentAdapter {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, PaymentError> {
        let url = format!("{}/v1/customers", self.config.api_base_url);

        let response = self
            .http_client
            .get(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.map_error_response("find_customer_by_email", response).await);
        }

        let list: StripeCustomerList = response
            .json()
            .await
            .map_err(Self::parse_error("customer list"))?;

        let customer = list
            .data
            .into_iter()
            .find(|c| !c.deleted)
            .map(|c| Customer {
                id: c.id,
                email: c.email.unwrap_or_else(|| email.to_string()),
                name: c.name,
                created_at: c.created,
            });

        Ok(customer)
    }

    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        let url = format!("{}/v1/customers", self.config.api_base_url);

        let mut params = vec![("email", request.email.clone())];
        if let Some(name) = &request.name {
            params.push(("name", name.clone()));
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.map_error_response("create_customer", response).await);
        }

        let stripe_customer: StripeCustomer = response
            .json()
            .await
            .map_err(Self::parse_error("customer"))?;

        Ok(Customer {
            id: stripe_customer.id,
            email: stripe_customer.email.unwrap_or(request.email),
            name: stripe_customer.name.or(request.name),
            created_at: stripe_customer.created,
        })
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let mut params = vec![
            ("amount".to_string(), request.amount.to_string()),
            ("currency".to_string(), request.currency.clone()),
            ("customer".to_string(), request.customer_id.clone()),
        ];

        if let Some(payment_method_id) = &request.payment_method_id {
            params.push(("payment_method".to_string(), payment_method_id.clone()));
        }

        for (key, value) in &request.metadata {
            params.push((format!("metadata[{}]", key), value.clone()));
        }

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.map_error_response("create_payment_intent", response).await);
        }

        let intent: StripePaymentIntent = response
            .json()
            .await
            .map_err(Self::parse_error("payment intent"))?;

        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
            status: intent.status,
            amount: intent.amount,
            currency: intent.currency,
            customer_id: intent.customer,
        })
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        let url = format!("{}/v1/billing_portal/sessions", self.config.api_base_url);

        let params = [("customer", customer_id), ("return_url", return_url)];

        let response = self
            .http_client
            .post(&url)
            .basic_auth(self.config.api_key.expose_secret(), Option::<&str>::None)
            .form(&params)
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(self.map_error_response("create_portal_session", response).await);
        }

        let session: StripePortalSession = response
            .json()
            .await
            .map_err(Self::parse_error("portal session"))?;

        Ok(PortalSession {
            id: session.id,
            url: session.url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> StripeConfig {
        StripeConfig::new(SecretString::new("sk_test_abc123".to_string()))
            .with_base_url("http://localhost:12345")
    }

    #[test]
    fn config_defaults_to_live_api_url() {
        let config = StripeConfig::new(SecretString::new("sk_test_abc".to_string()));
        assert_eq!(config.api_base_url, "https://api.stripe.com");
    }

    #[test]
    fn config_base_url_override() {
        let config = test_config();
        assert_eq!(config.api_base_url, "http://localhost:12345");
    }

    #[tokio::test]
    async fn network_failure_maps_to_network_error() {
        // Nothing listens on this port, so the request fails at connect.
        let adapter = StripePaymentAdapter::new(
            StripeConfig::new(SecretString::new("sk_test_abc".to_string()))
                .with_base_url("http://127.0.0.1:1"),
        );

        let result = adapter.find_customer_by_email("nobody@example.com").await;
        let error = result.unwrap_err();
        assert_eq!(error.code, PaymentErrorCode::NetworkError);
        assert!(error.retryable);
    }
}
