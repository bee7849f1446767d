//! Mock payment provider for testing.
//!
//! Provides a configurable mock implementation of `PaymentProvider` for unit
//! and integration tests. Supports:
//! - Pre-configured responses
//! - Error injection
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CreateCustomerRequest, CreatePaymentIntentRequest, Customer, PaymentError, PaymentIntent,
    PaymentProvider, PortalSession,
};

/// Mock payment provider for testing.
///
/// # Example
///
/// ```ignore
/// let mock = MockPaymentProvider::new();
///
/// // Configure responses
/// mock.add_customer(Customer { id: "cus_123".into(), ... });
///
/// // Inject errors
/// mock.set_error(PaymentError::new(PaymentErrorCode::CardError, "declined"));
///
/// // Use in tests
/// let result = mock.create_payment_intent(request).await;
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    /// Inner state (thread-safe for async tests).
    inner: Arc<Mutex<MockState>>,
}

/// Internal mutable state.
#[derive(Default)]
struct MockState {
    /// Pre-configured customers by ID.
    customers: HashMap<String, Customer>,

    /// Next customer to return from `create_customer`.
    next_customer: Option<Customer>,

    /// Next payment intent to return.
    next_intent: Option<PaymentIntent>,

    /// Next portal session to return.
    next_portal: Option<PortalSession>,

    /// Error to return on next call.
    next_error: Option<PaymentError>,

    /// Specific errors by method name.
    method_errors: HashMap<String, PaymentError>,

    /// Track method calls for assertions.
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    /// Create a new mock provider with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock with a pre-configured customer.
    pub fn with_customer(id: &str, email: &str) -> Self {
        let mock = Self::new();
        mock.add_customer(Customer {
            id: id.to_string(),
            email: email.to_string(),
            name: Some("Test Customer".to_string()),
            created_at: chrono::Utc::now().timestamp(),
        });
        mock
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Add a customer to the "database" (found by ID or email lookup).
    pub fn add_customer(&self, customer: Customer) {
        let id = customer.id.clone();
        self.inner.lock().unwrap().customers.insert(id, customer);
    }

    /// Set the customer to return on next `create_customer` call.
    pub fn set_customer(&self, customer: Customer) {
        self.inner.lock().unwrap().next_customer = Some(customer);
    }

    /// Set the payment intent to return.
    pub fn set_payment_intent(&self, intent: PaymentIntent) {
        self.inner.lock().unwrap().next_intent = Some(intent);
    }

    /// Set the portal session to return.
    pub fn set_portal_session(&self, session: PortalSession) {
        self.inner.lock().unwrap().next_portal = Some(session);
    }

    /// Set an error to return on the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    /// Set an error for a specific method.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.inner
            .lock()
            .unwrap()
            .method_errors
            .insert(method.to_string(), error);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    /// Get all recorded method calls.
    pub fn calls(&self) -> Vec<MethodCall> {
        self.inner.lock().unwrap().call_log.clone()
    }

    /// Check if a method was called.
    pub fn was_called(&self, method: &str) -> bool {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .any(|c| c.method == method)
    }

    /// Get count of calls to a method.
    pub fn call_count(&self, method: &str) -> usize {
        self.inner
            .lock()
            .unwrap()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.inner.lock().unwrap().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.inner.lock().unwrap();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        // Global error is consumed by the first call that hits it
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }

    fn short_id(prefix: &str) -> String {
        let uuid = uuid::Uuid::new_v4().to_string();
        let head = uuid.split('-').next().unwrap_or("0");
        format!("{}_{}", prefix, head)
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, PaymentError> {
        self.record_call("find_customer_by_email", vec![email.to_string()]);
        self.check_error("find_customer_by_email")?;

        let state = self.inner.lock().unwrap();
        Ok(state
            .customers
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn create_customer(
        &self,
        request: CreateCustomerRequest,
    ) -> Result<Customer, PaymentError> {
        self.record_call("create_customer", vec![request.email.clone()]);
        self.check_error("create_customer")?;

        let mut state = self.inner.lock().unwrap();

        let customer = state.next_customer.take().unwrap_or_else(|| Customer {
            id: Self::short_id("cus_mock"),
            email: request.email,
            name: request.name,
            created_at: chrono::Utc::now().timestamp(),
        });

        // Store for later lookup
        state.customers.insert(customer.id.clone(), customer.clone());

        Ok(customer)
    }

    async fn create_payment_intent(
        &self,
        request: CreatePaymentIntentRequest,
    ) -> Result<PaymentIntent, PaymentError> {
        self.record_call(
            "create_payment_intent",
            vec![
                request.customer_id.clone(),
                request.amount.to_string(),
                request.currency.clone(),
            ],
        );
        self.check_error("create_payment_intent")?;

        let mut state = self.inner.lock().unwrap();

        let intent = state.next_intent.take().unwrap_or_else(|| {
            let id = Self::short_id("pi_mock");
            PaymentIntent {
                client_secret: Some(format!("{}_secret", id)),
                id,
                status: "requires_confirmation".to_string(),
                amount: request.amount,
                currency: request.currency,
                customer_id: Some(request.customer_id),
            }
        });

        Ok(intent)
    }

    async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, PaymentError> {
        self.record_call(
            "create_portal_session",
            vec![customer_id.to_string(), return_url.to_string()],
        );
        self.check_error("create_portal_session")?;

        let mut state = self.inner.lock().unwrap();

        let session = state.next_portal.take().unwrap_or_else(|| {
            let id = Self::short_id("bps_mock");
            PortalSession {
                url: format!("https://billing.stripe.com/p/session/{}", id),
                id,
            }
        });

        Ok(session)
    }
}
