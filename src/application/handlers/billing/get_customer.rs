//! GetCustomerHandler - Query handler for customer lookup by email.

use std::sync::Arc;

use crate::ports::{Customer, PaymentProvider};

use super::BillingError;

/// Handler for looking up a vendor customer by email.
pub struct GetCustomerHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl GetCustomerHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(&self, email: &str) -> Result<Customer, BillingError> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(BillingError::Validation(
                crate::domain::foundation::ValidationError::invalid_format(
                    "email",
                    "must be a valid email address",
                ),
            ));
        }

        self.payment_provider
            .find_customer_by_email(email)
            .await?
            .ok_or_else(|| BillingError::CustomerNotFound(email.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::stripe::MockPaymentProvider;

    #[tokio::test]
    async fn finds_existing_customer() {
        let provider = Arc::new(MockPaymentProvider::with_customer(
            "cus_1",
            "member@example.com",
        ));
        let handler = GetCustomerHandler::new(provider);

        let customer = handler.handle("member@example.com").await.unwrap();
        assert_eq!(customer.id, "cus_1");
    }

    #[tokio::test]
    async fn missing_customer_is_not_found() {
        let provider = Arc::new(MockPaymentProvider::new());
        let handler = GetCustomerHandler::new(provider);

        let result = handler.handle("ghost@example.com").await;
        assert!(matches!(result, Err(BillingError::CustomerNotFound(_))));
    }

    #[tokio::test]
    async fn malformed_email_is_rejected_locally() {
        let provider = Arc::new(MockPaymentProvider::new());
        let handler = GetCustomerHandler::new(provider.clone());

        let result = handler.handle("not-an-email").await;

        assert!(matches!(result, Err(BillingError::Validation(_))));
        assert!(provider.calls().is_empty());
    }
}
