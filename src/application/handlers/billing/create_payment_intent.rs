//! CreatePaymentIntentHandler - Command handler for creating payment intents.
//!
//! Resolves the customer by email (creating one on first contact), then
//! creates the intent with the validated amount and forwarded metadata.

use std::sync::Arc;

use crate::domain::billing::{PaymentIntentInput, PaymentIntentRequest};
use crate::ports::{CreateCustomerRequest, CreatePaymentIntentRequest, PaymentIntent, PaymentProvider};

use super::BillingError;

/// Handler for creating payment intents.
pub struct CreatePaymentIntentHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePaymentIntentHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(&self, input: PaymentIntentInput) -> Result<PaymentIntent, BillingError> {
        let request = PaymentIntentRequest::validate(input)?;

        let customer = match self
            .payment_provider
            .find_customer_by_email(request.customer_email())
            .await?
        {
            Some(customer) => customer,
            None => {
                self.payment_provider
                    .create_customer(CreateCustomerRequest {
                        email: request.customer_email().to_string(),
                        name: request.customer_name().map(String::from),
                    })
                    .await?
            }
        };

        let intent = self
            .payment_provider
            .create_payment_intent(CreatePaymentIntentRequest {
                amount: request.amount(),
                currency: request.currency().to_string(),
                customer_id: customer.id.clone(),
                payment_method_id: request.payment_method_id().map(String::from),
                metadata: request.metadata(),
            })
            .await?;

        tracing::info!(
            intent_id = %intent.id,
            customer_id = %customer.id,
            amount = intent.amount,
            currency = %intent.currency,
            "Payment intent created"
        );

        Ok(intent)
    }
}
