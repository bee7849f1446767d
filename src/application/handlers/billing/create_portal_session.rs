//! CreatePortalSessionHandler - Command handler for billing portal sessions.

use std::sync::Arc;

use crate::domain::billing::{CustomerSelector, PortalSessionRequest};
use crate::ports::{PaymentProvider, PortalSession};

use super::BillingError;

/// Handler for creating billing portal sessions.
pub struct CreatePortalSessionHandler {
    payment_provider: Arc<dyn PaymentProvider>,
}

impl CreatePortalSessionHandler {
    pub fn new(payment_provider: Arc<dyn PaymentProvider>) -> Self {
        Self { payment_provider }
    }

    pub async fn handle(
        &self,
        request: PortalSessionRequest,
    ) -> Result<PortalSession, BillingError> {
        let customer_id = match request.customer() {
            CustomerSelector::Id(id) => id.clone(),
            CustomerSelector::Email(email) => {
                let customer = self
                    .payment_provider
                    .find_customer_by_email(email)
                    .await?
                    .ok_or_else(|| BillingError::CustomerNotFound(email.clone()))?;
                customer.id
            }
        };

        let session = self
            .payment_provider
            .create_portal_session(&customer_id, request.return_url())
            .await?;

        tracing::info!(
            session_id = %session.id,
            customer_id = %customer_id,
            "Billing portal session created"
        );

        Ok(session)
    }
}
