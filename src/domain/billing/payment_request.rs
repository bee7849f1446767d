//! Validated request types for the payment proxy endpoints.
//!
//! Every field check happens here, before any call leaves the service.
//! A request that fails validation never reaches the payment provider.

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::domain::foundation::ValidationError;

/// Largest accepted amount in minor units (Stripe's 8-digit ceiling).
const MAX_AMOUNT_MINOR_UNITS: i64 = 99_999_999;

/// Currencies this service accepts for payment intents.
static SUPPORTED_CURRENCIES: Lazy<Vec<&'static str>> = Lazy::new(|| {
    vec![
        "usd", "eur", "gbp", "cad", "aud", "nzd", "chf", "sek", "nok", "dkk", "jpy", "sgd",
        "hkd", "mxn", "brl", "inr", "pln", "czk",
    ]
});

/// Raw payment-intent input as it arrives on the wire.
///
/// All fields optional; validation decides what is required.
#[derive(Debug, Clone, Default)]
pub struct PaymentIntentInput {
    pub amount: Option<i64>,
    pub currency: Option<String>,
    pub payment_method_id: Option<String>,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub plan_type: Option<String>,
    pub user_country: Option<String>,
}

/// A validated payment-intent request.
///
/// Construction is the only way to obtain one, so holding a value proves
/// the required fields were present and well formed.
#[derive(Debug, Clone)]
pub struct PaymentIntentRequest {
    amount: i64,
    currency: String,
    customer_email: String,
    customer_name: Option<String>,
    payment_method_id: Option<String>,
    plan_type: Option<String>,
    user_country: Option<String>,
}

impl PaymentIntentRequest {
    /// Validates raw input into a well-formed request.
    ///
    /// Required: positive `amount`, supported `currency`, plausible
    /// `customer_email`. Everything else passes through untouched.
    pub fn validate(input: PaymentIntentInput) -> Result<Self, ValidationError> {
        let amount = input
            .amount
            .ok_or_else(|| ValidationError::empty_field("amount"))?;
        if amount <= 0 || amount > MAX_AMOUNT_MINOR_UNITS {
            return Err(ValidationError::out_of_range(
                "amount",
                1,
                MAX_AMOUNT_MINOR_UNITS,
                amount,
            ));
        }

        let currency = input
            .currency
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .ok_or_else(|| ValidationError::empty_field("currency"))?
            .to_lowercase();
        if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
            return Err(ValidationError::invalid_format(
                "currency",
                format!("unsupported currency code '{}'", currency),
            ));
        }

        let customer_email = validate_email(input.customer_email.as_deref())?;

        Ok(Self {
            amount,
            currency,
            customer_email,
            customer_name: non_empty(input.customer_name),
            payment_method_id: non_empty(input.payment_method_id),
            plan_type: non_empty(input.plan_type),
            user_country: non_empty(input.user_country),
        })
    }

    pub fn amount(&self) -> i64 {
        self.amount
    }

    pub fn currency(&self) -> &str {
        &self.currency
    }

    pub fn customer_email(&self) -> &str {
        &self.customer_email
    }

    pub fn customer_name(&self) -> Option<&str> {
        self.customer_name.as_deref()
    }

    pub fn payment_method_id(&self) -> Option<&str> {
        self.payment_method_id.as_deref()
    }

    /// Metadata forwarded to the payment provider alongside the intent.
    pub fn metadata(&self) -> HashMap<String, String> {
        let mut metadata = HashMap::new();
        if let Some(plan) = &self.plan_type {
            metadata.insert("plan_type".to_string(), plan.clone());
        }
        if let Some(country) = &self.user_country {
            metadata.insert("user_country".to_string(), country.clone());
        }
        metadata
    }
}

/// A validated billing-portal session request.
#[derive(Debug, Clone)]
pub struct PortalSessionRequest {
    customer: CustomerSelector,
    return_url: String,
}

/// How the caller identifies the customer for a portal session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerSelector {
    /// Vendor customer id (cus_xxx).
    Id(String),
    /// Email address, to be resolved through customer lookup.
    Email(String),
}

impl PortalSessionRequest {
    /// Validates portal-session input.
    ///
    /// One of `customer_id` / `customer_email` is required (id wins when both
    /// are present), plus an http(s) `return_url`.
    pub fn validate(
        customer_id: Option<String>,
        customer_email: Option<String>,
        return_url: Option<String>,
    ) -> Result<Self, ValidationError> {
        let customer = match non_empty(customer_id) {
            Some(id) => CustomerSelector::Id(id),
            None => CustomerSelector::Email(validate_email(customer_email.as_deref())?),
        };

        let return_url = non_empty(return_url)
            .ok_or_else(|| ValidationError::empty_field("return_url"))?;
        if !return_url.starts_with("http://") && !return_url.starts_with("https://") {
            return Err(ValidationError::invalid_format(
                "return_url",
                "must be an http(s) URL",
            ));
        }

        Ok(Self {
            customer,
            return_url,
        })
    }

    pub fn customer(&self) -> &CustomerSelector {
        &self.customer
    }

    pub fn return_url(&self) -> &str {
        &self.return_url
    }
}

fn validate_email(email: Option<&str>) -> Result<String, ValidationError> {
    let email = email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .ok_or_else(|| ValidationError::empty_field("customer_email"))?;

    match email.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && domain.contains('.') && !domain.starts_with('.') =>
        {
            Ok(email.to_string())
        }
        _ => Err(ValidationError::invalid_format(
            "customer_email",
            "not a plausible email address",
        )),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
