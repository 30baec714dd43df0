//! Draft Payloads
//!
//! UI-free counterparts of the payment and subscription forms: collect
//! what the operator entered, check it against the selected provider's
//! capabilities, and produce the create request. Configuration problems
//! surface here, synchronously, before any network call.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value, json};

use payops_core::{ConsoleError, PaymentMethod, ProviderDescriptor, Result};

use crate::requests::{CreatePaymentRequest, CreateSubscriptionRequest};

/// Shopper details for providers that collect cards on a hosted page
#[derive(Clone, Debug, Default)]
pub struct HostedCheckoutDetails {
    pub first_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub product_info: Option<String>,

    /// Return-URL overrides for the hosted page
    pub success_url: Option<String>,
    pub failure_url: Option<String>,
    pub cancel_url: Option<String>,
}

impl HostedCheckoutDetails {
    /// Render into the provider's metadata entry (original wire keys)
    fn to_metadata_entry(&self, provider: &ProviderDescriptor) -> Result<Map<String, Value>> {
        let first_name = non_empty(&self.first_name).ok_or_else(|| {
            ConsoleError::Config(format!("{} requires the customer first name.", provider.label()))
        })?;
        let email = non_empty(&self.email).ok_or_else(|| {
            ConsoleError::Config(format!("{} requires the customer email address.", provider.label()))
        })?;

        let mut entry = Map::new();
        entry.insert("firstname".into(), json!(first_name));
        entry.insert("email".into(), json!(email));

        for (key, value) in [
            ("phone", &self.phone),
            ("productinfo", &self.product_info),
            ("surl", &self.success_url),
            ("furl", &self.failure_url),
            ("curl", &self.cancel_url),
        ] {
            if let Some(value) = non_empty(value) {
                entry.insert(key.into(), json!(value));
            }
        }

        Ok(entry)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// A one-time payment being prepared
#[derive(Clone, Debug)]
pub struct PaymentDraft {
    pub amount: Decimal,
    pub currency: String,
    pub description: Option<String>,

    /// Stored method to charge (stored-method providers only)
    pub payment_method_id: Option<String>,

    /// Shopper details (hosted-checkout providers only)
    pub hosted: HostedCheckoutDetails,
}

impl PaymentDraft {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            description: None,
            payment_method_id: None,
            hosted: HostedCheckoutDetails::default(),
        }
    }

    /// Validate against the selected provider and build the request.
    ///
    /// `stored_methods` is the customer's method list for the provider;
    /// the selected method's mandate id is carried along when present.
    pub fn build(
        &self,
        customer_id: &str,
        provider: Option<&ProviderDescriptor>,
        stored_methods: &[PaymentMethod],
    ) -> Result<CreatePaymentRequest> {
        let provider = provider.ok_or_else(|| {
            ConsoleError::Config("Select a provider before processing a payment".into())
        })?;

        if self.amount <= Decimal::ZERO {
            return Err(ConsoleError::Config("Amount must be greater than zero".into()));
        }
        if self.currency.trim().is_empty() {
            return Err(ConsoleError::Config("Currency is required".into()));
        }

        let mut request = CreatePaymentRequest {
            amount: self.amount,
            currency: self.currency.clone(),
            customer_id: customer_id.into(),
            description: self.description.clone(),
            payment_method_id: None,
            mandate_id: None,
            provider: Some(provider.name.clone()),
            metadata: None,
        };

        if provider.supports_payment_methods {
            let method_id = non_empty(&self.payment_method_id)
                .ok_or_else(|| ConsoleError::Config("Please select a payment method".into()))?;

            let selected = stored_methods.iter().find(|m| m.id == method_id);
            request.mandate_id = selected.and_then(|m| m.mandate_id.clone());
            request.payment_method_id = Some(method_id.into());
        } else {
            let entry = self.hosted.to_metadata_entry(provider)?;
            request.metadata =
                Some(HashMap::from([(provider.name.clone(), Value::Object(entry))]));
        }

        Ok(request)
    }
}

/// Standing-instruction schedule for recurring gateway debits
#[derive(Clone, Debug)]
pub struct StandingInstruction {
    pub start_date: NaiveDate,

    /// "daily", "weekly", "monthly", "yearly"
    pub period: String,

    /// Number of debit cycles authorized
    pub cycles: u32,
}

/// A subscription being prepared
#[derive(Clone, Debug)]
pub struct SubscriptionDraft {
    pub plan_id: String,
    pub quantity: u32,
    pub trial_period_days: Option<u32>,

    /// Shopper details (hosted-checkout providers only)
    pub hosted: HostedCheckoutDetails,

    /// Gateway-side debit schedule (hosted mandate providers only)
    pub standing_instruction: Option<StandingInstruction>,
}

impl SubscriptionDraft {
    pub fn new(plan_id: impl Into<String>) -> Self {
        Self {
            plan_id: plan_id.into(),
            quantity: 1,
            trial_period_days: None,
            hosted: HostedCheckoutDetails::default(),
            standing_instruction: None,
        }
    }

    /// Validate against the selected provider and build the request
    pub fn build(&self, provider: Option<&ProviderDescriptor>) -> Result<CreateSubscriptionRequest> {
        if self.plan_id.trim().is_empty() {
            return Err(ConsoleError::Config("Please select a plan".into()));
        }
        if self.quantity == 0 {
            return Err(ConsoleError::Config("Quantity must be at least 1".into()));
        }

        let mut request = CreateSubscriptionRequest {
            plan_id: self.plan_id.clone(),
            quantity: self.quantity,
            trial_period_days: self.trial_period_days,
            provider: provider.map(|p| p.name.clone()),
            metadata: None,
        };

        if self.standing_instruction.is_some() && provider.is_none() {
            return Err(ConsoleError::Config(
                "Select a provider before scheduling standing instructions".into(),
            ));
        }

        if let Some(provider) = provider {
            if !provider.supports_payment_methods {
                let mut entry = self.hosted.to_metadata_entry(provider)?;

                if let Some(si) = &self.standing_instruction {
                    entry.insert(
                        "si_start_date".into(),
                        json!(si.start_date.format("%d-%m-%Y").to_string()),
                    );
                    entry.insert("si_period".into(), json!(si.period));
                    entry.insert("si_cycles".into(), json!(si.cycles.to_string()));
                }

                request.metadata =
                    Some(HashMap::from([(provider.name.clone(), Value::Object(entry))]));
            }
        }

        Ok(request)
    }
}
