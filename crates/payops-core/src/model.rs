//! Backend Resource Models
//!
//! Wire types for the payments backend. Timestamps stay as the ISO strings
//! the backend emits; amounts are `Decimal` (never `f64` for money).
//! Resource `status` fields are open string sets on the wire (casing varies
//! by provider), so helpers compare case-insensitively.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use crate::intent::Continuation;

fn default_true() -> bool {
    true
}

fn default_quantity() -> u32 {
    1
}

/// A customer record
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,

    /// Free-form metadata echoed back by the backend
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<HashMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,

    /// Primary gateway-side customer id, when a single provider is linked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_customer_id: Option<String>,

    /// All linked gateway-side customer ids
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_customers: Option<Vec<ProviderCustomer>>,
}

/// A gateway-side customer link
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderCustomer {
    pub provider: String,
    pub provider_customer_id: String,
}

/// Card summary on a stored payment method (PAN is never returned)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last4: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_month: Option<u8>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp_year: Option<u16>,
}

/// A stored payment method
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: String,

    /// Method type, "card" for everything this console creates
    #[serde(rename = "type")]
    pub method_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardSummary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default)]
    pub is_default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Standing-instruction mandate backing this method, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandate_id: Option<String>,
}

impl PaymentMethod {
    /// Short label for pickers, e.g. "VISA •••• 4242"
    pub fn label(&self) -> String {
        match &self.card {
            Some(card) => format!(
                "{} •••• {}",
                card.brand.as_deref().unwrap_or("CARD").to_uppercase(),
                card.last4.as_deref().unwrap_or("????"),
            ),
            None => self.id.clone(),
        }
    }
}

/// A product (billable offering)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default = "default_true")]
    pub active: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<HashMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_product_id: Option<String>,
}

/// A pricing plan attached to a product
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    pub product_id: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// "subscription", "per_user", "tiered", ...
    pub pricing_model: String,

    pub amount: Decimal,
    pub currency: String,

    /// "day", "week", "month", "year"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_interval: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_interval_count: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<HashMap<String, Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_price_id: Option<String>,
}

impl Plan {
    /// Picker label, e.g. "Starter ($9.99/month)"
    pub fn label(&self) -> String {
        match &self.billing_interval {
            Some(interval) => format!("{} ({} {}/{})", self.name, self.amount, self.currency, interval),
            None => format!("{} ({} {})", self.name, self.amount, self.currency),
        }
    }
}

/// A one-time payment
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Payment {
    pub id: String,
    pub amount: Decimal,
    pub currency: String,
    pub status: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_payment_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refunded_amount: Option<Decimal>,

    /// Checkout handoff data (embedded config, redirects, provider metadata)
    #[serde(flatten)]
    pub continuation: Continuation,
}

impl Payment {
    pub fn is_completed(&self) -> bool {
        self.status.eq_ignore_ascii_case("completed")
    }
}

/// A recurring subscription
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Subscription {
    pub id: String,
    pub customer_id: String,
    pub plan_id: String,
    pub status: String,

    #[serde(default = "default_quantity")]
    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_start: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_period_end: Option<String>,

    #[serde(default)]
    pub cancel_at_period_end: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_subscription_id: Option<String>,

    /// Standing-instruction mandate token, when the gateway issued one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandate_token: Option<String>,

    /// Checkout handoff data (embedded config, redirects, provider metadata)
    #[serde(flatten)]
    pub continuation: Continuation,
}

impl Subscription {
    pub fn is_active(&self) -> bool {
        self.status.eq_ignore_ascii_case("active") || self.status.eq_ignore_ascii_case("trialing")
    }
}

/// Status of an asynchronous backend sync job
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobStatus {
    Pending,
    Running,
    InProgress,
    Completed,
    Failed,
}

impl SyncJobStatus {
    /// Terminal states stop the poller
    pub fn is_terminal(self) -> bool {
        matches!(self, SyncJobStatus::Completed | SyncJobStatus::Failed)
    }
}

/// An asynchronous backend sync job
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SyncJob {
    pub id: String,
    pub status: SyncJobStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_payment_deserializes_with_continuation() {
        let json = r#"{
            "id": "pay_1",
            "amount": 9.99,
            "currency": "USD",
            "status": "PENDING",
            "checkout_config": {"key": "rzp_test", "order_id": "order_1"}
        }"#;
        let payment: Payment = serde_json::from_str(json).unwrap();
        assert_eq!(payment.amount, dec!(9.99));
        assert!(!payment.is_completed());
        assert!(payment.continuation.checkout_config.is_some());
    }

    #[test]
    fn test_status_helpers_ignore_case() {
        let json = r#"{
            "id": "sub_1",
            "customer_id": "cus_1",
            "plan_id": "plan_1",
            "status": "ACTIVE"
        }"#;
        let subscription: Subscription = serde_json::from_str(json).unwrap();
        assert!(subscription.is_active());
        assert_eq!(subscription.quantity, 1);
    }

    #[test]
    fn test_sync_status_terminal() {
        assert!(SyncJobStatus::Completed.is_terminal());
        assert!(SyncJobStatus::Failed.is_terminal());
        assert!(!SyncJobStatus::InProgress.is_terminal());

        let job: SyncJob = serde_json::from_str(r#"{"id": "job_1", "status": "in_progress"}"#).unwrap();
        assert_eq!(job.status, SyncJobStatus::InProgress);
    }

    #[test]
    fn test_payment_method_label() {
        let json = r#"{
            "id": "pm_1",
            "type": "card",
            "card": {"brand": "visa", "last4": "4242"}
        }"#;
        let method: PaymentMethod = serde_json::from_str(json).unwrap();
        assert_eq!(method.label(), "VISA •••• 4242");
    }
}
