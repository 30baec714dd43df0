//! Request and Response DTOs
//!
//! Wire payloads for the backend's write endpoints. Create payloads carry
//! free-form provider metadata under `metadata` (the backend's public
//! name; responses echo it back as `meta_info` on internal routes).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use payops_core::{Payment, Subscription};
use rust_decimal::Decimal;

/// Payload for `POST /customers`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateCustomerRequest {
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<HashMap<String, Value>>,
}

/// Payload for `PATCH /customers/{id}` (all fields optional)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct UpdateCustomerRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<HashMap<String, Value>>,
}

/// Raw card details for tokenization (write-only, never echoed back)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CardDetails {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
}

/// Payload for `POST /customers/{id}/payment-methods`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePaymentMethodRequest {
    #[serde(rename = "type")]
    pub method_type: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<CardDetails>,

    /// Gateway token, for token-based creation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Existing gateway payment method to attach
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,

    /// Confirmed setup intent to promote into a stored method
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_intent_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandate_id: Option<String>,

    #[serde(default)]
    pub set_default: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

impl Default for CreatePaymentMethodRequest {
    fn default() -> Self {
        Self {
            method_type: "card".into(),
            card: None,
            token: None,
            payment_method_id: None,
            setup_intent_id: None,
            mandate_id: None,
            set_default: false,
            provider: None,
        }
    }
}

impl CreatePaymentMethodRequest {
    /// Card-based creation
    pub fn card(card: CardDetails) -> Self {
        Self {
            card: Some(card),
            ..Self::default()
        }
    }

    /// Token-based creation (card already tokenized by the gateway)
    pub fn from_token(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Promote a confirmed setup intent into a stored method
    pub fn from_setup_intent(setup_intent_id: impl Into<String>) -> Self {
        Self {
            setup_intent_id: Some(setup_intent_id.into()),
            ..Self::default()
        }
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn as_default(mut self) -> Self {
        self.set_default = true;
        self
    }
}

/// Response of `POST /customers/{id}/payment-methods/setup-intent`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SetupIntentResponse {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
}

/// Payload for `POST /payments`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: Decimal,
    pub currency: String,
    pub customer_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mandate_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Provider-specific details, keyed by provider name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

/// Payload for `POST /customers/{id}/subscriptions`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan_id: String,

    pub quantity: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trial_period_days: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Provider-specific details, keyed by provider name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<HashMap<String, Value>>,
}

/// Payload for `POST /products`
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<HashMap<String, Value>>,
}

/// Payload for `POST /products/{id}/plans`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreatePlanRequest {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// "subscription", "per_user", "tiered", ...
    pub pricing_model: String,

    pub amount: Decimal,
    pub currency: String,

    /// "day", "week", "month", "year"
    pub billing_interval: String,

    pub billing_interval_count: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<HashMap<String, Value>>,
}

/// Payload for `POST /razorpay/verify-payment`
///
/// Relays the provider's client-side callback untouched, plus the internal
/// id the backend should flip on success.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyPaymentRequest {
    pub razorpay_payment_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub razorpay_subscription_id: Option<String>,

    pub razorpay_signature: String,

    /// Internal payment id to mark completed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,

    /// Internal subscription id to mark active
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription_id: Option<String>,
}

/// Response of `POST /razorpay/verify-payment`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VerifyPaymentResponse {
    pub verified: bool,

    /// Server-authoritative payment, when a payment was verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<Payment>,

    /// Server-authoritative subscription, when a subscription was verified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<Subscription>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_create_payment_omits_empty_options() {
        let request = CreatePaymentRequest {
            amount: dec!(10.50),
            currency: "USD".into(),
            customer_id: "cus_1".into(),
            description: None,
            payment_method_id: Some("pm_1".into()),
            mandate_id: None,
            provider: Some("stripe".into()),
            metadata: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("description").is_none());
        assert!(json.get("metadata").is_none());
        assert_eq!(json["payment_method_id"], "pm_1");
    }

    #[test]
    fn test_payment_method_type_field_name() {
        let request = CreatePaymentMethodRequest::card(CardDetails {
            number: "4242424242424242".into(),
            exp_month: 12,
            exp_year: 2030,
            cvc: "123".into(),
        });

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["type"], "card");
    }

    #[test]
    fn test_verify_response_round_trip() {
        let body = r#"{"verified": true, "payment": {
            "id": "pay_1", "amount": 5, "currency": "INR", "status": "completed"
        }}"#;
        let response: VerifyPaymentResponse = serde_json::from_str(body).unwrap();
        assert!(response.verified);
        assert!(response.payment.unwrap().is_completed());
        assert!(response.subscription.is_none());
    }
}
