//! Checkout Host Surfaces
//!
//! The two ways a browser-like host finishes checkout: presenting the
//! provider's embedded modal, or handing the page off to a hosted
//! checkout (plain navigation or a synthesized hidden form). Both are
//! traits so the dispatcher can run against a real host or the in-memory
//! doubles in [`crate::mock`].

use async_trait::async_trait;
use serde_json::Value;

use payops_core::{CheckoutConfig, RedirectForm, RedirectMethod, Result};

/// Payload the provider's modal hands to the success callback
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckoutCallback {
    /// Gateway-side payment id
    pub payment_id: String,

    /// Present for one-time order checkouts
    pub order_id: Option<String>,

    /// Present for subscription checkouts
    pub subscription_id: Option<String>,

    /// Signature over the above, verified server-side
    pub signature: String,
}

/// Terminal event of one modal presentation
#[derive(Clone, Debug)]
pub enum ModalEvent {
    /// The shopper paid; the callback still needs backend verification
    Completed(CheckoutCallback),

    /// The shopper closed the modal
    Dismissed,

    /// The provider reported the payment as failed
    Failed(String),
}

/// Embedded checkout modal
#[async_trait]
pub trait CheckoutModal: Send + Sync {
    /// Present the modal with the server-issued config (success and
    /// dismiss handlers are the host's concern) and resolve on the
    /// first terminal event
    async fn present(&self, config: &CheckoutConfig) -> Result<ModalEvent>;
}

/// Hidden form synthesized for a POST handoff
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostedForm {
    pub action_url: String,
    pub method: RedirectMethod,

    /// One hidden input per entry, values already coerced to strings
    pub fields: Vec<(String, String)>,
}

impl HostedForm {
    /// Build from a redirect descriptor, coercing every field value
    pub fn from_redirect(form: &RedirectForm) -> Self {
        let fields = form
            .fields
            .iter()
            .map(|(name, value)| (name.clone(), coerce_field(value)))
            .collect();

        Self {
            action_url: form.action_url.clone(),
            method: form.method,
            fields,
        }
    }
}

fn coerce_field(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Full-page navigation primitives
pub trait RedirectSink: Send + Sync {
    /// Navigate the current tab (GET handoff)
    fn navigate(&self, url: &str) -> Result<()>;

    /// Attach and submit an invisible form (POST handoff)
    fn submit_form(&self, form: &HostedForm) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_form_fields_match_descriptor_exactly() {
        let redirect: RedirectForm = serde_json::from_value(json!({
            "action_url": "https://pay.example/checkout",
            "method": "POST",
            "fields": {"txnid": "t1", "amount": "9.99"}
        }))
        .unwrap();

        let form = HostedForm::from_redirect(&redirect);
        assert_eq!(form.action_url, "https://pay.example/checkout");
        assert_eq!(form.method, RedirectMethod::Post);
        assert_eq!(form.fields.len(), 2);

        let names: Vec<&str> = form.fields.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["amount", "txnid"]);
    }

    #[test]
    fn test_field_values_are_string_coerced() {
        let redirect: RedirectForm = serde_json::from_value(json!({
            "action_url": "https://pay.example/checkout",
            "fields": {
                "amount": 9.99,
                "currency": "INR",
                "si": 1,
                "udf1": null,
                "retry": false
            }
        }))
        .unwrap();

        let form = HostedForm::from_redirect(&redirect);
        let value_of = |name: &str| {
            form.fields
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(value_of("amount"), "9.99");
        assert_eq!(value_of("currency"), "INR");
        assert_eq!(value_of("si"), "1");
        assert_eq!(value_of("udf1"), "");
        assert_eq!(value_of("retry"), "false");
    }
}
