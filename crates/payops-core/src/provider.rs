//! Payment Provider Descriptors
//!
//! The backend exposes which gateways are linked for a customer; each
//! descriptor drives both the input form shown and the checkout branch
//! taken once an intent comes back.

use serde::{Deserialize, Serialize};

/// Capabilities of a single payment provider
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    /// Stable provider key (e.g. "stripe", "razorpay", "payu", "cashfree")
    pub name: String,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Whether stored payment methods can be charged directly
    #[serde(default = "default_true")]
    pub supports_payment_methods: bool,

    /// Whether the provider collects card details on a hosted page
    #[serde(default)]
    pub supports_hosted_payments: bool,

    /// Whether the provider can render an embedded checkout modal
    #[serde(default)]
    pub supports_embedded_checkout: bool,
}

fn default_true() -> bool {
    true
}

impl ProviderDescriptor {
    /// Create a descriptor for a stored-method provider
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            supports_payment_methods: true,
            supports_hosted_payments: false,
            supports_embedded_checkout: false,
        }
    }

    /// Mark the provider as hosted-checkout only (no stored methods)
    pub fn hosted_only(mut self) -> Self {
        self.supports_payment_methods = false;
        self.supports_hosted_payments = true;
        self
    }

    /// Mark the provider as capable of embedded modal checkout
    pub fn with_embedded_checkout(mut self) -> Self {
        self.supports_embedded_checkout = true;
        self
    }

    /// Label to show in a provider picker
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_minimal_json() {
        let descriptor: ProviderDescriptor =
            serde_json::from_str(r#"{"name": "stripe"}"#).unwrap();
        assert!(descriptor.supports_payment_methods);
        assert!(!descriptor.supports_hosted_payments);
        assert!(!descriptor.supports_embedded_checkout);
        assert_eq!(descriptor.label(), "stripe");
    }

    #[test]
    fn test_label_prefers_display_name() {
        let descriptor: ProviderDescriptor =
            serde_json::from_str(r#"{"name": "payu", "display_name": "PayU India"}"#).unwrap();
        assert_eq!(descriptor.label(), "PayU India");
    }
}
