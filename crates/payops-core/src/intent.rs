//! Checkout Intents
//!
//! A created payment or subscription carries at most one way to finish
//! checkout: an embedded modal config, a hosted redirect (GET or POST),
//! or nothing at all when the backend already settled it. The backend has
//! returned that handoff data in several places over time (top level,
//! `meta_info`, `metadata`, nested per-provider blobs); `Continuation`
//! accepts every observed shape and `CompletionPath::resolve` collapses
//! them into a single closed union, exactly once per intent.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::model::{Payment, Subscription};
use crate::provider::ProviderDescriptor;

/// Opaque configuration blob for an embedded checkout modal
pub type CheckoutConfig = Map<String, Value>;

/// HTTP method of a hosted-checkout redirect
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RedirectMethod {
    #[serde(rename = "GET", alias = "get", alias = "Get")]
    Get,
    #[serde(rename = "POST", alias = "post", alias = "Post")]
    Post,
}

impl Default for RedirectMethod {
    fn default() -> Self {
        RedirectMethod::Post
    }
}

/// Structured hosted-checkout redirect descriptor
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RedirectForm {
    pub action_url: String,

    #[serde(default)]
    pub method: RedirectMethod,

    /// Hidden form fields; values arrive as arbitrary JSON and are
    /// coerced to strings at submission time
    #[serde(default)]
    pub fields: BTreeMap<String, Value>,
}

/// Provider metadata block (`meta_info` on internal routes, `metadata`
/// on public ones)
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProviderMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_config: Option<CheckoutConfig>,

    /// Some backend versions place the redirect descriptor here. Kept as
    /// raw JSON: a malformed blob must not fail the whole resource parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<Value>,

    /// Per-provider blobs: `{"payu": {"redirect": {...}}}` or the bare
    /// `{"action_url": ..., "fields": ...}` object
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub provider_data: HashMap<String, Value>,

    /// Everything else the backend stored in the block
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Every location the backend may put checkout handoff data
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Continuation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_config: Option<CheckoutConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<RedirectForm>,

    /// Flat GET fallback, equivalent to a GET descriptor without fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_info: Option<ProviderMeta>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProviderMeta>,
}

impl Continuation {
    /// Embedded modal config, wherever the backend put it
    pub fn embedded_config(&self) -> Option<&CheckoutConfig> {
        self.checkout_config
            .as_ref()
            .or_else(|| self.meta_block(|m| m.checkout_config.as_ref()))
    }

    fn meta_block<'a, T>(&'a self, pick: impl Fn(&'a ProviderMeta) -> Option<T>) -> Option<T> {
        self.meta_info
            .as_ref()
            .and_then(&pick)
            .or_else(|| self.metadata.as_ref().and_then(&pick))
    }

    fn meta_redirect(&self) -> Option<RedirectForm> {
        self.meta_block(|m| m.redirect.as_ref().and_then(parse_redirect))
    }

    fn provider_redirect(&self, provider: &str) -> Option<RedirectForm> {
        self.meta_block(|m| m.provider_data.get(provider).and_then(unwrap_provider_redirect))
    }
}

fn parse_redirect(value: &Value) -> Option<RedirectForm> {
    serde_json::from_value::<RedirectForm>(value.clone())
        .ok()
        .filter(|form| !form.action_url.is_empty())
}

fn unwrap_provider_redirect(value: &Value) -> Option<RedirectForm> {
    match value.get("redirect") {
        Some(inner) => parse_redirect(inner),
        None => parse_redirect(value),
    }
}

/// What kind of resource an intent came from
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Payment,
    Subscription,
}

/// The dispatchable view of a freshly created payment or subscription
#[derive(Clone, Debug)]
pub struct Intent {
    pub id: String,
    pub kind: IntentKind,
    pub status: String,
    pub continuation: Continuation,
}

impl Intent {
    pub fn from_payment(payment: &Payment) -> Self {
        Self {
            id: payment.id.clone(),
            kind: IntentKind::Payment,
            status: payment.status.clone(),
            continuation: payment.continuation.clone(),
        }
    }

    pub fn from_subscription(subscription: &Subscription) -> Self {
        Self {
            id: subscription.id.clone(),
            kind: IntentKind::Subscription,
            status: subscription.status.clone(),
            continuation: subscription.continuation.clone(),
        }
    }
}

/// The single way a given intent finishes checkout
#[derive(Clone, Debug, PartialEq)]
pub enum CompletionPath {
    /// Open the provider's embedded modal with this config
    Embedded(CheckoutConfig),

    /// Navigate the tab to a hosted checkout page
    RedirectGet(String),

    /// Submit a hidden form to a hosted checkout page
    RedirectPost(RedirectForm),

    /// Already settled server-side; nothing left to do
    Final,
}

impl CompletionPath {
    /// Resolve the completion path for an intent, once.
    ///
    /// Priority: embedded modal (config present and provider capable),
    /// then any redirect descriptor (its method decides GET vs POST),
    /// then the flat `redirect_url` fallback, else final. A provider
    /// claiming embedded support without a config falls through to the
    /// redirect branches rather than failing.
    pub fn resolve(intent: &Intent, provider: &ProviderDescriptor) -> Self {
        let continuation = &intent.continuation;

        if provider.supports_embedded_checkout {
            if let Some(config) = continuation.embedded_config() {
                return CompletionPath::Embedded(config.clone());
            }
        }

        let form = continuation
            .redirect
            .clone()
            .or_else(|| continuation.meta_redirect())
            .or_else(|| continuation.provider_redirect(&provider.name));
        if let Some(form) = form {
            return match form.method {
                RedirectMethod::Get => CompletionPath::RedirectGet(form.action_url),
                RedirectMethod::Post => CompletionPath::RedirectPost(form),
            };
        }

        if let Some(url) = &continuation.redirect_url {
            return CompletionPath::RedirectGet(url.clone());
        }

        CompletionPath::Final
    }

    /// Short tag for logs
    pub fn tag(&self) -> &'static str {
        match self {
            CompletionPath::Embedded(_) => "embedded",
            CompletionPath::RedirectGet(_) => "redirect_get",
            CompletionPath::RedirectPost(_) => "redirect_post",
            CompletionPath::Final => "final",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn intent_from_json(body: Value) -> Intent {
        Intent {
            id: "pay_1".into(),
            kind: IntentKind::Payment,
            status: "pending".into(),
            continuation: serde_json::from_value(body).unwrap(),
        }
    }

    fn embedded_provider() -> ProviderDescriptor {
        ProviderDescriptor::new("razorpay").hosted_only().with_embedded_checkout()
    }

    fn hosted_provider() -> ProviderDescriptor {
        ProviderDescriptor::new("payu").hosted_only()
    }

    #[test]
    fn test_embedded_config_wins_over_redirect() {
        let intent = intent_from_json(json!({
            "checkout_config": {"key": "rzp_test", "order_id": "order_1"},
            "redirect": {"action_url": "https://pay.example/hosted", "method": "POST"}
        }));

        match CompletionPath::resolve(&intent, &embedded_provider()) {
            CompletionPath::Embedded(config) => {
                assert_eq!(config.get("key").and_then(Value::as_str), Some("rzp_test"));
            }
            other => panic!("expected embedded path, got {:?}", other),
        }
    }

    #[test]
    fn test_embedded_claim_without_config_falls_through() {
        let intent = intent_from_json(json!({
            "redirect": {"action_url": "https://pay.example/hosted", "method": "POST",
                         "fields": {"txnid": "t1"}}
        }));

        let path = CompletionPath::resolve(&intent, &embedded_provider());
        assert!(matches!(path, CompletionPath::RedirectPost(_)));
    }

    #[test]
    fn test_post_redirect_descriptor_example() {
        let intent = intent_from_json(json!({
            "redirect": {
                "action_url": "https://pay.example/checkout",
                "method": "POST",
                "fields": {"txnid": "t1", "amount": "9.99"}
            }
        }));

        match CompletionPath::resolve(&intent, &hosted_provider()) {
            CompletionPath::RedirectPost(form) => {
                assert_eq!(form.action_url, "https://pay.example/checkout");
                assert_eq!(form.fields.len(), 2);
                assert!(form.fields.contains_key("txnid"));
                assert!(form.fields.contains_key("amount"));
            }
            other => panic!("expected POST redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_get_redirect_descriptor_navigates() {
        let intent = intent_from_json(json!({
            "redirect": {"action_url": "https://pay.example/session/abc", "method": "GET"}
        }));

        assert_eq!(
            CompletionPath::resolve(&intent, &hosted_provider()),
            CompletionPath::RedirectGet("https://pay.example/session/abc".into()),
        );
    }

    #[test]
    fn test_flat_redirect_url_fallback() {
        let intent = intent_from_json(json!({"redirect_url": "https://pay.example/r/xyz"}));

        assert_eq!(
            CompletionPath::resolve(&intent, &hosted_provider()),
            CompletionPath::RedirectGet("https://pay.example/r/xyz".into()),
        );
    }

    #[test]
    fn test_meta_info_redirect_shape() {
        let intent = intent_from_json(json!({
            "meta_info": {
                "redirect": {
                    "action_url": "https://secure.payu.in/_payment",
                    "method": "POST",
                    "fields": {"txnid": "t1", "amount": "999.0", "si": "1", "hash": "ab12"}
                }
            }
        }));

        match CompletionPath::resolve(&intent, &hosted_provider()) {
            CompletionPath::RedirectPost(form) => assert_eq!(form.fields.len(), 4),
            other => panic!("expected POST redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_provider_data_wrapped_and_bare_shapes() {
        let wrapped = intent_from_json(json!({
            "metadata": {
                "provider_data": {
                    "payu": {"redirect": {"action_url": "https://pay.example/a",
                                          "fields": {"txnid": "t1"}}}
                }
            }
        }));
        assert!(matches!(
            CompletionPath::resolve(&wrapped, &hosted_provider()),
            CompletionPath::RedirectPost(_)
        ));

        let bare = intent_from_json(json!({
            "meta_info": {
                "provider_data": {
                    "payu": {"action_url": "https://pay.example/b", "fields": {"txnid": "t2"}}
                }
            }
        }));
        assert!(matches!(
            CompletionPath::resolve(&bare, &hosted_provider()),
            CompletionPath::RedirectPost(_)
        ));

        // Another provider's blob must not be picked up
        let foreign = intent_from_json(json!({
            "meta_info": {
                "provider_data": {
                    "cashfree": {"action_url": "https://pay.example/c", "fields": {}}
                }
            }
        }));
        assert_eq!(
            CompletionPath::resolve(&foreign, &hosted_provider()),
            CompletionPath::Final,
        );
    }

    #[test]
    fn test_method_defaults_to_post_for_provider_data() {
        let intent = intent_from_json(json!({
            "meta_info": {
                "provider_data": {
                    "payu": {"action_url": "https://pay.example/a", "fields": {"txnid": "t1"}}
                }
            }
        }));
        match CompletionPath::resolve(&intent, &hosted_provider()) {
            CompletionPath::RedirectPost(form) => assert_eq!(form.method, RedirectMethod::Post),
            other => panic!("expected POST redirect, got {:?}", other),
        }
    }

    #[test]
    fn test_no_handoff_data_is_final() {
        let intent = intent_from_json(json!({}));
        assert_eq!(
            CompletionPath::resolve(&intent, &hosted_provider()),
            CompletionPath::Final,
        );
    }

    #[test]
    fn test_malformed_meta_redirect_is_ignored() {
        let intent = intent_from_json(json!({
            "meta_info": {"redirect": {"method": "POST"}},
            "redirect_url": "https://pay.example/fallback"
        }));
        assert_eq!(
            CompletionPath::resolve(&intent, &hosted_provider()),
            CompletionPath::RedirectGet("https://pay.example/fallback".into()),
        );
    }
}
