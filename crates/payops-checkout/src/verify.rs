//! Signature Verification Gate
//!
//! A provider modal's success callback is not success. The raw callback
//! is relayed to the backend, which recomputes the signature and flips
//! the internal resource; only a `verified: true` answer lets the
//! dispatcher report completion.

use async_trait::async_trait;

use payops_client::{BackendClient, VerifyPaymentRequest, VerifyPaymentResponse};
use payops_core::{Intent, IntentKind, Result};

use crate::host::CheckoutCallback;

/// A provider callback correlated with the intent that produced it
#[derive(Clone, Debug)]
pub struct VerificationRequest {
    pub intent_id: String,
    pub kind: IntentKind,
    pub callback: CheckoutCallback,
}

impl VerificationRequest {
    pub fn new(intent: &Intent, callback: CheckoutCallback) -> Self {
        Self {
            intent_id: intent.id.clone(),
            kind: intent.kind,
            callback,
        }
    }

    /// Wire payload for the backend's verification route
    pub fn to_wire(&self) -> VerifyPaymentRequest {
        let (payment_id, subscription_id) = match self.kind {
            IntentKind::Payment => (Some(self.intent_id.clone()), None),
            IntentKind::Subscription => (None, Some(self.intent_id.clone())),
        };

        VerifyPaymentRequest {
            razorpay_payment_id: self.callback.payment_id.clone(),
            razorpay_order_id: self.callback.order_id.clone(),
            razorpay_subscription_id: self.callback.subscription_id.clone(),
            razorpay_signature: self.callback.signature.clone(),
            payment_id,
            subscription_id,
        }
    }
}

/// Backend-side signature verification
#[async_trait]
pub trait SignatureVerifier: Send + Sync {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerifyPaymentResponse>;
}

#[async_trait]
impl SignatureVerifier for BackendClient {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerifyPaymentResponse> {
        self.verify_payment(&request.to_wire()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payops_core::Continuation;

    fn callback() -> CheckoutCallback {
        CheckoutCallback {
            payment_id: "pay_rzp_1".into(),
            order_id: Some("order_rzp_1".into()),
            subscription_id: None,
            signature: "sig".into(),
        }
    }

    #[test]
    fn test_payment_intent_maps_to_payment_id() {
        let intent = Intent {
            id: "pay_1".into(),
            kind: IntentKind::Payment,
            status: "pending".into(),
            continuation: Continuation::default(),
        };

        let wire = VerificationRequest::new(&intent, callback()).to_wire();
        assert_eq!(wire.payment_id.as_deref(), Some("pay_1"));
        assert!(wire.subscription_id.is_none());
        assert_eq!(wire.razorpay_payment_id, "pay_rzp_1");
    }

    #[test]
    fn test_subscription_intent_maps_to_subscription_id() {
        let intent = Intent {
            id: "sub_1".into(),
            kind: IntentKind::Subscription,
            status: "pending".into(),
            continuation: Continuation::default(),
        };

        let wire = VerificationRequest::new(&intent, callback()).to_wire();
        assert!(wire.payment_id.is_none());
        assert_eq!(wire.subscription_id.as_deref(), Some("sub_1"));
    }
}
