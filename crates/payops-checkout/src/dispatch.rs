//! Checkout Dispatch
//!
//! Takes a freshly created intent, resolves its single completion path,
//! and drives it to a terminal outcome. Success on the embedded path is
//! gated on backend signature verification; the hosted paths end in a
//! full-page handoff; a final intent needs nothing at all.

use std::sync::Arc;

use uuid::Uuid;

use payops_core::{
    CompletionPath, ConsoleError, Intent, Payment, ProviderDescriptor, Result, Subscription,
};

use crate::host::{CheckoutModal, HostedForm, ModalEvent, RedirectSink};
use crate::loader::ScriptLoader;
use crate::verify::{SignatureVerifier, VerificationRequest};

/// Terminal result of dispatching one intent
#[derive(Clone, Debug)]
pub enum DispatchOutcome {
    /// Embedded checkout finished and the backend verified the
    /// signature; carries the server-authoritative resource
    Completed {
        payment: Option<Payment>,
        subscription: Option<Subscription>,
    },

    /// Full-page handoff performed; nothing further runs for this intent
    Redirected,

    /// The intent was already settled server-side
    Final,
}

/// Drives created intents through their completion path
pub struct CheckoutDispatcher {
    scripts: ScriptLoader,
    modal: Arc<dyn CheckoutModal>,
    redirects: Arc<dyn RedirectSink>,
    verifier: Arc<dyn SignatureVerifier>,
}

impl CheckoutDispatcher {
    pub fn new(
        scripts: ScriptLoader,
        modal: Arc<dyn CheckoutModal>,
        redirects: Arc<dyn RedirectSink>,
        verifier: Arc<dyn SignatureVerifier>,
    ) -> Self {
        Self {
            scripts,
            modal,
            redirects,
            verifier,
        }
    }

    /// Resolve the intent's completion path and execute exactly one
    /// branch. Embedded failures never fall back to a redirect: the
    /// path was fixed by the intent's own shape.
    pub async fn dispatch(
        &self,
        intent: &Intent,
        provider: &ProviderDescriptor,
    ) -> Result<DispatchOutcome> {
        let attempt = Uuid::new_v4();
        let path = CompletionPath::resolve(intent, provider);

        tracing::info!(
            attempt = %attempt,
            intent = %intent.id,
            provider = %provider.name,
            path = path.tag(),
            "dispatching checkout intent"
        );

        match path {
            CompletionPath::Embedded(config) => {
                self.scripts.ensure_loaded().await?;

                match self.modal.present(&config).await? {
                    ModalEvent::Completed(callback) => {
                        let request = VerificationRequest::new(intent, callback);
                        let result = self.verifier.verify(&request).await?;

                        if !result.verified {
                            tracing::warn!(
                                intent = %intent.id,
                                "provider reported success but signature verification failed"
                            );
                            return Err(ConsoleError::VerificationFailed(
                                "the backend rejected the provider signature".into(),
                            ));
                        }

                        Ok(DispatchOutcome::Completed {
                            payment: result.payment,
                            subscription: result.subscription,
                        })
                    }
                    ModalEvent::Dismissed => Err(ConsoleError::Dismissed),
                    ModalEvent::Failed(reason) => Err(ConsoleError::Declined(reason)),
                }
            }

            CompletionPath::RedirectGet(url) => {
                self.redirects.navigate(&url)?;
                Ok(DispatchOutcome::Redirected)
            }

            CompletionPath::RedirectPost(form) => {
                self.redirects.submit_form(&HostedForm::from_redirect(&form))?;
                Ok(DispatchOutcome::Redirected)
            }

            CompletionPath::Final => Ok(DispatchOutcome::Final),
        }
    }
}
