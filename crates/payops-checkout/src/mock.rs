//! In-Memory Host Doubles
//!
//! For testing and demo purposes: scripted stand-ins for the script
//! backend, the provider modal, the navigation sink, the verifier, and
//! the sync-job endpoint.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use payops_client::VerifyPaymentResponse;
use payops_core::{CheckoutConfig, ConsoleError, Payment, Result, Subscription, SyncJob, SyncJobStatus};

use crate::host::{CheckoutModal, HostedForm, ModalEvent, RedirectSink};
use crate::jobs::JobFetcher;
use crate::loader::ScriptBackend;
use crate::verify::{SignatureVerifier, VerificationRequest};

/// Script backend that records injections and can be told to fail
pub struct MockScriptBackend {
    injections: AtomicUsize,
    failures_remaining: AtomicUsize,
    delay: Duration,
}

impl Default for MockScriptBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockScriptBackend {
    pub fn new() -> Self {
        Self {
            injections: AtomicUsize::new(0),
            failures_remaining: AtomicUsize::new(0),
            delay: Duration::ZERO,
        }
    }

    /// Simulate a slow network load (useful for concurrency tests)
    pub fn with_delay(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new()
        }
    }

    /// Fail the next `n` injections before succeeding
    pub fn failing_times(self, n: usize) -> Self {
        self.failures_remaining.store(n, Ordering::SeqCst);
        self
    }

    pub fn injections(&self) -> usize {
        self.injections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ScriptBackend for MockScriptBackend {
    async fn inject(&self, _url: &str) -> Result<()> {
        self.injections.fetch_add(1, Ordering::SeqCst);

        if self.delay > Duration::ZERO {
            tokio::time::sleep(self.delay).await;
        }

        let remaining = self.failures_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_remaining.store(remaining - 1, Ordering::SeqCst);
            return Err(ConsoleError::ScriptLoad("injection failed".into()));
        }

        Ok(())
    }
}

/// Modal that always resolves with one scripted event
pub struct StaticModal {
    event: ModalEvent,
    presentations: AtomicUsize,
}

impl StaticModal {
    pub fn completing(callback: crate::host::CheckoutCallback) -> Self {
        Self {
            event: ModalEvent::Completed(callback),
            presentations: AtomicUsize::new(0),
        }
    }

    pub fn dismissed() -> Self {
        Self {
            event: ModalEvent::Dismissed,
            presentations: AtomicUsize::new(0),
        }
    }

    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            event: ModalEvent::Failed(reason.into()),
            presentations: AtomicUsize::new(0),
        }
    }

    pub fn presentations(&self) -> usize {
        self.presentations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CheckoutModal for StaticModal {
    async fn present(&self, _config: &CheckoutConfig) -> Result<ModalEvent> {
        self.presentations.fetch_add(1, Ordering::SeqCst);
        Ok(self.event.clone())
    }
}

/// Navigation sink that records instead of navigating
#[derive(Default)]
pub struct RecordingRedirects {
    navigations: Mutex<Vec<String>>,
    forms: Mutex<Vec<HostedForm>>,
}

impl RecordingRedirects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn forms(&self) -> Vec<HostedForm> {
        self.forms.lock().unwrap().clone()
    }
}

impl RedirectSink for RecordingRedirects {
    fn navigate(&self, url: &str) -> Result<()> {
        self.navigations.lock().unwrap().push(url.into());
        Ok(())
    }

    fn submit_form(&self, form: &HostedForm) -> Result<()> {
        self.forms.lock().unwrap().push(form.clone());
        Ok(())
    }
}

/// Verifier with a fixed answer
pub struct StaticVerifier {
    verified: bool,
    payment: Option<Payment>,
    subscription: Option<Subscription>,
    requests: Mutex<Vec<VerificationRequest>>,
}

impl StaticVerifier {
    pub fn verifying() -> Self {
        Self {
            verified: true,
            payment: None,
            subscription: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            verified: false,
            ..Self::verifying()
        }
    }

    /// Attach the server-authoritative payment returned on success
    pub fn with_payment(mut self, payment: Payment) -> Self {
        self.payment = Some(payment);
        self
    }

    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.subscription = Some(subscription);
        self
    }

    pub fn requests(&self) -> Vec<VerificationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl SignatureVerifier for StaticVerifier {
    async fn verify(&self, request: &VerificationRequest) -> Result<VerifyPaymentResponse> {
        self.requests.lock().unwrap().push(request.clone());
        Ok(VerifyPaymentResponse {
            verified: self.verified,
            payment: self.payment.clone(),
            subscription: self.subscription.clone(),
        })
    }
}

/// Job fetcher that replays a fixed status sequence (last one sticks)
pub struct SequenceJobFetcher {
    statuses: Mutex<VecDeque<SyncJobStatus>>,
    fetches: AtomicUsize,
}

impl SequenceJobFetcher {
    pub fn new(statuses: impl IntoIterator<Item = SyncJobStatus>) -> Self {
        Self {
            statuses: Mutex::new(statuses.into_iter().collect()),
            fetches: AtomicUsize::new(0),
        }
    }

    /// A fetcher whose job never finishes
    pub fn never_finishing() -> Self {
        Self::new([SyncJobStatus::Running])
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl JobFetcher for SequenceJobFetcher {
    async fn fetch_job(&self, job_id: &str) -> Result<SyncJob> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            *statuses.front().unwrap_or(&SyncJobStatus::Completed)
        };

        Ok(SyncJob {
            id: job_id.into(),
            status,
        })
    }
}
