//! # payops-checkout
//!
//! Provider-agnostic checkout dispatch for the payops console.
//!
//! ## Flow
//!
//! ```text
//! created intent ──▶ CompletionPath::resolve (once, in payops-core)
//!                         │
//!        ┌────────────────┼─────────────────┬──────────────┐
//!        ▼                ▼                 ▼              ▼
//!    Embedded        RedirectGet       RedirectPost      Final
//!        │            navigate()       submit_form()   (no action)
//!   ScriptLoader          │                 │
//!        │             full-page handoff, nothing
//!   CheckoutModal      further runs for the intent
//!        │
//!   success callback ──▶ SignatureVerifier ──▶ verified? ──▶ Completed
//!                                   │
//!                              not verified ──▶ error (never success)
//! ```
//!
//! The host seams (`ScriptBackend`, `CheckoutModal`, `RedirectSink`) are
//! traits: a browser shell implements them against real primitives, and
//! the [`mock`] module ships in-memory doubles for tests and demos. The
//! [`jobs::JobPoller`] follows asynchronous backend sync jobs the same
//! dispatcher-free way the console's views consume them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use payops_checkout::{CheckoutDispatcher, ScriptLoader, RAZORPAY_CHECKOUT_JS};
//!
//! let dispatcher = CheckoutDispatcher::new(
//!     ScriptLoader::new(RAZORPAY_CHECKOUT_JS, script_backend),
//!     modal,
//!     redirects,
//!     Arc::new(backend_client),   // BackendClient verifies signatures
//! );
//!
//! let payment = client.create_payment(&request).await?;
//! let intent = payops_core::Intent::from_payment(&payment);
//! match dispatcher.dispatch(&intent, &provider).await? {
//!     DispatchOutcome::Completed { payment, .. } => { /* verified */ }
//!     DispatchOutcome::Redirected => { /* page is gone */ }
//!     DispatchOutcome::Final => { /* settled on creation */ }
//! }
//! ```

pub mod dispatch;
pub mod host;
pub mod jobs;
pub mod loader;
pub mod mock;
pub mod verify;

pub use dispatch::{CheckoutDispatcher, DispatchOutcome};
pub use host::{CheckoutCallback, CheckoutModal, HostedForm, ModalEvent, RedirectSink};
pub use jobs::{JobFetcher, JobPoller};
pub use loader::{RAZORPAY_CHECKOUT_JS, ScriptBackend, ScriptLoader};
pub use verify::{SignatureVerifier, VerificationRequest};
