//! # payops-core
//!
//! Domain model for a multi-provider payments back-office console:
//! backend resources, provider capability descriptors, and the
//! checkout-intent model with its completion-path resolution.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     created Payment / Subscription            │
//! │                              │                                │
//! │                       Intent (id, kind,                       │
//! │                        status, continuation)                  │
//! │                              │                                │
//! │                 CompletionPath::resolve (once)                │
//! │        ┌──────────────┬──────┴───────┬──────────────┐        │
//! │    Embedded      RedirectGet    RedirectPost      Final       │
//! │    (modal)       (navigate)     (hidden form)   (no action)   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is pure data and resolution logic; the I/O lives in
//! `payops-client` (REST) and `payops-checkout` (dispatch).

pub mod error;
pub mod intent;
pub mod model;
pub mod provider;

pub use error::{ConsoleError, FieldError, Result};
pub use intent::{
    CheckoutConfig, CompletionPath, Continuation, Intent, IntentKind, ProviderMeta,
    RedirectForm, RedirectMethod,
};
pub use model::{
    CardSummary, Customer, Payment, PaymentMethod, Plan, Product, ProviderCustomer,
    Subscription, SyncJob, SyncJobStatus,
};
pub use provider::ProviderDescriptor;
