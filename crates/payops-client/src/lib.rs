//! # payops-client
//!
//! Typed REST client for the payments backend, plus the draft layer that
//! turns operator input into validated create payloads.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use payops_client::{ApiConfig, BackendClient, PaymentDraft};
//! use rust_decimal_macros::dec;
//!
//! let client = BackendClient::new(ApiConfig::from_env())?;
//! let providers = client.list_providers().await?;
//!
//! let draft = PaymentDraft::new(dec!(9.99), "USD");
//! let request = draft.build("cus_1", providers.first(), &[])?;
//! let payment = client.create_payment(&request).await?;
//! // Hand `payment` to the checkout dispatcher to finish.
//! ```

pub mod client;
pub mod config;
pub mod drafts;
pub mod extract;
pub mod requests;

pub use client::BackendClient;
pub use config::ApiConfig;
pub use drafts::{HostedCheckoutDetails, PaymentDraft, StandingInstruction, SubscriptionDraft};
pub use extract::error_from_parts;
pub use requests::{
    CardDetails, CreateCustomerRequest, CreatePaymentMethodRequest, CreatePaymentRequest,
    CreatePlanRequest, CreateProductRequest, CreateSubscriptionRequest, SetupIntentResponse,
    UpdateCustomerRequest, VerifyPaymentRequest, VerifyPaymentResponse,
};
