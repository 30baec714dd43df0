//! Backend REST Client
//!
//! Thin typed wrappers over the payments backend's REST routes. Every
//! method returns the deserialized resource or a `ConsoleError` with a
//! message already extracted from the error body.

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use payops_core::{
    Customer, Payment, PaymentMethod, Plan, Product, ProviderCustomer, ProviderDescriptor,
    Result, Subscription, SyncJob,
};

use crate::config::ApiConfig;
use crate::extract::error_from_response;
use crate::requests::{
    CreateCustomerRequest, CreatePaymentMethodRequest, CreatePaymentRequest, CreatePlanRequest,
    CreateProductRequest, CreateSubscriptionRequest, SetupIntentResponse, UpdateCustomerRequest,
    VerifyPaymentRequest, VerifyPaymentResponse,
};

/// Client for the payments backend
#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    config: ApiConfig,
}

impl BackendClient {
    /// Create a client from configuration
    pub fn new(config: ApiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(ApiConfig::from_env())
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    async fn handle<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.http.get(self.url(path)).send().await?;
        Self::handle(response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.post(self.url(path)).json(body).send().await?;
        Self::handle(response).await
    }

    async fn patch_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.http.patch(self.url(path)).json(body).send().await?;
        Self::handle(response).await
    }

    // --- Health ---------------------------------------------------------

    /// Check if the backend is reachable and healthy
    pub async fn health_check(&self) -> Result<bool> {
        match self.http.get(self.url("/health")).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("backend health check failed: {}", e);
                Ok(false)
            }
        }
    }

    // --- Customers ------------------------------------------------------

    pub async fn list_customers(&self) -> Result<Vec<Customer>> {
        self.get_json("/customers").await
    }

    pub async fn get_customer(&self, customer_id: &str) -> Result<Customer> {
        self.get_json(&format!("/customers/{}", customer_id)).await
    }

    pub async fn create_customer(&self, request: &CreateCustomerRequest) -> Result<Customer> {
        self.post_json("/customers", request).await
    }

    pub async fn update_customer(
        &self,
        customer_id: &str,
        request: &UpdateCustomerRequest,
    ) -> Result<Customer> {
        self.patch_json(&format!("/customers/{}", customer_id), request).await
    }

    /// Link a customer to an additional payment provider
    pub async fn link_provider(
        &self,
        customer_id: &str,
        provider: &str,
    ) -> Result<ProviderCustomer> {
        self.post_json(
            &format!("/customers/{}/providers/{}", customer_id, provider),
            &json!({}),
        )
        .await
    }

    // --- Payment methods ------------------------------------------------

    pub async fn list_payment_methods(
        &self,
        customer_id: &str,
        provider: Option<&str>,
    ) -> Result<Vec<PaymentMethod>> {
        let mut request = self
            .http
            .get(self.url(&format!("/customers/{}/payment-methods", customer_id)));
        if let Some(provider) = provider {
            request = request.query(&[("provider", provider)]);
        }
        Self::handle(request.send().await?).await
    }

    pub async fn create_payment_method(
        &self,
        customer_id: &str,
        request: &CreatePaymentMethodRequest,
    ) -> Result<PaymentMethod> {
        self.post_json(&format!("/customers/{}/payment-methods", customer_id), request)
            .await
    }

    /// Patch a stored payment method (free-form body, backend-defined keys)
    pub async fn update_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
        body: &serde_json::Value,
    ) -> Result<PaymentMethod> {
        self.patch_json(
            &format!("/customers/{}/payment-methods/{}", customer_id, payment_method_id),
            body,
        )
        .await
    }

    pub async fn delete_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<()> {
        let response = self
            .http
            .delete(self.url(&format!(
                "/customers/{}/payment-methods/{}",
                customer_id, payment_method_id
            )))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    /// Mark a stored payment method as the customer's default
    pub async fn set_default_payment_method(
        &self,
        customer_id: &str,
        payment_method_id: &str,
    ) -> Result<PaymentMethod> {
        self.post_json(
            &format!(
                "/customers/{}/payment-methods/{}/default",
                customer_id, payment_method_id
            ),
            &json!({}),
        )
        .await
    }

    /// Create a setup intent for collecting a payment method off-session
    pub async fn create_setup_intent(
        &self,
        customer_id: &str,
        usage: Option<&str>,
        provider: Option<&str>,
    ) -> Result<SetupIntentResponse> {
        let mut request = self.http.post(self.url(&format!(
            "/customers/{}/payment-methods/setup-intent",
            customer_id
        )));
        if let Some(usage) = usage {
            request = request.query(&[("usage", usage)]);
        }
        if let Some(provider) = provider {
            request = request.query(&[("provider", provider)]);
        }
        Self::handle(request.send().await?).await
    }

    // --- Payments -------------------------------------------------------

    /// Create a one-time payment; the response may carry checkout
    /// handoff data for the dispatcher
    pub async fn create_payment(&self, request: &CreatePaymentRequest) -> Result<Payment> {
        self.post_json("/payments", request).await
    }

    pub async fn list_payments(&self) -> Result<Vec<Payment>> {
        self.get_json("/payments").await
    }

    pub async fn customer_payments(&self, customer_id: &str) -> Result<Vec<Payment>> {
        self.get_json(&format!("/customers/{}/payments", customer_id)).await
    }

    // --- Subscriptions --------------------------------------------------

    /// Create a subscription; the response may carry checkout handoff
    /// data for the dispatcher
    pub async fn create_subscription(
        &self,
        customer_id: &str,
        request: &CreateSubscriptionRequest,
    ) -> Result<Subscription> {
        self.post_json(&format!("/customers/{}/subscriptions", customer_id), request)
            .await
    }

    pub async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.get_json("/subscriptions").await
    }

    pub async fn customer_subscriptions(&self, customer_id: &str) -> Result<Vec<Subscription>> {
        self.get_json(&format!("/customers/{}/subscriptions", customer_id)).await
    }

    pub async fn get_subscription(&self, subscription_id: &str) -> Result<Subscription> {
        self.get_json(&format!("/subscriptions/{}", subscription_id)).await
    }

    pub async fn cancel_subscription(
        &self,
        subscription_id: &str,
        cancel_at_period_end: bool,
    ) -> Result<Subscription> {
        let request = self
            .http
            .post(self.url(&format!("/subscriptions/{}/cancel", subscription_id)))
            .query(&[("cancel_at_period_end", cancel_at_period_end)])
            .json(&json!({}));
        Self::handle(request.send().await?).await
    }

    // --- Products & plans -----------------------------------------------

    pub async fn list_products(&self) -> Result<Vec<Product>> {
        self.get_json("/products").await
    }

    pub async fn create_product(&self, request: &CreateProductRequest) -> Result<Product> {
        self.post_json("/products", request).await
    }

    pub async fn list_plans(&self, product_id: &str) -> Result<Vec<Plan>> {
        self.get_json(&format!("/products/{}/plans", product_id)).await
    }

    pub async fn create_plan(
        &self,
        product_id: &str,
        request: &CreatePlanRequest,
    ) -> Result<Plan> {
        self.post_json(&format!("/products/{}/plans", product_id), request).await
    }

    // --- Providers ------------------------------------------------------

    /// Providers available for the configured account
    pub async fn list_providers(&self) -> Result<Vec<ProviderDescriptor>> {
        self.get_json("/providers").await
    }

    // --- Verification ---------------------------------------------------

    /// Submit a provider's client-side callback for authoritative
    /// signature verification
    pub async fn verify_payment(
        &self,
        request: &VerifyPaymentRequest,
    ) -> Result<VerifyPaymentResponse> {
        self.post_json("/razorpay/verify-payment", request).await
    }

    // --- Sync jobs ------------------------------------------------------

    /// Kick off an asynchronous backend synchronization job
    pub async fn trigger_sync(&self) -> Result<SyncJob> {
        self.post_json("/sync", &json!({})).await
    }

    /// Fetch the current state of a sync job
    pub async fn sync_job(&self, job_id: &str) -> Result<SyncJob> {
        self.get_json(&format!("/sync/{}", job_id)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining_trims_trailing_slash() {
        let client = BackendClient::new(ApiConfig::new("http://localhost:8000/")).unwrap();
        assert_eq!(client.url("/customers"), "http://localhost:8000/customers");
    }
}
