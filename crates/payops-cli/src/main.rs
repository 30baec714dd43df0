//! payops Console Demo
//!
//! Headless composition root: connects to the configured payments
//! backend, lists linked providers and customers, then triggers a
//! synchronization job and follows it to a terminal state.

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payops_checkout::JobPoller;
use payops_client::{ApiConfig, BackendClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env();
    tracing::info!("payops console → {}", config.base_url);

    let client = Arc::new(BackendClient::new(config)?);

    // Verify backend connection
    match client.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to payments backend"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Payments backend not reachable - listings will fail");
            tracing::warn!("  Set PAYOPS_API_URL (default: http://localhost:8000)");
        }
    }

    // Linked providers
    match client.list_providers().await {
        Ok(providers) if providers.is_empty() => {
            tracing::warn!("No payment providers linked");
        }
        Ok(providers) => {
            tracing::info!("Linked {} provider(s):", providers.len());
            for provider in &providers {
                tracing::info!(
                    "  • {} (stored methods: {}, hosted: {}, embedded: {})",
                    provider.label(),
                    provider.supports_payment_methods,
                    provider.supports_hosted_payments,
                    provider.supports_embedded_checkout,
                );
            }
        }
        Err(e) => tracing::warn!("Could not list providers: {}", e.user_message()),
    }

    // Customers
    match client.list_customers().await {
        Ok(customers) => {
            tracing::info!("{} customer(s) on file", customers.len());
            for customer in customers.iter().take(5) {
                tracing::info!(
                    "  • {} <{}>",
                    customer.name.as_deref().unwrap_or("(unnamed)"),
                    customer.email,
                );
            }
        }
        Err(e) => tracing::warn!("Could not list customers: {}", e.user_message()),
    }

    // Trigger a sync job and follow it until it finishes
    let poller = JobPoller::new(client.clone(), Duration::from_secs(2));
    match client.trigger_sync().await {
        Ok(job) => {
            tracing::info!("Sync job {} started ({:?})", job.id, job.status);

            let mut updates = poller.watch(&job);
            while !updates.borrow_and_update().status.is_terminal() {
                if updates.changed().await.is_err() {
                    break;
                }
                let current = updates.borrow().clone();
                tracing::info!("  sync job {}: {:?}", current.id, current.status);
            }
            tracing::info!("Sync finished: {:?}", updates.borrow().status);
        }
        Err(e) => tracing::warn!("Sync unavailable: {}", e.user_message()),
    }

    Ok(())
}
