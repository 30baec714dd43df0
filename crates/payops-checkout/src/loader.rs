//! Provider Script Loading
//!
//! The embedded modal needs the provider's client script, loaded at most
//! once per process. The first caller performs the injection; concurrent
//! callers await the same outcome. A failed load rejects every current
//! waiter and resets the state so a later attempt may retry.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use payops_core::{ConsoleError, Result};

/// Razorpay's hosted checkout script
pub const RAZORPAY_CHECKOUT_JS: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// Host-environment script injection
#[async_trait]
pub trait ScriptBackend: Send + Sync {
    /// Insert the script and resolve once it has finished loading
    async fn inject(&self, url: &str) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
enum Phase {
    Loading,
    Loaded,
    Failed(String),
}

enum LoadState {
    NotLoaded,
    Loading(watch::Receiver<Phase>),
    Loaded,
}

enum Role {
    Done,
    Leader(watch::Sender<Phase>),
    Follower(watch::Receiver<Phase>),
}

/// Idempotent, shareable loader for one provider script
pub struct ScriptLoader {
    url: String,
    backend: Arc<dyn ScriptBackend>,
    state: Mutex<LoadState>,
}

impl ScriptLoader {
    pub fn new(url: impl Into<String>, backend: Arc<dyn ScriptBackend>) -> Self {
        Self {
            url: url.into(),
            backend,
            state: Mutex::new(LoadState::NotLoaded),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the script has already finished loading
    pub async fn is_loaded(&self) -> bool {
        matches!(&*self.state.lock().await, LoadState::Loaded)
    }

    /// Load the script, once. Concurrent callers all resolve (or all
    /// fail) with the single injection's outcome. The state lock is
    /// never held across the injection itself.
    pub async fn ensure_loaded(&self) -> Result<()> {
        let role = {
            let mut state = self.state.lock().await;
            match &*state {
                LoadState::Loaded => Role::Done,
                LoadState::Loading(rx) => Role::Follower(rx.clone()),
                LoadState::NotLoaded => {
                    let (tx, rx) = watch::channel(Phase::Loading);
                    *state = LoadState::Loading(rx);
                    Role::Leader(tx)
                }
            }
        };

        match role {
            Role::Done => Ok(()),
            Role::Follower(rx) => Self::await_outcome(rx).await,
            Role::Leader(tx) => {
                tracing::debug!(url = %self.url, "loading provider checkout script");
                let result = self.backend.inject(&self.url).await;

                let mut state = self.state.lock().await;
                match result {
                    Ok(()) => {
                        *state = LoadState::Loaded;
                        let _ = tx.send(Phase::Loaded);
                        Ok(())
                    }
                    Err(e) => {
                        let message = e.to_string();
                        // reset so a subsequent attempt retries
                        *state = LoadState::NotLoaded;
                        let _ = tx.send(Phase::Failed(message.clone()));
                        tracing::warn!(url = %self.url, error = %message, "checkout script failed to load");
                        Err(ConsoleError::ScriptLoad(message))
                    }
                }
            }
        }
    }

    async fn await_outcome(mut rx: watch::Receiver<Phase>) -> Result<()> {
        loop {
            let phase = rx.borrow_and_update().clone();
            match phase {
                Phase::Loaded => return Ok(()),
                Phase::Failed(message) => return Err(ConsoleError::ScriptLoad(message)),
                Phase::Loading => {
                    if rx.changed().await.is_err() {
                        return Err(ConsoleError::ScriptLoad("script load interrupted".into()));
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockScriptBackend;
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_injection() {
        let backend = Arc::new(MockScriptBackend::with_delay(Duration::from_millis(20)));
        let loader = ScriptLoader::new(RAZORPAY_CHECKOUT_JS, backend.clone());

        let (a, b, c) = tokio::join!(
            loader.ensure_loaded(),
            loader.ensure_loaded(),
            loader.ensure_loaded(),
        );
        assert!(a.is_ok() && b.is_ok() && c.is_ok());
        assert_eq!(backend.injections(), 1);

        // Already loaded: still one injection
        loader.ensure_loaded().await.unwrap();
        assert_eq!(backend.injections(), 1);
        assert!(loader.is_loaded().await);
    }

    #[tokio::test]
    async fn test_failure_rejects_waiters_then_allows_retry() {
        let backend = Arc::new(
            MockScriptBackend::with_delay(Duration::from_millis(10)).failing_times(1),
        );
        let loader = ScriptLoader::new(RAZORPAY_CHECKOUT_JS, backend.clone());

        let (a, b) = tokio::join!(loader.ensure_loaded(), loader.ensure_loaded());
        assert!(matches!(a, Err(ConsoleError::ScriptLoad(_))));
        assert!(matches!(b, Err(ConsoleError::ScriptLoad(_))));
        assert_eq!(backend.injections(), 1);

        // A later attempt retries and succeeds
        loader.ensure_loaded().await.unwrap();
        assert_eq!(backend.injections(), 2);
        assert!(loader.is_loaded().await);
    }
}
