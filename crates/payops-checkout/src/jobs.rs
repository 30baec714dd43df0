//! Sync-Job Polling
//!
//! After triggering a backend synchronization job, its status is polled
//! at a fixed interval until `completed` or `failed`. One task per job
//! id; ticks are strictly sequential (the next sleep starts only after
//! the previous response is handled); teardown aborts every task so no
//! timer outlives the consumer.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use payops_client::BackendClient;
use payops_core::{Result, SyncJob};

/// Source of sync-job states
#[async_trait]
pub trait JobFetcher: Send + Sync {
    async fn fetch_job(&self, job_id: &str) -> Result<SyncJob>;
}

#[async_trait]
impl JobFetcher for BackendClient {
    async fn fetch_job(&self, job_id: &str) -> Result<SyncJob> {
        self.sync_job(job_id).await
    }
}

struct ActivePoll {
    handle: JoinHandle<()>,
    updates: watch::Receiver<SyncJob>,
}

/// Polls sync jobs until they reach a terminal state
pub struct JobPoller {
    fetcher: Arc<dyn JobFetcher>,
    interval: Duration,
    active: Mutex<HashMap<String, ActivePoll>>,
}

impl JobPoller {
    pub fn new(fetcher: Arc<dyn JobFetcher>, interval: Duration) -> Self {
        Self {
            fetcher,
            interval,
            active: Mutex::new(HashMap::new()),
        }
    }

    /// Follow a job until it finishes. Watching an id that is already
    /// being polled returns the existing channel instead of starting a
    /// second task. A job that is already terminal gets a channel that
    /// immediately holds the terminal state.
    pub fn watch(&self, job: &SyncJob) -> watch::Receiver<SyncJob> {
        let mut active = self.active.lock().unwrap();

        if let Some(poll) = active.get(&job.id) {
            if !poll.handle.is_finished() {
                return poll.updates.clone();
            }
        }

        let (tx, rx) = watch::channel(job.clone());
        if job.status.is_terminal() {
            return rx;
        }

        let fetcher = self.fetcher.clone();
        let interval = self.interval;
        let job_id = job.id.clone();
        let handle = tokio::spawn(async move {
            loop {
                tokio::time::sleep(interval).await;

                match fetcher.fetch_job(&job_id).await {
                    Ok(update) => {
                        let terminal = update.status.is_terminal();
                        if tx.send(update).is_err() {
                            // every receiver is gone; stop quietly
                            break;
                        }
                        if terminal {
                            tracing::debug!(job = %job_id, "sync job reached terminal state");
                            break;
                        }
                    }
                    Err(e) => {
                        // transient; the next tick retries
                        tracing::warn!(job = %job_id, error = %e, "sync poll tick failed");
                    }
                }
            }
        });

        active.insert(
            job.id.clone(),
            ActivePoll {
                handle,
                updates: rx.clone(),
            },
        );
        rx
    }

    /// Whether a job id currently has a live polling task
    pub fn is_polling(&self, job_id: &str) -> bool {
        self.active
            .lock()
            .unwrap()
            .get(job_id)
            .is_some_and(|poll| !poll.handle.is_finished())
    }

    /// Number of live polling tasks
    pub fn active_count(&self) -> usize {
        self.active
            .lock()
            .unwrap()
            .values()
            .filter(|poll| !poll.handle.is_finished())
            .count()
    }

    /// Stop following one job
    pub fn stop(&self, job_id: &str) {
        if let Some(poll) = self.active.lock().unwrap().remove(job_id) {
            poll.handle.abort();
        }
    }

    /// Stop every poll (view teardown)
    pub fn shutdown(&self) {
        for (_, poll) in self.active.lock().unwrap().drain() {
            poll.handle.abort();
        }
    }
}

impl Drop for JobPoller {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use payops_core::SyncJobStatus;
    use tokio::time::timeout;

    use crate::mock::SequenceJobFetcher;

    fn pending_job() -> SyncJob {
        SyncJob {
            id: "job_1".into(),
            status: SyncJobStatus::Pending,
        }
    }

    async fn wait_for_terminal(rx: &mut watch::Receiver<SyncJob>) -> SyncJobStatus {
        timeout(Duration::from_secs(2), async {
            loop {
                let status = rx.borrow_and_update().status;
                if status.is_terminal() {
                    return status;
                }
                rx.changed().await.expect("poll task ended without a terminal state");
            }
        })
        .await
        .expect("job never reached a terminal state")
    }

    #[tokio::test]
    async fn test_watch_twice_starts_one_task() {
        let fetcher = Arc::new(SequenceJobFetcher::never_finishing());
        let poller = JobPoller::new(fetcher, Duration::from_millis(5));

        let _rx1 = poller.watch(&pending_job());
        let _rx2 = poller.watch(&pending_job());

        assert_eq!(poller.active_count(), 1);
        assert!(poller.is_polling("job_1"));
    }

    #[tokio::test]
    async fn test_terminal_state_stops_polling() {
        let fetcher = Arc::new(SequenceJobFetcher::new([
            SyncJobStatus::Running,
            SyncJobStatus::InProgress,
            SyncJobStatus::Completed,
        ]));
        let poller = JobPoller::new(fetcher.clone(), Duration::from_millis(5));

        let mut rx = poller.watch(&pending_job());
        assert_eq!(wait_for_terminal(&mut rx).await, SyncJobStatus::Completed);

        let settled = fetcher.fetches();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(fetcher.fetches(), settled);
        assert!(!poller.is_polling("job_1"));
    }

    #[tokio::test]
    async fn test_stop_ends_fetching() {
        let fetcher = Arc::new(SequenceJobFetcher::never_finishing());
        let poller = JobPoller::new(fetcher.clone(), Duration::from_millis(5));

        let _rx = poller.watch(&pending_job());
        tokio::time::sleep(Duration::from_millis(30)).await;
        assert!(fetcher.fetches() > 0);

        poller.stop("job_1");
        tokio::time::sleep(Duration::from_millis(20)).await;
        let settled = fetcher.fetches();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fetcher.fetches(), settled);
        assert!(!poller.is_polling("job_1"));
    }

    #[tokio::test]
    async fn test_drop_aborts_all_polls() {
        let fetcher = Arc::new(SequenceJobFetcher::never_finishing());
        let poller = JobPoller::new(fetcher.clone(), Duration::from_millis(5));

        let _rx = poller.watch(&pending_job());
        let _rx_other = poller.watch(&SyncJob {
            id: "job_2".into(),
            status: SyncJobStatus::Pending,
        });
        assert_eq!(poller.active_count(), 2);

        drop(poller);
        tokio::time::sleep(Duration::from_millis(20)).await;
        let settled = fetcher.fetches();
        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(fetcher.fetches(), settled);
    }

    #[tokio::test]
    async fn test_already_terminal_job_needs_no_task() {
        let fetcher = Arc::new(SequenceJobFetcher::never_finishing());
        let poller = JobPoller::new(fetcher.clone(), Duration::from_millis(5));

        let rx = poller.watch(&SyncJob {
            id: "job_done".into(),
            status: SyncJobStatus::Completed,
        });

        assert_eq!(rx.borrow().status, SyncJobStatus::Completed);
        assert_eq!(poller.active_count(), 0);
        assert_eq!(fetcher.fetches(), 0);
    }

    #[tokio::test]
    async fn test_failed_job_is_terminal_too() {
        let fetcher = Arc::new(SequenceJobFetcher::new([
            SyncJobStatus::Running,
            SyncJobStatus::Failed,
        ]));
        let poller = JobPoller::new(fetcher, Duration::from_millis(5));

        let mut rx = poller.watch(&pending_job());
        assert_eq!(wait_for_terminal(&mut rx).await, SyncJobStatus::Failed);
    }
}
