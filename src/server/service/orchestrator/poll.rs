//! Bounded polling of generation jobs.

use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use tokio::sync::Notify;

use crate::server::{
    error::{generation::GenerationError, Error},
    generation::{
        model::{Job, JobStatus},
        GenerationClient,
    },
};

/// Polling interval and budget.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            max_attempts: 12,
        }
    }
}

/// Cancellation signal shared between a session and its in-flight generation.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    cancelled: Arc<AtomicBool>,
    notify: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once `cancel` has been called.
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        self.notify.notified().await;
    }
}

/// Re-checks a job on a fixed interval until it finishes, the budget runs out or the
/// generation is cancelled. The remote job is abandoned, not cancelled, in the last two cases.
pub struct JobPoller<'a> {
    client: &'a GenerationClient,
    settings: PollSettings,
    cancel: &'a CancelHandle,
}

impl<'a> JobPoller<'a> {
    pub fn new(client: &'a GenerationClient, settings: PollSettings, cancel: &'a CancelHandle) -> Self {
        Self {
            client,
            settings,
            cancel,
        }
    }

    /// Polls `job` to completion.
    ///
    /// `on_attempt` runs before every status check with the 1-based attempt number.
    ///
    /// # Returns
    /// - `Ok(Job)` - Job succeeded
    /// - `Err(GenerationError::JobFailed)` - Job reported failure
    /// - `Err(GenerationError::TimedOut)` - Still running after `max_attempts` checks
    /// - `Err(GenerationError::Cancelled)` - Cancellation observed between checks
    /// - `Err(Error)` - A status request failed
    pub async fn poll<F, Fut>(&self, mut job: Job, mut on_attempt: F) -> Result<Job, Error>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = ()>,
    {
        for attempt in 1..=self.settings.max_attempts {
            if job.status.is_terminal() {
                return Self::finish(job);
            }

            on_attempt(attempt).await;

            tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tracing::info!(job_id = %job.id, attempt, "Generation cancelled while polling");
                    return Err(GenerationError::Cancelled.into());
                }
                _ = tokio::time::sleep(self.settings.interval) => {}
            }

            job = self.client.job(&job.id).await?;
            tracing::debug!(
                job_id = %job.id,
                status = ?job.status,
                attempt,
                max_attempts = self.settings.max_attempts,
                "Polled generation job"
            );
        }

        if job.status.is_terminal() {
            return Self::finish(job);
        }

        tracing::warn!(
            job_id = %job.id,
            attempts = self.settings.max_attempts,
            "Abandoning generation job after polling budget"
        );

        Err(GenerationError::TimedOut {
            attempts: self.settings.max_attempts,
        }
        .into())
    }

    fn finish(job: Job) -> Result<Job, Error> {
        match job.status {
            JobStatus::Succeeded => Ok(job),
            _ => Err(GenerationError::JobFailed(
                job.error
                    .unwrap_or_else(|| "the job reported no reason".to_string()),
            )
            .into()),
        }
    }
}
