//! Poll scheduler — one repeating timer bound to one job.
//!
//! The scheduler owns at most one tokio task. Each tick awaits the callback
//! to completion before the next tick is taken, so two fetch-and-apply cycles
//! never overlap. Stopping aborts the task; dropping the scheduler stops it.

use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::debug;

use crate::jobs::model::JobId;

/// The running poll task and what it is bound to.
#[derive(Debug)]
struct ActivePoll {
    generation: u64,
    job_id: JobId,
    handle: JoinHandle<()>,
}

/// Drives a tick callback at a fixed period until stopped.
#[derive(Debug)]
pub struct PollScheduler {
    interval: Duration,
    active: Option<ActivePoll>,
}

impl PollScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            active: None,
        }
    }

    /// Start ticking for `job_id`. The first tick fires one interval from now.
    ///
    /// Any previous poll task is stopped first. The loop ends when `on_tick`
    /// returns `ControlFlow::Break` or when [`stop`](Self::stop) is called.
    pub fn start<F, Fut>(&mut self, generation: u64, job_id: JobId, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.stop();

        let period = self.interval;
        let task_job_id = job_id.clone();
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if on_tick().await.is_break() {
                    debug!(job_id = %task_job_id, generation, "Poll loop finished");
                    return;
                }
            }
        });

        debug!(job_id = %job_id, generation, ?period, "Poll scheduler started");
        self.active = Some(ActivePoll {
            generation,
            job_id,
            handle,
        });
    }

    /// Cancel the poll task. Safe to call when nothing is running.
    ///
    /// Returns `true` if a task was cancelled.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                if !active.handle.is_finished() {
                    active.handle.abort();
                }
                debug!(job_id = %active.job_id, generation = active.generation, "Poll scheduler stopped");
                true
            }
            None => false,
        }
    }

    /// Check if a poll task is live.
    pub fn is_running(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    /// Generation the current task was started under.
    pub fn generation(&self) -> Option<u64> {
        self.active.as_ref().map(|active| active.generation)
    }

    /// Job the current task is polling.
    pub fn job_id(&self) -> Option<&JobId> {
        self.active.as_ref().map(|active| &active.job_id)
    }
}

impl Drop for PollScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
