//! Job state machine — the single source of truth for one lookup session.
//!
//! ```text
//! idle ──submit──▶ pending ──poll: done/failed──▶ done | failed
//!   ▲                 │ ──poll: max pending polls──▶ failed (timeout)
//!   └──── reset ◀─────┴──────────── reset ◀──────────┘
//! ```
//!
//! Every mutation happens under one lock and is followed by a snapshot
//! broadcast on a `watch` channel. Network calls run outside the lock and
//! carry the generation they were issued under; a result that comes back
//! after a reset or resubmission is dropped.

use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{Mutex, watch};
use tracing::{debug, error, info, warn};

use crate::config::PollPolicy;
use crate::error::{ClientError, JobError};
use crate::jobs::client::JobClient;
use crate::jobs::model::{JobId, JobRequest, JobSnapshot, JobStatus, PollResponse, RemoteStatus};
use crate::jobs::scheduler::PollScheduler;

/// What a poll response did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// Still pending; keep polling.
    Continue,
    /// The server reported a terminal status.
    Finished(JobStatus),
    /// The attempt ceiling was reached while still pending.
    TimedOut,
    /// No pending job for this generation; nothing changed.
    Ignored,
}

impl PollOutcome {
    fn control_flow(self) -> ControlFlow<()> {
        match self {
            Self::Continue => ControlFlow::Continue(()),
            Self::Finished(_) | Self::TimedOut | Self::Ignored => ControlFlow::Break(()),
        }
    }
}

/// Mutable session record.
#[derive(Debug, Default)]
struct Session {
    status: JobStatus,
    job_id: Option<JobId>,
    result: Option<serde_json::Value>,
    error: Option<String>,
    poll_count: u32,
    /// A create-job call is in flight.
    submitting: bool,
    generation: u64,
}

impl Session {
    /// Drop everything from the previous job and open a new generation.
    fn clear(&mut self) {
        self.status = JobStatus::Idle;
        self.job_id = None;
        self.result = None;
        self.error = None;
        self.poll_count = 0;
        self.submitting = false;
        self.generation += 1;
    }

    fn snapshot(&self, max_polls: u32) -> JobSnapshot {
        let poll_progress = if max_polls == 0 {
            0.0
        } else {
            (f64::from(self.poll_count) / f64::from(max_polls)).min(1.0)
        };
        JobSnapshot {
            status: self.status,
            is_loading: self.submitting || self.status == JobStatus::Pending,
            error: self.error.clone(),
            result: self.result.clone(),
            job_id: self.job_id.clone(),
            poll_count: self.poll_count,
            poll_progress,
            updated_at: Utc::now(),
        }
    }
}

struct Inner {
    session: Session,
    scheduler: PollScheduler,
}

/// Submits lookups, polls them to completion and publishes snapshots.
pub struct JobStateMachine {
    client: Arc<dyn JobClient>,
    policy: PollPolicy,
    inner: Mutex<Inner>,
    snapshot_tx: watch::Sender<JobSnapshot>,
}

impl JobStateMachine {
    /// Create an idle state machine.
    pub fn new(client: Arc<dyn JobClient>, policy: PollPolicy) -> Arc<Self> {
        let (snapshot_tx, _rx) = watch::channel(JobSnapshot::idle());
        Arc::new(Self {
            client,
            policy,
            inner: Mutex::new(Inner {
                session: Session::default(),
                scheduler: PollScheduler::new(policy.interval),
            }),
            snapshot_tx,
        })
    }

    pub fn policy(&self) -> PollPolicy {
        self.policy
    }

    /// Latest snapshot.
    pub fn snapshot(&self) -> JobSnapshot {
        self.snapshot_tx.borrow().clone()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<JobSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Wait until the session reaches `done` or `failed`.
    pub async fn wait_until_settled(&self) -> JobSnapshot {
        let mut rx = self.subscribe();
        let settled = match rx.wait_for(JobSnapshot::is_settled).await {
            Ok(snapshot) => snapshot.clone(),
            // The sender lives in `self`, so this only happens during teardown.
            Err(_) => self.snapshot(),
        };
        settled
    }

    /// Check if a poll task is live.
    pub async fn is_polling(&self) -> bool {
        self.inner.lock().await.scheduler.is_running()
    }

    /// Submit a lookup and start polling it.
    ///
    /// Any finished job is cleared first. Failures of the create call do not
    /// surface here: they move the session straight to `failed` with the
    /// error message. Returns the status the session ended up in.
    pub async fn submit(self: &Arc<Self>, request: JobRequest) -> Result<JobStatus, JobError> {
        let generation = {
            let mut guard = self.inner.lock().await;
            let inner = &mut *guard;
            if inner.session.submitting || inner.session.status == JobStatus::Pending {
                return Err(JobError::AlreadyInFlight);
            }
            inner.scheduler.stop();
            inner.session.clear();
            inner.session.submitting = true;
            self.publish(&inner.session);
            inner.session.generation
        };

        info!(
            generation,
            company = %request.company(),
            "Submitting profile lookup"
        );
        let created = self.client.submit(&request).await;

        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        if inner.session.generation != generation {
            debug!(generation, "Discarding create response from a cancelled submission");
            return Ok(inner.session.status);
        }

        inner.session.submitting = false;
        match created {
            Ok(job_id) => {
                info!(job_id = %job_id, generation, "Job accepted; polling for completion");
                inner.session.status = JobStatus::Pending;
                inner.session.job_id = Some(job_id.clone());
                self.start_polling(&mut inner.scheduler, generation, job_id);
            }
            Err(e) => {
                error!(generation, error = %e, "Lookup submission failed");
                inner.session.status = JobStatus::Failed;
                inner.session.error = Some(e.to_string());
            }
        }
        self.publish(&inner.session);
        Ok(inner.session.status)
    }

    /// Apply a status response to the current job.
    ///
    /// Ignored unless the session is `pending`.
    pub async fn on_poll(&self, response: PollResponse) -> PollOutcome {
        let mut guard = self.inner.lock().await;
        let generation = guard.session.generation;
        self.apply_poll(&mut guard, generation, response)
    }

    /// Return to `idle`, cancelling any polling and discarding the job.
    pub async fn reset(&self) {
        let mut guard = self.inner.lock().await;
        let inner = &mut *guard;
        inner.scheduler.stop();
        let previous = inner.session.status;
        inner.session.clear();
        self.publish(&inner.session);
        info!(from = %previous, generation = inner.session.generation, "Session reset");
    }

    fn start_polling(self: &Arc<Self>, scheduler: &mut PollScheduler, generation: u64, job_id: JobId) {
        let machine = Arc::downgrade(self);
        let tick_job_id = job_id.clone();
        scheduler.start(generation, job_id, move || {
            let machine = machine.clone();
            let job_id = tick_job_id.clone();
            async move {
                match machine.upgrade() {
                    Some(machine) => machine.poll_tick(generation, &job_id).await,
                    None => ControlFlow::Break(()),
                }
            }
        });
    }

    /// One scheduled fetch-and-apply cycle.
    async fn poll_tick(&self, generation: u64, job_id: &JobId) -> ControlFlow<()> {
        debug!(job_id = %job_id, generation, "Polling job status");

        let response = match self.client.fetch_status(job_id).await {
            Ok(response) => response,
            Err(e @ ClientError::Transport { .. }) => {
                warn!(job_id = %job_id, error = %e, "Poll failed; retrying on next tick");
                return ControlFlow::Continue(());
            }
            // The server answered; an unreadable status still uses up an attempt.
            Err(e @ ClientError::Protocol { .. }) => {
                warn!(job_id = %job_id, error = %e, "Unrecognized poll response; counting as pending");
                PollResponse::pending()
            }
        };

        let mut guard = self.inner.lock().await;
        self.apply_poll(&mut guard, generation, response).control_flow()
    }

    /// Terminal check first, then the attempt counter.
    fn apply_poll(&self, inner: &mut Inner, generation: u64, response: PollResponse) -> PollOutcome {
        let session = &mut inner.session;
        if session.generation != generation || session.status != JobStatus::Pending {
            debug!(
                generation,
                current = session.generation,
                status = %session.status,
                "Ignoring stale poll response"
            );
            return PollOutcome::Ignored;
        }

        let outcome = match response.status {
            RemoteStatus::Done | RemoteStatus::Failed => {
                let status = JobStatus::from(response.status);
                session.status = status;
                session.result = response.result;
                session.error = None;
                session.poll_count = 0;
                inner.scheduler.stop();
                info!(
                    job_id = ?session.job_id.as_ref().map(JobId::as_str),
                    status = %status,
                    "Job finished"
                );
                PollOutcome::Finished(status)
            }
            RemoteStatus::Pending => {
                session.poll_count += 1;
                if session.poll_count >= self.policy.max_polls {
                    let timeout = JobError::TimedOut {
                        attempts: session.poll_count,
                    };
                    warn!(
                        job_id = ?session.job_id.as_ref().map(JobId::as_str),
                        attempts = session.poll_count,
                        "Job timed out while pending"
                    );
                    session.status = JobStatus::Failed;
                    session.error = Some(timeout.to_string());
                    session.poll_count = 0;
                    inner.scheduler.stop();
                    PollOutcome::TimedOut
                } else {
                    debug!(attempt = session.poll_count, "Job still pending");
                    PollOutcome::Continue
                }
            }
        };

        self.publish(&inner.session);
        outcome
    }

    fn publish(&self, session: &Session) {
        self.snapshot_tx
            .send_replace(session.snapshot(self.policy.max_polls));
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::sync::Notify;

    use super::*;
    use crate::jobs::client::mock::MockJobClient;

    const LONG: Duration = Duration::from_secs(3600);

    fn request() -> JobRequest {
        JobRequest::new("Jean", "Dupont", "Acme SARL").unwrap()
    }

    fn policy(interval: Duration, max_polls: u32) -> PollPolicy {
        PollPolicy {
            interval,
            max_polls,
        }
    }

    fn machine(client: &Arc<MockJobClient>, policy: PollPolicy) -> Arc<JobStateMachine> {
        JobStateMachine::new(Arc::clone(client) as Arc<dyn JobClient>, policy)
    }

    fn transport_error() -> ClientError {
        ClientError::Transport {
            endpoint: "/search".into(),
            reason: "connection refused".into(),
        }
    }

    #[tokio::test]
    async fn submit_enters_pending_with_clean_state() {
        let client = Arc::new(MockJobClient::new());
        client.push_submit(Ok(JobId::new("abc123")));
        let m = machine(&client, policy(LONG, 60));

        assert_eq!(m.submit(request()).await.unwrap(), JobStatus::Pending);

        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Pending);
        assert_eq!(snap.poll_count, 0);
        assert_eq!(snap.error, None);
        assert!(snap.is_loading);
        assert_eq!(snap.job_id, Some(JobId::new("abc123")));
        assert!(m.is_polling().await);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_failure_goes_straight_to_failed() {
        let client = Arc::new(MockJobClient::new());
        client.push_submit(Err(transport_error()));
        let m = machine(&client, PollPolicy::default());
        let rx = m.subscribe();

        assert_eq!(m.submit(request()).await.unwrap(), JobStatus::Failed);

        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Failed);
        assert!(!snap.is_loading);
        assert!(snap.error.unwrap().contains("connection refused"));
        assert_eq!(snap.job_id, None);
        assert!(!m.is_polling().await);
        assert!(rx.has_changed().unwrap());

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(client.fetch_count(), 0);
    }

    #[tokio::test]
    async fn missing_job_id_surfaces_protocol_message() {
        let client = Arc::new(MockJobClient::new());
        client.push_submit(Err(ClientError::Protocol {
            endpoint: "/search".into(),
            reason: "no jobId returned".into(),
        }));
        let m = machine(&client, PollPolicy::default());

        m.submit(request()).await.unwrap();
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Failed);
        assert!(snap.error.unwrap().contains("no jobId returned"));
    }

    #[tokio::test]
    async fn pending_polls_count_up_then_time_out() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, policy(LONG, 60));
        m.submit(request()).await.unwrap();

        for expected in 1..60 {
            assert_eq!(m.on_poll(PollResponse::pending()).await, PollOutcome::Continue);
            let snap = m.snapshot();
            assert_eq!(snap.status, JobStatus::Pending);
            assert_eq!(snap.poll_count, expected);
        }

        assert_eq!(m.on_poll(PollResponse::pending()).await, PollOutcome::TimedOut);
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Failed);
        assert_eq!(snap.poll_count, 0);
        assert!(!snap.is_loading);
        assert!(snap.error.unwrap().starts_with("Timeout:"));
        assert!(!m.is_polling().await);

        // Further responses do nothing once terminal.
        assert_eq!(m.on_poll(PollResponse::pending()).await, PollOutcome::Ignored);
        assert_eq!(m.snapshot().status, JobStatus::Failed);
    }

    #[tokio::test]
    async fn terminal_response_wins_regardless_of_counter() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, policy(LONG, 3));
        m.submit(request()).await.unwrap();

        m.on_poll(PollResponse::pending()).await;
        m.on_poll(PollResponse::pending()).await;
        assert_eq!(m.snapshot().poll_count, 2);

        // This tick would have been the timeout tick.
        let outcome = m.on_poll(PollResponse::done(json!({"score": 90}))).await;
        assert_eq!(outcome, PollOutcome::Finished(JobStatus::Done));

        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Done);
        assert_eq!(snap.poll_count, 0);
        assert_eq!(snap.error, None);
        assert_eq!(snap.result.unwrap()["score"], 90);
        assert!(!m.is_polling().await);
    }

    #[tokio::test]
    async fn failed_response_may_carry_no_result() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, policy(LONG, 60));
        m.submit(request()).await.unwrap();

        let outcome = m.on_poll(PollResponse::failed(None)).await;
        assert_eq!(outcome, PollOutcome::Finished(JobStatus::Failed));
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Failed);
        assert_eq!(snap.result, None);
        assert_eq!(snap.error, None);
    }

    #[tokio::test]
    async fn on_poll_ignored_when_idle() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, PollPolicy::default());
        assert_eq!(m.on_poll(PollResponse::done(json!({}))).await, PollOutcome::Ignored);
        assert_eq!(m.snapshot().status, JobStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn round_trip_through_scheduler() {
        let client = Arc::new(MockJobClient::new());
        client.push_submit(Ok(JobId::new("abc123")));
        client.push_poll(Ok(PollResponse::pending()));
        client.push_poll(Ok(PollResponse::pending()));
        client.push_poll(Ok(PollResponse::done(json!({"score": 82}))));
        let m = machine(&client, PollPolicy::default());

        let started = tokio::time::Instant::now();
        m.submit(request()).await.unwrap();
        let snap = m.wait_until_settled().await;

        assert_eq!(snap.status, JobStatus::Done);
        assert_eq!(snap.result.as_ref().unwrap()["score"], 82);
        assert_eq!(snap.error, None);
        assert!(!snap.is_loading);
        assert_eq!(client.fetch_count(), 3);
        assert!(started.elapsed() >= Duration::from_secs(15));
        assert!(!m.is_polling().await);
    }

    #[tokio::test(start_paused = true)]
    async fn poll_transport_errors_are_swallowed() {
        let client = Arc::new(MockJobClient::new());
        client.push_poll(Err(transport_error()));
        client.push_poll(Err(transport_error()));
        client.push_poll(Ok(PollResponse::pending()));
        client.push_poll(Ok(PollResponse::done(json!({"score": 40}))));
        let m = machine(&client, PollPolicy::default());

        m.submit(request()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(16)).await;
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Pending);
        assert_eq!(snap.poll_count, 1);
        assert_eq!(snap.error, None);

        let snap = m.wait_until_settled().await;
        assert_eq!(snap.status, JobStatus::Done);
        assert_eq!(client.fetch_count(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn unreadable_poll_responses_count_toward_timeout() {
        let client = Arc::new(MockJobClient::new());
        for _ in 0..500 {
            client.push_poll(Err(ClientError::Protocol {
                endpoint: "/jobs/job-1".into(),
                reason: "unknown variant `processing`".into(),
            }));
        }
        let m = machine(&client, PollPolicy::default());

        m.submit(request()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(26)).await;
        assert_eq!(m.snapshot().poll_count, 5);

        let snap = m.wait_until_settled().await;
        assert_eq!(snap.status, JobStatus::Failed);
        assert!(snap.error.unwrap().starts_with("Timeout:"));
        assert_eq!(client.fetch_count(), 60);
        assert!(!m.is_polling().await);

        tokio::time::sleep(Duration::from_secs(1_000)).await;
        assert_eq!(client.fetch_count(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn scheduler_times_out_after_max_polls() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, PollPolicy::default());

        m.submit(request()).await.unwrap();
        let snap = m.wait_until_settled().await;

        assert_eq!(snap.status, JobStatus::Failed);
        assert!(snap.error.unwrap().starts_with("Timeout:"));
        assert_eq!(client.fetch_count(), 60);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(client.fetch_count(), 60);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_stops_polling_and_clears_session() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, PollPolicy::default());

        m.submit(request()).await.unwrap();
        tokio::time::sleep(Duration::from_secs(11)).await;
        assert_eq!(m.snapshot().poll_count, 2);

        m.reset().await;
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Idle);
        assert_eq!(snap.job_id, None);
        assert_eq!(snap.result, None);
        assert_eq!(snap.error, None);
        assert_eq!(snap.poll_count, 0);
        assert!(!snap.is_loading);
        assert!(!m.is_polling().await);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(client.fetch_count(), 2);
        assert_eq!(m.snapshot().status, JobStatus::Idle);
    }

    #[tokio::test]
    async fn reset_from_done_clears_everything() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, policy(LONG, 60));

        m.submit(request()).await.unwrap();
        let outcome = m.on_poll(PollResponse::done(json!({"score": 90}))).await;
        assert_eq!(outcome, PollOutcome::Finished(JobStatus::Done));
        assert!(m.snapshot().result.is_some());

        m.reset().await;
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Idle);
        assert_eq!(snap.job_id, None);
        assert_eq!(snap.result, None);
        assert_eq!(snap.error, None);
        assert_eq!(snap.poll_count, 0);
        assert!(!snap.is_loading);
        assert!(!m.is_polling().await);
    }

    #[tokio::test]
    async fn reset_from_failed_clears_everything() {
        let client = Arc::new(MockJobClient::new());
        client.push_submit(Err(transport_error()));
        let m = machine(&client, policy(LONG, 60));

        m.submit(request()).await.unwrap();
        assert_eq!(m.snapshot().status, JobStatus::Failed);
        assert!(m.snapshot().error.is_some());

        m.reset().await;
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Idle);
        assert_eq!(snap.job_id, None);
        assert_eq!(snap.result, None);
        assert_eq!(snap.error, None);
        assert_eq!(snap.poll_count, 0);
        assert!(!snap.is_loading);
        assert!(!m.is_polling().await);
        assert_eq!(client.fetch_count(), 0);
    }

    #[tokio::test]
    async fn late_response_from_old_generation_is_discarded() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, policy(LONG, 60));

        m.submit(request()).await.unwrap();
        let old_generation = m.inner.lock().await.session.generation;
        m.reset().await;
        m.submit(request()).await.unwrap();

        let mut guard = m.inner.lock().await;
        let outcome = m.apply_poll(&mut guard, old_generation, PollResponse::done(json!({"score": 1})));
        drop(guard);

        assert_eq!(outcome, PollOutcome::Ignored);
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Pending);
        assert_eq!(snap.result, None);
    }

    #[tokio::test]
    async fn reset_during_submission_discards_the_job() {
        let gate = Arc::new(Notify::new());
        let client = Arc::new(MockJobClient::new().with_submit_gate(Arc::clone(&gate)));
        client.push_submit(Ok(JobId::new("late")));
        let m = machine(&client, policy(LONG, 60));

        let task = {
            let m = Arc::clone(&m);
            tokio::spawn(async move { m.submit(request()).await })
        };
        while client.submit_count() == 0 {
            tokio::task::yield_now().await;
        }
        assert!(m.snapshot().is_loading);
        assert_eq!(m.snapshot().status, JobStatus::Idle);

        m.reset().await;
        gate.notify_one();
        assert_eq!(task.await.unwrap().unwrap(), JobStatus::Idle);

        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Idle);
        assert_eq!(snap.job_id, None);
        assert!(!snap.is_loading);
        assert!(!m.is_polling().await);
    }

    #[tokio::test]
    async fn blank_fields_never_reach_the_client() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, policy(LONG, 60));

        for (first, last, company) in [(" ", "Dupont", "Acme"), ("Jean", "", "Acme"), ("Jean", "Dupont", "\t")] {
            if let Ok(request) = JobRequest::new(first, last, company) {
                m.submit(request).await.unwrap();
            }
        }
        assert_eq!(client.submit_count(), 0);
        assert_eq!(m.snapshot().status, JobStatus::Idle);
    }

    #[tokio::test]
    async fn submit_rejected_while_pending() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, policy(LONG, 60));
        m.submit(request()).await.unwrap();

        assert_eq!(m.submit(request()).await, Err(JobError::AlreadyInFlight));
        assert_eq!(client.submit_count(), 1);
    }

    #[tokio::test]
    async fn resubmit_after_terminal_clears_previous_result() {
        let client = Arc::new(MockJobClient::new());
        client.push_submit(Ok(JobId::new("first")));
        client.push_submit(Ok(JobId::new("second")));
        let m = machine(&client, policy(LONG, 60));

        m.submit(request()).await.unwrap();
        m.on_poll(PollResponse::done(json!({"score": 12}))).await;
        assert_eq!(m.snapshot().status, JobStatus::Done);

        m.submit(request()).await.unwrap();
        let snap = m.snapshot();
        assert_eq!(snap.status, JobStatus::Pending);
        assert_eq!(snap.result, None);
        assert_eq!(snap.job_id, Some(JobId::new("second")));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_machine_stops_polling() {
        let client = Arc::new(MockJobClient::new());
        let m = machine(&client, PollPolicy::default());
        m.submit(request()).await.unwrap();
        drop(m);

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(client.fetch_count(), 0);
    }

    #[test]
    fn poll_progress_is_a_fraction_of_max() {
        let session = Session {
            status: JobStatus::Pending,
            poll_count: 15,
            ..Session::default()
        };
        let snap = session.snapshot(60);
        assert!((snap.poll_progress - 0.25).abs() < f64::EPSILON);
        assert!(snap.is_loading);
    }
}
