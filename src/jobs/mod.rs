//! Job lifecycle — submit a lookup, poll it, expose its state.
//!
//! Core components:
//! - `model` — Request, id, status and snapshot types
//! - `client` — HTTP boundary to the remote job API
//! - `scheduler` — Repeating poll timer bound to one job
//! - `machine` — Session state machine (Idle → Pending → Done/Failed)

pub mod client;
pub mod machine;
pub mod model;
pub mod scheduler;

pub use client::{HttpJobClient, JobClient};
pub use machine::{JobStateMachine, PollOutcome};
pub use model::{JobId, JobRequest, JobSnapshot, JobStatus, PollResponse, RemoteStatus};
pub use scheduler::PollScheduler;

use std::sync::Arc;

use crate::config::CollectorConfig;

/// Build an HTTP-backed state machine from configuration.
pub fn connect(config: &CollectorConfig) -> crate::error::Result<Arc<JobStateMachine>> {
    let client: Arc<dyn JobClient> = Arc::new(HttpJobClient::new(config)?);
    Ok(JobStateMachine::new(client, config.poll))
}
