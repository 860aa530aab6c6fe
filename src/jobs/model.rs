//! Job data model: requests, ids, statuses and the snapshot handed to the UI.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A profile lookup request. Every field is trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRequest {
    first_name: String,
    last_name: String,
    company: String,
}

impl JobRequest {
    /// Validate and build a request. Fields are trimmed before the check.
    pub fn new(
        first_name: impl AsRef<str>,
        last_name: impl AsRef<str>,
        company: impl AsRef<str>,
    ) -> Result<Self, ValidationError> {
        let first_name = first_name.as_ref().trim();
        let last_name = last_name.as_ref().trim();
        let company = company.as_ref().trim();

        if first_name.is_empty() {
            return Err(ValidationError::MissingFirstName);
        }
        if last_name.is_empty() {
            return Err(ValidationError::MissingLastName);
        }
        if company.is_empty() {
            return Err(ValidationError::MissingCompany);
        }

        Ok(Self {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            company: company.to_string(),
        })
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn company(&self) -> &str {
        &self.company
    }
}

/// Opaque job identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of the local lookup session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Nothing submitted, or the session was reset.
    #[default]
    Idle,
    /// Submitted; polling is active.
    Pending,
    /// Finished successfully.
    Done,
    /// Finished with an error, a server-side failure or a timeout.
    Failed,
}

impl JobStatus {
    /// Check if this is a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// Status as reported by `GET /jobs/{id}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RemoteStatus {
    Pending,
    Done,
    Failed,
}

impl From<RemoteStatus> for JobStatus {
    fn from(status: RemoteStatus) -> Self {
        match status {
            RemoteStatus::Pending => JobStatus::Pending,
            RemoteStatus::Done => JobStatus::Done,
            RemoteStatus::Failed => JobStatus::Failed,
        }
    }
}

/// Body of a job status response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResponse {
    pub status: RemoteStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
}

impl PollResponse {
    pub fn pending() -> Self {
        Self {
            status: RemoteStatus::Pending,
            result: None,
        }
    }

    pub fn done(result: serde_json::Value) -> Self {
        Self {
            status: RemoteStatus::Done,
            result: Some(result),
        }
    }

    pub fn failed(result: Option<serde_json::Value>) -> Self {
        Self {
            status: RemoteStatus::Failed,
            result,
        }
    }
}

/// Read-only view of the session, consumed by the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    /// True while the create call is in flight or the job is pending.
    pub is_loading: bool,
    pub error: Option<String>,
    pub result: Option<serde_json::Value>,
    pub job_id: Option<JobId>,
    /// Pending polls seen so far for the current job.
    pub poll_count: u32,
    /// `poll_count / max_polls`, in `[0, 1]`.
    pub poll_progress: f64,
    pub updated_at: DateTime<Utc>,
}

impl JobSnapshot {
    /// Snapshot of a fresh, idle session.
    pub fn idle() -> Self {
        Self {
            status: JobStatus::Idle,
            is_loading: false,
            error: None,
            result: None,
            job_id: None,
            poll_count: 0,
            poll_progress: 0.0,
            updated_at: Utc::now(),
        }
    }

    /// True once the job is done or failed and nothing is loading.
    pub fn is_settled(&self) -> bool {
        self.status.is_terminal() && !self.is_loading
    }
}
