//! HTTP boundary to the remote job API.
//!
//! Two calls: `POST {base}/search` creates a job and returns its id, and
//! `GET {base}/jobs/{id}` reports its status. Neither retries; the state
//! machine decides what a failure means.

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::CollectorConfig;
use crate::error::{ClientError, ConfigError};
use crate::jobs::model::{JobId, JobRequest, PollResponse};

/// Longest response body kept in an error message.
const MAX_ERROR_BODY: usize = 200;

/// Remote job API.
#[async_trait]
pub trait JobClient: Send + Sync {
    /// Create a job for `request` and return its id.
    async fn submit(&self, request: &JobRequest) -> Result<JobId, ClientError>;

    /// Fetch the current status (and result, once terminal) of a job.
    async fn fetch_status(&self, id: &JobId) -> Result<PollResponse, ClientError>;
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(rename = "jobId", default)]
    job_id: Option<String>,
}

fn client_build_error(e: reqwest::Error) -> ConfigError {
    ConfigError::InvalidValue {
        key: "http_client".to_string(),
        message: format!("Failed to build HTTP client: {e}"),
    }
}

/// [`JobClient`] backed by [`reqwest`].
pub struct HttpJobClient {
    client: reqwest::Client,
    base_url: reqwest::Url,
}

impl HttpJobClient {
    /// Create a client from configuration.
    pub fn new(config: &CollectorConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(client_build_error)?;
        Self::with_client(client, &config.api_base_url)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, base_url: &str) -> Result<Self, ConfigError> {
        let base_url = reqwest::Url::parse(base_url).map_err(|e| ConfigError::InvalidValue {
            key: "api_base_url".to_string(),
            message: e.to_string(),
        })?;
        if base_url.cannot_be_a_base() {
            return Err(ConfigError::InvalidValue {
                key: "api_base_url".to_string(),
                message: format!("{base_url} cannot be used as a base URL"),
            });
        }
        Ok(Self { client, base_url })
    }

    /// Append path segments to the base URL. Segments are percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> reqwest::Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Read the body of a response, mapping non-2xx to a transport error.
    async fn read_body(
        response: reqwest::Response,
        endpoint: &reqwest::Url,
    ) -> Result<String, ClientError> {
        let status = response.status();
        let body = response.text().await.map_err(|e| ClientError::Transport {
            endpoint: endpoint.path().to_string(),
            reason: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(ClientError::Transport {
                endpoint: endpoint.path().to_string(),
                reason: format!("HTTP {}: {}", status.as_u16(), truncate(&body, MAX_ERROR_BODY)),
            });
        }
        Ok(body)
    }
}

#[async_trait]
impl JobClient for HttpJobClient {
    async fn submit(&self, request: &JobRequest) -> Result<JobId, ClientError> {
        let url = self.endpoint(&["search"]);
        let response = self
            .client
            .post(url.clone())
            .json(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                endpoint: url.path().to_string(),
                reason: e.to_string(),
            })?;

        let body = Self::read_body(response, &url).await?;
        let parsed: SubmitResponse =
            serde_json::from_str(&body).map_err(|e| ClientError::Protocol {
                endpoint: url.path().to_string(),
                reason: format!("invalid JSON: {e}"),
            })?;

        match parsed.job_id {
            Some(id) if !id.trim().is_empty() => {
                tracing::debug!(job_id = %id, "Job created");
                Ok(JobId::new(id))
            }
            _ => Err(ClientError::Protocol {
                endpoint: url.path().to_string(),
                reason: "no jobId returned".to_string(),
            }),
        }
    }

    async fn fetch_status(&self, id: &JobId) -> Result<PollResponse, ClientError> {
        let url = self.endpoint(&["jobs", id.as_str()]);
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| ClientError::Transport {
                endpoint: url.path().to_string(),
                reason: e.to_string(),
            })?;

        let body = Self::read_body(response, &url).await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Protocol {
            endpoint: url.path().to_string(),
            reason: format!("invalid status body: {e}"),
        })
    }
}

fn truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
