//! Configuration types.

use std::time::Duration;

use crate::error::ConfigError;

const ENV_API_URL: &str = "PROFILE_COLLECTOR_API_URL";
const ENV_POLL_INTERVAL: &str = "PROFILE_COLLECTOR_POLL_INTERVAL_SECS";
const ENV_MAX_POLLS: &str = "PROFILE_COLLECTOR_MAX_POLLS";
const ENV_REQUEST_TIMEOUT: &str = "PROFILE_COLLECTOR_REQUEST_TIMEOUT_SECS";

/// Default delay between two status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Default number of pending polls before a job is declared timed out.
pub const DEFAULT_MAX_POLLS: u32 = 60;

/// How the state machine polls a submitted job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Period of the poll timer. The first poll fires one period after submit.
    pub interval: Duration,
    /// Pending polls allowed before the job fails with a timeout.
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_polls: DEFAULT_MAX_POLLS,
        }
    }
}

/// Collector configuration.
#[derive(Debug, Clone)]
pub struct CollectorConfig {
    /// Base URL of the job API, without a trailing slash.
    pub api_base_url: String,
    /// Polling cadence and attempt ceiling.
    pub poll: PollPolicy,
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            poll: PollPolicy::default(),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl CollectorConfig {
    /// Build configuration from `PROFILE_COLLECTOR_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let api_base_url = lookup(ENV_API_URL)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(ENV_API_URL.to_string()))?;
        let api_base_url = normalize_base_url(&api_base_url)?;

        let interval_secs = parse_positive(&lookup, ENV_POLL_INTERVAL)?
            .unwrap_or(defaults.poll.interval.as_secs());
        let max_polls = parse_positive(&lookup, ENV_MAX_POLLS)?
            .map(|n| {
                u32::try_from(n).map_err(|_| ConfigError::InvalidValue {
                    key: ENV_MAX_POLLS.to_string(),
                    message: format!("{n} is too large"),
                })
            })
            .transpose()?
            .unwrap_or(defaults.poll.max_polls);
        let timeout_secs = parse_positive(&lookup, ENV_REQUEST_TIMEOUT)?
            .unwrap_or(defaults.request_timeout.as_secs());

        Ok(Self {
            api_base_url,
            poll: PollPolicy {
                interval: Duration::from_secs(interval_secs),
                max_polls,
            },
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

fn parse_positive<F>(lookup: &F, key: &str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let value: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        message: format!("expected a positive integer, got {raw:?}"),
    })?;
    if value == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(Some(value))
}

/// Check the scheme and strip trailing slashes so paths can be appended.
fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let url = reqwest::Url::parse(raw).map_err(|e| ConfigError::InvalidValue {
        key: ENV_API_URL.to_string(),
        message: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidValue {
            key: ENV_API_URL.to_string(),
            message: format!("unsupported scheme {:?}", url.scheme()),
        });
    }
    Ok(raw.trim_end_matches('/').to_string())
}
