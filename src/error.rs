//! Error types for the profile collector.

/// Top-level error type for fallible library setup.
///
/// Runtime failures do not come through here: client errors end up in the
/// snapshot and lifecycle errors are returned as [`JobError`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// A lookup request field was empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("First name is required")]
    MissingFirstName,

    #[error("Last name is required")]
    MissingLastName,

    #[error("Company is required")]
    MissingCompany,
}

/// Errors from the remote job API boundary.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Network failure or non-success HTTP status.
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    /// The server answered successfully but the body was not what we expect.
    #[error("Unexpected response from {endpoint}: {reason}")]
    Protocol { endpoint: String, reason: String },
}

/// Job lifecycle errors raised by the state machine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("A lookup is already in progress")]
    AlreadyInFlight,

    #[error("Timeout: profile collection took too long ({attempts} polls without a result)")]
    TimedOut { attempts: u32 },
}

/// Result type alias for the collector.
pub type Result<T> = std::result::Result<T, Error>;
