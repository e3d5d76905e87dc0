//! Error taxonomy for the smoke harness
//!
//! Fatal kinds (`Preflight`, `Discovery`) abort before any check runs.
//! Everything else is recovered by the runner and recorded as a failure.

use thiserror::Error;

/// Errors raised while validating a deployment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SmokeError {
    #[error("Pre-flight check failed: {0}")]
    Preflight(String),

    #[error("{0}")]
    Discovery(String),

    #[error("{0}")]
    Assertion(String),

    #[error("Request to {url} timed out after {timeout_ms}ms")]
    ProbeTimeout { url: String, timeout_ms: u64 },

    #[error("Request to {url} failed: {reason}")]
    Probe { url: String, reason: String },

    #[error("`{command}` failed: {message}")]
    Command { command: String, message: String },
}

impl SmokeError {
    /// Errors that abort the run before any check executes
    pub fn is_fatal(&self) -> bool {
        matches!(self, SmokeError::Preflight(_) | SmokeError::Discovery(_))
    }

    /// Short label used in logs and JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            SmokeError::Preflight(_) => "preflight",
            SmokeError::Discovery(_) => "discovery",
            SmokeError::Assertion(_) => "assertion",
            SmokeError::ProbeTimeout { .. } => "probe_timeout",
            SmokeError::Probe { .. } => "probe",
            SmokeError::Command { .. } => "command",
        }
    }
}
