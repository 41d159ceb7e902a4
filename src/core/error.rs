//! Error types for the agent
//!
//! Errors fall into four groups:
//! - startup/config errors (missing credential, invalid settings)
//! - session errors (connect failures, a session the backend declared invalid)
//! - turn errors (stream failures, error results, timeouts)
//! - malformed input (rejected before the backend is contacted)

use std::time::Duration;

use thiserror::Error;

/// Result alias used across the crate
pub type AgentResult<T> = Result<T, AgentError>;

/// Errors produced while configuring or driving the agent backend
#[derive(Debug, Error)]
pub enum AgentError {
    /// A required credential is not present in the environment
    #[error("{0} environment variable not set")]
    MissingCredential(&'static str),

    /// Configuration could not be read or is invalid
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The caller passed an argument the agent refuses to forward
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend session could not be established
    #[error("failed to connect to backend: {0}")]
    Connect(String),

    /// The response stream failed part way through a turn
    #[error("response stream failed: {0}")]
    Stream(String),

    /// The backend finished the turn with an error result
    #[error("backend reported an error: {0}")]
    Backend(String),

    /// The session can no longer carry turns
    #[error("session is no longer usable: {0}")]
    SessionInvalid(String),

    /// A turn was submitted before the previous one was drained
    #[error("a turn is already in flight on this session")]
    TurnInFlight,

    /// An operation needed a connected session
    #[error("no active session")]
    NotConnected,

    /// The configured time limit elapsed
    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AgentError {
    /// Whether this error ends the interactive loop
    ///
    /// Startup problems, failed connects and sessions the backend declared
    /// invalid cannot carry further turns. Everything else is reported for
    /// the current turn only.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AgentError::MissingCredential(_)
                | AgentError::Config(_)
                | AgentError::Connect(_)
                | AgentError::SessionInvalid(_)
                | AgentError::NotConnected
        )
    }

    /// Whether this error came from the caller's input rather than the backend
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, AgentError::InvalidArgument(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatal_classification() {
        assert!(AgentError::MissingCredential("ANTHROPIC_API_KEY").is_fatal());
        assert!(AgentError::Connect("spawn failed".into()).is_fatal());
        assert!(AgentError::SessionInvalid("exited".into()).is_fatal());

        assert!(!AgentError::Stream("broken pipe".into()).is_fatal());
        assert!(!AgentError::Backend("overloaded".into()).is_fatal());
        assert!(!AgentError::Timeout(Duration::from_secs(1)).is_fatal());
        assert!(!AgentError::InvalidArgument("empty".into()).is_fatal());
    }

    #[test]
    fn test_missing_credential_message() {
        let err = AgentError::MissingCredential("ANTHROPIC_API_KEY");
        assert_eq!(
            err.to_string(),
            "ANTHROPIC_API_KEY environment variable not set"
        );
    }
}
