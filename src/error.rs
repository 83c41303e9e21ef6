//! # Client Error Types
//!
//! Unified error handling for single-page calls and the draining/paginating
//! operations built on top of them.

use thiserror::Error;

/// Boxed error produced by a transport collaborator
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Client operation result type
pub type ClientResult<T> = Result<T, ClientError>;

/// Broad classification of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    Transport,
    ProtocolViolation,
    Codec,
    Cancelled,
    IterationLimit,
}

/// Comprehensive error types for client operations
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Transport error during {operation}: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("Protocol violation during {operation}: {reason}")]
    ProtocolViolation {
        operation: &'static str,
        reason: String,
    },

    #[error("Codec error: {0}")]
    Codec(String),

    #[error("{operation} cancelled before the next page was requested")]
    Cancelled {
        operation: &'static str,
        remaining: Option<usize>,
    },

    #[error("{operation} stopped after {pages} pages with {remaining} entries still pending")]
    IterationLimitExceeded {
        operation: &'static str,
        pages: usize,
        remaining: usize,
    },
}

impl ClientError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Wrap a failure reported by the transport collaborator
    pub fn transport(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            operation,
            source: source.into(),
        }
    }

    /// Create a protocol violation error
    ///
    /// Use this when a response breaks the unprocessed/cursor contract, for
    /// example by naming a table that was never submitted. It indicates a
    /// broken collaborator rather than a network failure.
    pub fn protocol_violation(operation: &'static str, reason: impl Into<String>) -> Self {
        Self::ProtocolViolation {
            operation,
            reason: reason.into(),
        }
    }

    /// Create a codec error
    pub fn codec(message: impl Into<String>) -> Self {
        Self::Codec(message.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Configuration(_) => ErrorKind::Configuration,
            ClientError::Transport { .. } => ErrorKind::Transport,
            ClientError::ProtocolViolation { .. } => ErrorKind::ProtocolViolation,
            ClientError::Codec(_) => ErrorKind::Codec,
            ClientError::Cancelled { .. } => ErrorKind::Cancelled,
            ClientError::IterationLimitExceeded { .. } => ErrorKind::IterationLimit,
        }
    }

    /// Number of pool entries left unsubmitted when the error was raised, if known
    pub fn remaining(&self) -> Option<usize> {
        match self {
            ClientError::Cancelled { remaining, .. } => *remaining,
            ClientError::IterationLimitExceeded { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }

    /// Check if error is recoverable (worth retrying the whole call)
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }
}

impl From<config::ConfigError> for ClientError {
    fn from(error: config::ConfigError) -> Self {
        ClientError::Configuration(format!("Failed to load configuration: {error}"))
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(error: serde_json::Error) -> Self {
        ClientError::Codec(format!("JSON serialization error: {error}"))
    }
}
