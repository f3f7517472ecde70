//! Error type definitions
//!
//! Validation, security, API and timeout failures are the outcomes callers are
//! expected to handle. The remaining variants cover configuration, storage and
//! transport plumbing.

use std::time::Duration;
use thiserror::Error;

/// Message used when a request exceeds its timeout budget
pub const TIMEOUT_MESSAGE: &str = "リクエストがタイムアウトしました";

/// Main error type for the client runtime
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or oversized input; the user must correct it
    #[error("{message}")]
    Validation { message: String },

    /// Input rejected because it carries markup or script injection content
    #[error("{message}")]
    Security { message: String },

    /// The remote side rejected the request; `message` is user-displayable
    #[error("{message}")]
    Api { status: u16, message: String },

    /// No response within the timeout budget
    #[error("{message}")]
    Timeout { message: String, budget: Duration },

    /// The caller cancelled the request before it settled
    #[error("Request cancelled")]
    Cancelled,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Key-value storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network/HTTP client errors
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// TOML configuration parsing errors
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new security error
    pub fn security(message: impl Into<String>) -> Self {
        Self::Security {
            message: message.into(),
        }
    }

    /// Create a new API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Create a timeout error for the given budget
    pub fn timeout(budget: Duration) -> Self {
        Self::Timeout {
            message: TIMEOUT_MESSAGE.to_string(),
            budget,
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status carried by an API error
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether a caller may reasonably retry the same operation
    ///
    /// The request client never retries on its own.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::Network(_) => true,
            Self::Api { status, .. } => matches!(status, 429 | 503),
            _ => false,
        }
    }
}
