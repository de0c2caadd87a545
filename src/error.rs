//! Elocute error types

use std::time::Duration;

/// Elocute error types
#[derive(Debug, thiserror::Error)]
pub enum ElocuteError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("model not found: {0}")]
    ModelNotFound(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),

    // Soft errors
    #[error("empty response from model")]
    EmptyResponse,
}

impl ElocuteError {
    /// Whether a retry might succeed for this error.
    ///
    /// Rate limits, transport failures, and 5xx responses are transient;
    /// everything else (bad credentials, bad input, malformed JSON) is
    /// permanent and surfaced immediately.
    pub fn is_transient(&self) -> bool {
        match self {
            ElocuteError::RateLimited { .. } | ElocuteError::Http(_) => true,
            ElocuteError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// Provider-supplied retry hint, if any.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            ElocuteError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Result type alias for elocute operations
pub type Result<T> = std::result::Result<T, ElocuteError>;
