//! Error types for the Asana client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! HTTP failures reported by the API are carried as [`ApiError`], which the
//! classifier in [`crate::http`] builds from the response status.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// The main error type for the Asana client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // API Errors
    // ============================================================================
    #[error(transparent)]
    Api(#[from] ApiError),

    // ============================================================================
    // Transport Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Decoding Errors
    // ============================================================================
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid value for option '{key}': {message}")]
    InvalidOption { key: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid option error
    pub fn invalid_option(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// The API error, if the server rejected the request
    pub fn api(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status reported by the server, if any
    pub fn status(&self) -> Option<u16> {
        self.api().map(|err| err.status)
    }

    /// Check if this error is retryable
    ///
    /// Only classified API errors are ever retried; transport failures are not.
    pub fn is_retryable(&self) -> bool {
        self.api().is_some_and(ApiError::is_retryable)
    }
}

/// Kind of failure reported by the API, keyed by HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// 400 Bad Request or 409 Conflict
    InvalidRequest,
    /// 401 Unauthorized
    NoAuthorization,
    /// 403 Forbidden
    Forbidden,
    /// 404 Not Found
    NotFound,
    /// 412 Precondition Failed
    PreconditionFailed,
    /// 429 Too Many Requests, with the wait the server asked for
    RateLimitEnforced {
        /// How long to wait before the next attempt
        retry_after: Duration,
    },
    /// 500, 502, 503 or 504
    ServerError,
    /// Any other status at or above 400
    Unexpected,
}

impl ErrorKind {
    /// Whether a request failing with this kind may be retried
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ErrorKind::RateLimitEnforced { .. } | ErrorKind::ServerError
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidRequest => f.write_str("Invalid request"),
            ErrorKind::NoAuthorization => f.write_str("No authorization"),
            ErrorKind::Forbidden => f.write_str("Forbidden"),
            ErrorKind::NotFound => f.write_str("Not found"),
            ErrorKind::PreconditionFailed => f.write_str("Precondition failed"),
            ErrorKind::RateLimitEnforced { retry_after } => write!(
                f,
                "Rate limit enforced, retry after {}s",
                retry_after.as_secs_f64()
            ),
            ErrorKind::ServerError => f.write_str("Server error"),
            ErrorKind::Unexpected => f.write_str("Unexpected response"),
        }
    }
}

/// A classified error response from the API
///
/// Keeps the original status and body for diagnostics.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind} (HTTP {status}): {body}")]
pub struct ApiError {
    /// Classified kind
    pub kind: ErrorKind,
    /// Raw HTTP status
    pub status: u16,
    /// Raw response body
    pub body: String,
}

impl ApiError {
    /// Create a new API error
    pub fn new(kind: ErrorKind, status: u16, body: impl Into<String>) -> Self {
        Self {
            kind,
            status,
            body: body.into(),
        }
    }

    /// Whether the request may be retried
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }

    /// Wait requested by the server, for rate limit errors
    pub fn retry_after(&self) -> Option<Duration> {
        match self.kind {
            ErrorKind::RateLimitEnforced { retry_after } => Some(retry_after),
            _ => None,
        }
    }
}

/// Result type alias for the Asana client
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
