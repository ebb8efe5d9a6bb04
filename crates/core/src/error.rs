//! Error taxonomy for calls to the agent platform.

use std::time::Duration;

/// Errors returned by the remote execution gateway.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Connection could not be established or was dropped
    #[error("Network error: {0}")]
    Network(String),

    /// The call did not finish in time
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The platform asked us to slow down
    #[error("Rate limited (retry after {retry_after:?})")]
    RateLimited {
        /// Server supplied delay, if any
        retry_after: Option<Duration>,
    },

    /// Credentials missing, expired or rejected
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Model settings or request payload rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Any other failure reported by the platform
    #[error("Remote call failed ({status}): {message}")]
    Remote {
        /// HTTP-like status code
        status: u16,
        /// Platform supplied detail
        message: String,
    },
}

/// Whether an error is transient and safe to retry after a backoff.
///
/// Network trouble, timeouts, rate limiting and server-side (5xx) failures are
/// retryable. Authorization, configuration and other remote rejections are
/// fatal.
pub fn is_retryable_error(error: &ApiError) -> bool {
    match error {
        ApiError::Network(_) | ApiError::Timeout(_) | ApiError::RateLimited { .. } => true,
        ApiError::Unauthorized(_) | ApiError::InvalidConfiguration(_) => false,
        ApiError::Remote { status, .. } => *status >= 500 || *status == 429,
    }
}

impl ApiError {
    /// Shorthand for [`is_retryable_error`].
    pub fn is_retryable(&self) -> bool {
        is_retryable_error(self)
    }
}
