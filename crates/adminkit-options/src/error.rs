//! Error types for option loading
//!
//! Covers:
//! - Remote endpoint failures (non-2xx, transport, decoding)
//! - Endpoint misconfiguration
//! - Illegal load status transitions

use crate::status::LoadStatus;

/// Failure to fetch options for a dependency key
///
/// Stored in the loader state, so it is `Clone` and carries rendered
/// messages instead of the underlying client errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The endpoint answered with a non-2xx status
    #[error("endpoint returned {status} for {url}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Requested URL
        url: String,
    },

    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body is not a valid option list
    #[error("cannot decode options: {0}")]
    Decode(String),

    /// The endpoint URL cannot be built
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl FetchError {
    /// Check if a later attempt could succeed
    ///
    /// The loader itself never retries; callers may offer a manual reload.
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Transport(_) => true,
            Self::Decode(_) | Self::InvalidEndpoint(_) => false,
        }
    }

    /// Create status error
    #[inline]
    pub fn status(status: u16, url: impl Into<String>) -> Self {
        Self::Status {
            status,
            url: url.into(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                url: err.url().map(ToString::to_string).unwrap_or_default(),
            }
        } else {
            Self::Transport(err.to_string())
        }
    }
}

impl From<url::ParseError> for FetchError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

/// Loader state machine errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    /// The requested status change is not allowed
    #[error("illegal load transition: {from:?} -> {to:?}")]
    IllegalTransition {
        /// Current status
        from: LoadStatus,
        /// Requested status
        to: LoadStatus,
    },
}
