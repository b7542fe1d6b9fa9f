//! Error types for the dw-client crate.

/// Why a documentation request produced no text.
///
/// Both kinds are per-call failures: the caller logs them and leaves the
/// file's fingerprint untouched so the next notification tries again.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The request never produced a response: connection refused, reset,
    /// or the configured timeout elapsed.
    #[error("completion service unreachable: {source}")]
    Transport {
        /// Underlying HTTP error.
        #[from]
        source: reqwest::Error,
    },

    /// The service answered, but not with a usable completion.
    #[error("unexpected completion response: {reason}")]
    ResponseFormat {
        /// What was wrong with the response.
        reason: String,
    },
}

impl GenerateError {
    /// Creates a new [`GenerateError::ResponseFormat`] error.
    #[inline]
    pub fn response_format(reason: impl Into<String>) -> Self {
        Self::ResponseFormat {
            reason: reason.into(),
        }
    }

    /// Returns `true` for connection and timeout failures.
    #[inline]
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }

    /// Returns `true` if the call gave up because the request timeout elapsed.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport { source } => source.is_timeout(),
            Self::ResponseFormat { .. } => false,
        }
    }
}

/// Failure to set up the HTTP client itself.
#[derive(Debug, thiserror::Error)]
#[error("failed to build HTTP client: {0}")]
pub struct ClientBuildError(#[from] pub reqwest::Error);
